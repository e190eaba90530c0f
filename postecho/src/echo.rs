// -*- coding: utf-8 -*-
//
// POST echo responder
//
// Copyright (C) 2011-2024 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{params::FormParams, reply::EchoReply, request::EchoRequest};

/// Text/plain, so that the client gets the raw bytes without any entity escaping.
pub const BANNER: &str = "[info: this is Content-type: text/plain, so you should get\n       \
                          back exactly what I have received]\n";

const HEADLINE: &str = "POST vars from HTTP request:\n";
const FOOTER: &str = "[end of file]\n";

/// Render the echo document for the given variables.
///
/// Names and values are copied verbatim. No escaping of any kind.
pub fn render(params: &FormParams) -> Vec<u8> {
    let mut body = Vec::with_capacity(
        BANNER.len()
            + HEADLINE.len()
            + FOOTER.len()
            + 8
            + params
                .iter()
                .map(|(n, v)| n.len() + v.len() + 9)
                .sum::<usize>(),
    );
    body.extend_from_slice(BANNER.as_bytes());
    body.push(b'\n');
    body.extend_from_slice(HEADLINE.as_bytes());
    body.push(b'\n');
    for (name, value) in params.iter() {
        body.extend_from_slice(b"  '");
        body.extend_from_slice(name);
        body.extend_from_slice(b"': '");
        body.extend_from_slice(value);
        body.extend_from_slice(b"'\n");
    }
    body.push(b'\n');
    body.extend_from_slice(FOOTER.as_bytes());
    body
}

/// Handle one request.
///
/// The reply is always `200 Ok` with `text/plain` content.
/// A missing or unparsable body just results in an empty variable list.
pub async fn echo(request: &EchoRequest) -> EchoReply {
    let params = FormParams::from_request(request).await;
    EchoReply::ok(render(&params), "text/plain")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reply::HttpStatus;

    const URLENC: &str = "application/x-www-form-urlencoded";

    const EMPTY_DOC: &str = "[info: this is Content-type: text/plain, so you should get\n\
                             \x20      back exactly what I have received]\n\
                             \n\
                             POST vars from HTTP request:\n\
                             \n\
                             \n\
                             [end of file]\n";

    async fn echo_str(method: &str, mime: &str, body: Option<&[u8]>) -> String {
        let reply = echo(&EchoRequest::new(method, mime, body.map(|b| b.to_vec()))).await;
        assert_eq!(reply.status(), HttpStatus::Ok);
        assert_eq!(reply.mime(), "text/plain");
        String::from_utf8(reply.body().to_vec()).unwrap()
    }

    fn param_lines(doc: &str) -> Vec<&str> {
        doc.lines().filter(|l| l.starts_with("  '")).collect()
    }

    #[test]
    fn test_banner() {
        assert_eq!(
            BANNER,
            "[info: this is Content-type: text/plain, so you should get\n       back exactly what I have received]\n"
        );
    }

    #[tokio::test]
    async fn test_no_body() {
        assert_eq!(echo_str("POST", URLENC, None).await, EMPTY_DOC);
        assert_eq!(echo_str("POST", "", None).await, EMPTY_DOC);
        assert_eq!(echo_str("GET", "", None).await, EMPTY_DOC);
    }

    #[tokio::test]
    async fn test_two_params() {
        let doc = echo_str("POST", URLENC, Some(b"color=red&size=10")).await;
        assert_eq!(
            doc,
            "[info: this is Content-type: text/plain, so you should get\n       \
             back exactly what I have received]\n\
             \n\
             POST vars from HTTP request:\n\
             \n\
             \x20 'color': 'red'\n\
             \x20 'size': '10'\n\
             \n\
             [end of file]\n"
        );
    }

    #[tokio::test]
    async fn test_duplicate_key() {
        let doc = echo_str("POST", URLENC, Some(b"tag=a&tag=b")).await;
        assert_eq!(param_lines(&doc), vec!["  'tag': 'b'"]);
    }

    #[tokio::test]
    async fn test_verbatim_value() {
        let doc = echo_str("POST", URLENC, Some(b"note=a%27b&h=%3Ci%3E+%26")).await;
        assert_eq!(param_lines(&doc), vec!["  'note': 'a'b'", "  'h': '<i> &'"]);
    }

    #[tokio::test]
    async fn test_footer() {
        for body in [None, Some(&b"a=1"[..]), Some(&b"%%%"[..])] {
            let doc = echo_str("POST", URLENC, body).await;
            assert!(doc.ends_with("\n[end of file]\n"));
        }
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let doc = echo_str("POST", "multipart/form-data; boundary=b", Some(b"--nope")).await;
        assert_eq!(doc, EMPTY_DOC);
        let doc = echo_str("POST", "text/xml", Some(b"<a>1</a>")).await;
        assert_eq!(doc, EMPTY_DOC);
    }

    #[test]
    fn test_render_raw_bytes() {
        let mut p = FormParams::new();
        p.insert(vec![0xC3, 0x28], vec![0xFF]);
        let doc = render(&p);
        let expected: &[u8] = b"  '\xC3\x28': '\xFF'\n";
        assert!(doc.windows(expected.len()).any(|w| w == expected));
    }
}

// vim: ts=4 sw=4 expandtab
