// -*- coding: utf-8 -*-
//
// POST echo responder
//
// Copyright (C) 2011-2024 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Encoding of a request body, as announced by its `Content-Type`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BodyKind {
    UrlEncoded,
    Multipart,
    Other,
}

/// One incoming HTTP request, as seen by the echo handler.
#[derive(Clone, Debug, Default)]
pub struct EchoRequest {
    method: String,
    content_type: String,
    body: Option<Vec<u8>>,
}

impl EchoRequest {
    pub fn new(method: &str, content_type: &str, body: Option<Vec<u8>>) -> Self {
        Self {
            method: method.trim().to_string(),
            content_type: content_type.trim().to_string(),
            body,
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// HTTP methods are case sensitive.
    pub fn is_post(&self) -> bool {
        self.method == "POST"
    }

    pub fn is_head(&self) -> bool {
        self.method == "HEAD"
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn body_kind(&self) -> BodyKind {
        let media_type = self
            .content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim();
        if media_type.eq_ignore_ascii_case("application/x-www-form-urlencoded") {
            BodyKind::UrlEncoded
        } else if media_type.eq_ignore_ascii_case("multipart/form-data") {
            BodyKind::Multipart
        } else {
            BodyKind::Other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(ct: &str) -> BodyKind {
        EchoRequest::new("POST", ct, None).body_kind()
    }

    #[test]
    fn test_body_kind() {
        assert_eq!(kind("application/x-www-form-urlencoded"), BodyKind::UrlEncoded);
        assert_eq!(
            kind("Application/X-WWW-Form-Urlencoded; charset=UTF-8"),
            BodyKind::UrlEncoded
        );
        assert_eq!(kind("multipart/form-data; boundary=abc"), BodyKind::Multipart);
        assert_eq!(kind(" MULTIPART/FORM-DATA ;boundary=abc"), BodyKind::Multipart);
        assert_eq!(kind("text/plain"), BodyKind::Other);
        assert_eq!(kind(""), BodyKind::Other);
    }

    #[test]
    fn test_method() {
        assert!(EchoRequest::new(" POST\n", "", None).is_post());
        assert!(!EchoRequest::new("post", "", None).is_post());
        assert!(EchoRequest::new("HEAD", "", None).is_head());
        assert_eq!(EchoRequest::default().method(), "");
    }
}

// vim: ts=4 sw=4 expandtab
