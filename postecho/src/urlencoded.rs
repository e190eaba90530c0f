// -*- coding: utf-8 -*-
//
// POST echo responder
//
// Copyright (C) 2011-2024 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::params::FormParams;
use percent_encoding::percent_decode;

/// Decode one `application/x-www-form-urlencoded` name or value.
///
/// Malformed `%` escapes are kept as-is. The result is not required to be UTF-8.
fn decode_component(raw: &[u8]) -> Vec<u8> {
    let raw: Vec<u8> = raw
        .iter()
        .map(|&c| if c == b'+' { b' ' } else { c })
        .collect();
    percent_decode(&raw).collect()
}

pub fn parse_urlencoded(body: &[u8]) -> FormParams {
    let mut params = FormParams::new();
    for pair in body.split(|&c| c == b'&') {
        if pair.is_empty() {
            continue;
        }
        let (name, value) = match pair.iter().position(|&c| c == b'=') {
            Some(pos) => (&pair[..pos], &pair[pos + 1..]),
            None => (pair, &[][..]),
        };
        let name = decode_component(name);
        if name.is_empty() {
            continue;
        }
        params.insert(name, decode_component(value));
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(body: &[u8]) -> Vec<(String, String)> {
        parse_urlencoded(body)
            .iter()
            .map(|(n, v)| {
                (
                    String::from_utf8_lossy(n).to_string(),
                    String::from_utf8_lossy(v).to_string(),
                )
            })
            .collect()
    }

    fn pair(n: &str, v: &str) -> (String, String) {
        (n.to_string(), v.to_string())
    }

    #[test]
    fn test_simple() {
        assert_eq!(
            lines(b"color=red&size=10"),
            vec![pair("color", "red"), pair("size", "10")]
        );
        assert!(lines(b"").is_empty());
    }

    #[test]
    fn test_duplicate_last_wins() {
        assert_eq!(
            lines(b"tag=a&x=1&tag=b"),
            vec![pair("tag", "b"), pair("x", "1")]
        );
    }

    #[test]
    fn test_decode() {
        assert_eq!(lines(b"note=a%27b"), vec![pair("note", "a'b")]);
        assert_eq!(lines(b"a+b=c+d%2Be"), vec![pair("a b", "c d+e")]);
        assert_eq!(lines(b"x=%zz%4"), vec![pair("x", "%zz%4")]);
        assert_eq!(lines(b"x=1=2"), vec![pair("x", "1=2")]);
        assert_eq!(lines(b"k=%3Cb%3E%26amp%3B"), vec![pair("k", "<b>&amp;")]);
    }

    #[test]
    fn test_degenerate_pairs() {
        assert_eq!(
            lines(b"&&flag&=nope&empty=&"),
            vec![pair("flag", ""), pair("empty", "")]
        );
        assert_eq!(lines(b"=x&%=&&"), vec![pair("%", "")]);
    }

    #[test]
    fn test_raw_bytes() {
        let p = parse_urlencoded(b"bin=%FF%00x");
        assert_eq!(p.get(b"bin"), Some(&[0xFF, 0x00, b'x'][..]));
    }
}

// vim: ts=4 sw=4 expandtab
