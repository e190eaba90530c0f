// -*- coding: utf-8 -*-
//
// POST echo responder
//
// Copyright (C) 2011-2024 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{
    formfields::parse_multipart,
    request::{BodyKind, EchoRequest},
    urlencoded::parse_urlencoded,
};
use std::collections::HashMap;

/// Ordered name -> value mapping of the POST variables of one request.
///
/// Names are unique. The iteration order is the order in which each
/// distinct name was first seen in the body.
///
/// Known limitation: if a name occurs more than once, only the last
/// value is kept. It stays at the position of the first occurrence.
/// This mirrors the associative array semantics that existing
/// consumers of the echo output rely on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormParams {
    items: Vec<(Vec<u8>, Vec<u8>)>,
    index: HashMap<Vec<u8>, usize>,
}

impl FormParams {
    pub fn new() -> Self {
        Default::default()
    }

    /// Parse the POST variables from the request body.
    ///
    /// This never fails. Anything that is not a well formed form body
    /// of a POST request results in an empty mapping.
    pub async fn from_request(request: &EchoRequest) -> Self {
        if !request.is_post() {
            return Self::new();
        }
        let Some(body) = request.body() else {
            return Self::new();
        };
        match request.body_kind() {
            BodyKind::UrlEncoded => parse_urlencoded(body),
            BodyKind::Multipart => parse_multipart(body, request.content_type())
                .await
                .unwrap_or_default(),
            BodyKind::Other => Self::new(),
        }
    }

    /// Insert a variable. An existing value of the same name is replaced.
    pub fn insert(&mut self, name: Vec<u8>, value: Vec<u8>) {
        if let Some(&pos) = self.index.get(&name) {
            self.items[pos].1 = value;
        } else {
            self.index.insert(name.clone(), self.items.len());
            self.items.push((name, value));
        }
    }

    pub fn get(&self, name: &[u8]) -> Option<&[u8]> {
        self.index.get(name).map(|&pos| &self.items[pos].1[..])
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.items.iter().map(|(n, v)| (&n[..], &v[..]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(params: &FormParams) -> Vec<&[u8]> {
        params.iter().map(|(n, _)| n).collect()
    }

    #[test]
    fn test_insert_order() {
        let mut p = FormParams::new();
        assert!(p.is_empty());
        p.insert(b"b".to_vec(), b"1".to_vec());
        p.insert(b"a".to_vec(), b"2".to_vec());
        p.insert(b"c".to_vec(), b"3".to_vec());
        assert_eq!(p.len(), 3);
        assert_eq!(names(&p), vec![&b"b"[..], &b"a"[..], &b"c"[..]]);
        assert_eq!(p.get(b"a"), Some(&b"2"[..]));
        assert_eq!(p.get(b"x"), None);
    }

    #[test]
    fn test_insert_duplicate() {
        let mut p = FormParams::new();
        p.insert(b"tag".to_vec(), b"a".to_vec());
        p.insert(b"other".to_vec(), b"x".to_vec());
        p.insert(b"tag".to_vec(), b"b".to_vec());
        assert_eq!(p.len(), 2);
        assert_eq!(names(&p), vec![&b"tag"[..], &b"other"[..]]);
        assert_eq!(p.get(b"tag"), Some(&b"b"[..]));
    }

    #[tokio::test]
    async fn test_from_request_method() {
        let body = Some(b"a=1".to_vec());
        let ct = "application/x-www-form-urlencoded";

        let p = FormParams::from_request(&EchoRequest::new("POST", ct, body.clone())).await;
        assert_eq!(p.get(b"a"), Some(&b"1"[..]));

        let p = FormParams::from_request(&EchoRequest::new("GET", ct, body.clone())).await;
        assert!(p.is_empty());

        let p = FormParams::from_request(&EchoRequest::new("PUT", ct, body)).await;
        assert!(p.is_empty());
    }

    #[tokio::test]
    async fn test_from_request_degenerate() {
        let ct = "application/x-www-form-urlencoded";
        let p = FormParams::from_request(&EchoRequest::new("POST", ct, None)).await;
        assert!(p.is_empty());

        let p = FormParams::from_request(&EchoRequest::new("POST", ct, Some(vec![]))).await;
        assert!(p.is_empty());

        let p = FormParams::from_request(&EchoRequest::new(
            "POST",
            "application/json",
            Some(br#"{"a": 1}"#.to_vec()),
        ))
        .await;
        assert!(p.is_empty());

        let p = FormParams::from_request(&EchoRequest::new("POST", "", Some(b"a=1".to_vec()))).await;
        assert!(p.is_empty());

        let p = FormParams::from_request(&EchoRequest::new(
            "POST",
            "multipart/form-data; boundary=xyz",
            Some(b"garbage".to_vec()),
        ))
        .await;
        assert!(p.is_empty());
    }
}

// vim: ts=4 sw=4 expandtab
