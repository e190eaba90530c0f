// -*- coding: utf-8 -*-
//
// POST echo responder
//
// Copyright (C) 2011-2024 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![forbid(unsafe_code)]

//! Echo the POST variables of an HTTP request back as `text/plain`.
//!
//! The frontends (CGI program, HTTP daemon) build an [EchoRequest]
//! and pass it to [echo], which always produces a `200 Ok` [EchoReply].

mod echo;
mod formfields;
mod params;
mod reply;
mod request;
mod urlencoded;

pub use crate::{
    echo::{echo, render, BANNER},
    params::FormParams,
    reply::{EchoReply, HttpStatus},
    request::{BodyKind, EchoRequest},
};

/// Default upper limit for a request body that is still parsed.
///
/// Larger bodies are not read and are answered as if the request had no body.
pub const MAX_POST_BODY_LEN: u32 = 1024 * 1024;

// vim: ts=4 sw=4 expandtab
