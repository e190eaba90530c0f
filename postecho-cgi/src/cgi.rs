// -*- coding: utf-8 -*-
//
// POST echo responder
//
// Copyright (C) 2011-2024 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use anyhow::{self as ah, format_err as err, Context as _};
use postecho::{echo, EchoReply, EchoRequest, MAX_POST_BODY_LEN};
use std::{
    env,
    ffi::OsString,
    io::{Read, Write},
};

const MAX_CGIENV_LEN: usize = 1024 * 4;
const MAX_CGIENV_U32_LEN: usize = 10;

fn get_cgienv(name: &str) -> ah::Result<OsString> {
    let value = env::var_os(name).unwrap_or_default();
    if value.len() <= MAX_CGIENV_LEN {
        Ok(value)
    } else {
        Err(err!("Environment variable '{name}' is too long."))
    }
}

fn get_cgienv_str(name: &str) -> ah::Result<String> {
    if let Ok(s) = get_cgienv(name)?.into_string() {
        Ok(s)
    } else {
        Err(err!("Environment variable '{name}' is not valid UTF-8."))
    }
}

fn get_cgienv_u32(name: &str) -> ah::Result<u32> {
    let value = get_cgienv_str(name)?;
    let value = value.trim();
    if value.len() <= MAX_CGIENV_U32_LEN {
        Ok(value.parse::<u32>()?)
    } else {
        Err(err!("Environment variable '{name}' is too long (u32)."))
    }
}

/// Request meta data passed in by the web server.
///
/// Broken variables are treated as not set.
#[derive(Clone, Debug, Default)]
pub struct CgiEnv {
    pub meth: String,
    pub body_len: u32,
    pub body_type: String,
}

impl CgiEnv {
    pub fn from_env() -> Self {
        let meth = get_cgienv_str("REQUEST_METHOD").unwrap_or_else(|e| {
            log::warn!("{e}");
            Default::default()
        });
        let body_len = get_cgienv_u32("CONTENT_LENGTH").unwrap_or_default();
        let body_type = get_cgienv_str("CONTENT_TYPE").unwrap_or_default();
        Self {
            meth: meth.trim().to_string(),
            body_len,
            body_type,
        }
    }
}

fn write_response(f: &mut impl Write, reply: &EchoReply, with_body: bool) -> ah::Result<()> {
    writeln!(f, "Content-Type: {}", reply.mime())?;
    writeln!(f, "Status: {}", reply.status())?;
    writeln!(f)?;
    if with_body {
        f.write_all(reply.body())?;
    }
    f.flush().context("Flush CGI response")
}

pub struct Cgi {
    env: CgiEnv,
    max_body_len: u32,
}

impl Cgi {
    pub fn new(env: CgiEnv) -> Self {
        Self {
            env,
            max_body_len: MAX_POST_BODY_LEN,
        }
    }

    fn read_body(&self, input: &mut impl Read) -> Option<Vec<u8>> {
        if self.env.meth != "POST" || self.env.body_len == 0 {
            return None;
        }
        if self.env.body_len > self.max_body_len {
            log::warn!(
                "POST: CONTENT_LENGTH {} exceeds the limit of {} bytes. Ignoring body.",
                self.env.body_len,
                self.max_body_len
            );
            return None;
        }
        let mut body = vec![0; self.env.body_len.try_into().ok()?];
        if let Err(e) = input.read_exact(&mut body) {
            log::warn!("CGI stdin read failed: {e}");
            return None;
        }
        Some(body)
    }

    pub async fn run(&self, input: &mut impl Read, output: &mut impl Write) -> ah::Result<()> {
        let body = self.read_body(input);
        let request = EchoRequest::new(&self.env.meth, &self.env.body_type, body);
        let reply = echo(&request).await;
        write_response(output, &reply, !request.is_head())
    }
}


// vim: ts=4 sw=4 expandtab
