// -*- coding: utf-8 -*-
//
// POST echo responder
//
// Copyright (C) 2011-2024 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::config::HttpdConfig;
use anyhow::{self as ah, format_err as err, Context as _};
use httparse::Status;
use postecho::{echo, EchoReply, EchoRequest};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt as _, AsyncWrite, AsyncWriteExt as _};

const MAX_HEAD_LEN: usize = 1024 * 16;
const MAX_HEADERS: usize = 64;
const RX_STEP: usize = 4096;

/// The parts of an HTTP request head that matter to the echo handler.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestHead {
    pub meth: String,
    pub content_type: String,
    pub content_length: Option<u64>,
    pub chunked: bool,
    pub expect_continue: bool,
    /// Length of the head including the terminating empty line.
    pub len: usize,
}

/// Parse the request head at the start of `buf`.
///
/// Returns `None`, if the head is not complete, yet.
pub fn parse_head(buf: &[u8]) -> ah::Result<Option<RequestHead>> {
    let mut headers = [httparse::EMPTY_HEADER; MAX_HEADERS];
    let mut req = httparse::Request::new(&mut headers);
    let len = match req.parse(buf).context("Parse HTTP request head")? {
        Status::Complete(len) => len,
        Status::Partial => return Ok(None),
    };

    let mut head = RequestHead {
        meth: req.method.unwrap_or_default().to_string(),
        len,
        ..Default::default()
    };
    for header in req.headers.iter() {
        let value = String::from_utf8_lossy(header.value);
        let value = value.trim();
        if header.name.eq_ignore_ascii_case("Content-Type") {
            head.content_type = value.to_string();
        } else if header.name.eq_ignore_ascii_case("Content-Length") {
            let length = value.parse::<u64>().context("Invalid Content-Length")?;
            if head.content_length.is_some_and(|l| l != length) {
                return Err(err!("Conflicting Content-Length headers"));
            }
            head.content_length = Some(length);
        } else if header.name.eq_ignore_ascii_case("Transfer-Encoding") {
            head.chunked |= value.to_ascii_lowercase().contains("chunked");
        } else if header.name.eq_ignore_ascii_case("Expect") {
            head.expect_continue |= value.eq_ignore_ascii_case("100-continue");
        }
    }
    Ok(Some(head))
}

async fn send_reply<S>(stream: &mut S, reply: &EchoReply, with_body: bool) -> ah::Result<()>
where
    S: AsyncWrite + Unpin,
{
    let mut txbuf = format!(
        "HTTP/1.1 {}\r\n\
         Content-Type: {}\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n",
        reply.status(),
        reply.mime(),
        reply.body().len()
    )
    .into_bytes();
    if with_body {
        txbuf.extend_from_slice(reply.body());
    }
    stream.write_all(&txbuf).await.context("Socket write")?;
    stream.flush().await.context("Socket flush")?;
    stream.shutdown().await.context("Socket shutdown")
}

/// Read more data from the stream into `buf`.
/// Returns the number of bytes read. Zero means end of stream.
async fn recv_some<S>(stream: &mut S, buf: &mut Vec<u8>) -> ah::Result<usize>
where
    S: AsyncRead + Unpin,
{
    let mut rxbuf = [0; RX_STEP];
    let n = stream.read(&mut rxbuf).await.context("Socket read")?;
    buf.extend_from_slice(&rxbuf[..n]);
    Ok(n)
}

async fn recv_head<S>(stream: &mut S, buf: &mut Vec<u8>) -> ah::Result<Option<RequestHead>>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    loop {
        match parse_head(buf) {
            Ok(Some(head)) => return Ok(Some(head)),
            Ok(None) => (),
            Err(e) => {
                send_reply(stream, &EchoReply::bad_request("Malformed request head."), true)
                    .await?;
                return Err(e);
            }
        }
        if buf.len() >= MAX_HEAD_LEN {
            send_reply(stream, &EchoReply::bad_request("Request head too long."), true).await?;
            return Err(err!("Request head too long."));
        }
        if recv_some(stream, buf).await? == 0 {
            // Disconnected before sending a full head.
            return Ok(None);
        }
    }
}

/// Read the request body announced in the head.
///
/// `buf` holds the bytes received after the head so far.
/// Bodies that can't or shouldn't be read result in `None`.
async fn recv_body<S>(
    stream: &mut S,
    head: &RequestHead,
    mut buf: Vec<u8>,
    config: &HttpdConfig,
) -> ah::Result<Option<Vec<u8>>>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    if head.chunked {
        log::debug!("Chunked request bodies are not supported. Ignoring body.");
        return Ok(None);
    }
    let length = match head.content_length {
        None | Some(0) => return Ok(None),
        Some(length) => length,
    };
    if length > u64::from(config.max_body_len()) {
        log::warn!(
            "Content-Length {length} exceeds the limit of {} bytes. Ignoring body.",
            config.max_body_len()
        );
        return Ok(None);
    }
    let length: usize = length.try_into().context("Content-Length")?;

    if buf.len() < length {
        if head.expect_continue {
            stream
                .write_all(b"HTTP/1.1 100 Continue\r\n\r\n")
                .await
                .context("Socket write")?;
        }
        let count = buf.len();
        buf.resize(length, 0);
        if let Err(e) = stream.read_exact(&mut buf[count..]).await {
            log::warn!("Read request body: {e}. Ignoring body.");
            return Ok(None);
        }
    }
    buf.truncate(length);
    Ok(Some(buf))
}

/// Serve one request on the connection and close it.
pub async fn process_conn<S>(mut stream: S, config: Arc<HttpdConfig>) -> ah::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut buf = Vec::with_capacity(RX_STEP);
    let Some(head) = recv_head(&mut stream, &mut buf).await? else {
        return Ok(());
    };
    let rest = buf.split_off(head.len);
    let body = recv_body(&mut stream, &head, rest, &config).await?;

    let request = EchoRequest::new(&head.meth, &head.content_type, body);
    let reply = echo(&request).await;
    log::debug!("{} {}", request.method(), reply.status());
    send_reply(&mut stream, &reply, !request.is_head()).await
}


// vim: ts=4 sw=4 expandtab
