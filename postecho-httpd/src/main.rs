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

mod config;
mod http;

use crate::{config::HttpdConfig, http::process_conn};
use anyhow::{self as ah, format_err as err, Context as _};
use clap::Parser;
use std::{net::SocketAddr, num::NonZeroUsize, path::PathBuf, sync::Arc, time::Duration};
use tokio::{
    net::TcpListener,
    runtime,
    signal::unix::{signal, SignalKind},
    sync, task,
};

#[derive(Parser, Debug, Clone)]
struct Opts {
    /// Address to listen on. Overrides the configuration file.
    #[arg(long)]
    listen: Option<SocketAddr>,

    /// Path to the configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Set the number async worker threads.
    #[arg(long, default_value = "3")]
    worker_threads: NonZeroUsize,
}

async fn async_main(opts: Arc<Opts>) -> ah::Result<()> {
    let (main_exit_tx, mut main_exit_rx) = sync::mpsc::channel(1);

    let mut sigterm = signal(SignalKind::terminate()).context("SIGTERM handler")?;
    let mut sigint = signal(SignalKind::interrupt()).context("SIGINT handler")?;
    let mut sighup = signal(SignalKind::hangup()).context("SIGHUP handler")?;

    let config = HttpdConfig::load(opts.config.as_deref())?;
    let listen = opts.listen.unwrap_or(config.listen());
    let (config_tx, config_rx) = sync::watch::channel(Arc::new(config));

    let listener = TcpListener::bind(listen)
        .await
        .with_context(|| format!("Bind socket {listen}"))?;
    log::info!("Listening on {listen}.");

    // Task: Socket handler.
    task::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    let config = config_rx.borrow().clone();
                    // Connection handler.
                    task::spawn(async move {
                        if let Err(e) = process_conn(stream, config).await {
                            log::warn!("Client {peer}: {e:#}");
                        }
                    });
                }
                Err(e) => {
                    let _ = main_exit_tx.send(Err(err!("Socket accept: {e}"))).await;
                    break;
                }
            }
        }
    });

    // Main task.
    let exitcode;
    loop {
        tokio::select! {
            _ = sigterm.recv() => {
                log::info!("SIGTERM: Terminating.");
                exitcode = Ok(());
                break;
            }
            _ = sigint.recv() => {
                exitcode = Err(err!("Interrupted by SIGINT."));
                break;
            }
            _ = sighup.recv() => {
                log::info!("SIGHUP: Reloading.");
                match HttpdConfig::load(opts.config.as_deref()) {
                    Ok(config) => {
                        if opts.listen.is_none() && config.listen() != listen {
                            log::warn!("Changed listen address requires a restart.");
                        }
                        config_tx.send_replace(Arc::new(config));
                    }
                    Err(e) => {
                        log::error!("Keeping old configuration: {e:#}");
                    }
                }
            }
            code = main_exit_rx.recv() => {
                if let Some(code) = code {
                    exitcode = code;
                } else {
                    exitcode = Err(err!("Unknown error code."));
                }
                break;
            }
        }
    }
    exitcode
}

fn main() -> ah::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = Arc::new(Opts::parse());

    runtime::Builder::new_multi_thread()
        .thread_keep_alive(Duration::from_millis(1000))
        .worker_threads(opts.worker_threads.into())
        .enable_all()
        .build()
        .context("Tokio runtime builder")?
        .block_on(async_main(opts))
}

// vim: ts=4 sw=4 expandtab
