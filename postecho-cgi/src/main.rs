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

mod cgi;

use crate::cgi::{Cgi, CgiEnv};
use anyhow::{self as ah, Context as _};
use clap::Parser;
use postecho_seccomp::{seccomp_compile, seccomp_install, Action, Allow};
use std::io;
use tokio::runtime;

#[derive(Parser, Debug, Clone)]
struct Opts {
    /// Do not restrict the process with a seccomp filter.
    #[arg(long, default_value = "false")]
    no_seccomp: bool,
}

fn main() -> ah::Result<()> {
    // stderr goes to the web server's error log.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let opts = Opts::parse();
    let cgi = Cgi::new(CgiEnv::from_env());

    let rt = runtime::Builder::new_current_thread()
        .build()
        .context("Tokio runtime builder")?;

    if !opts.no_seccomp {
        let filter = seccomp_compile(
            &[Allow::Mmap, Allow::Read, Allow::Write, Allow::Futex],
            Action::Kill,
        )
        .context("Compile seccomp filter")?;
        seccomp_install(filter).context("Install seccomp filter")?;
    }

    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();
    rt.block_on(cgi.run(&mut stdin, &mut stdout))
}

// vim: ts=4 sw=4 expandtab
