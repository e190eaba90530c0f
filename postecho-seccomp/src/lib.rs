// -*- coding: utf-8 -*-
//
// POST echo responder
//
// Copyright (C) 2011-2024 Michael Büsch <m@bues.ch>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

#![forbid(unsafe_code)]

use anyhow::{self as ah, Context as _};
use seccompiler::{apply_filter_all_threads, BpfProgram, SeccompAction, SeccompFilter};
use std::{collections::BTreeMap, env::consts::ARCH};

/// Syscalls that every filtered process needs.
const BASE_SYSCALLS: &[libc::c_long] = &[
    libc::SYS_brk,
    libc::SYS_clock_gettime,
    libc::SYS_close,
    libc::SYS_exit,
    libc::SYS_exit_group,
    libc::SYS_getpid,
    libc::SYS_getrandom,
    libc::SYS_gettid,
    libc::SYS_madvise,
    libc::SYS_munmap,
    libc::SYS_rt_sigreturn,
    libc::SYS_sched_getaffinity,
    libc::SYS_sigaltstack,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Allow {
    Mmap,
    Read,
    Write,
    Futex,
}

impl Allow {
    fn syscalls(&self) -> &'static [libc::c_long] {
        match self {
            Self::Mmap => &[libc::SYS_mmap, libc::SYS_mremap, libc::SYS_munmap],
            Self::Read => &[
                libc::SYS_pread64,
                libc::SYS_read,
                libc::SYS_readv,
                libc::SYS_ppoll,
            ],
            Self::Write => &[
                libc::SYS_pwrite64,
                libc::SYS_write,
                libc::SYS_writev,
                libc::SYS_ppoll,
            ],
            Self::Futex => &[
                libc::SYS_futex,
                libc::SYS_get_robust_list,
                libc::SYS_set_robust_list,
            ],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Kill,
    Log,
}

/// A compiled seccomp BPF program.
pub struct Filter(BpfProgram);

impl Filter {
    /// Number of BPF instructions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Compile a filter that allows the base syscalls plus everything in `allow`.
/// All other syscalls trigger `deny_action`.
pub fn seccomp_compile(allow: &[Allow], deny_action: Action) -> ah::Result<Filter> {
    let rules: BTreeMap<_, _> = BASE_SYSCALLS
        .iter()
        .chain(allow.iter().flat_map(|a| a.syscalls()))
        .map(|&nr| (nr as i64, vec![]))
        .collect();

    let filter = SeccompFilter::new(
        rules,
        match deny_action {
            Action::Kill => SeccompAction::KillProcess,
            Action::Log => SeccompAction::Log,
        },
        SeccompAction::Allow,
        ARCH.try_into().context("Unsupported CPU ARCH")?,
    )
    .context("Create seccomp filter")?;

    let filter: BpfProgram = filter.try_into().context("Seccomp to BPF")?;

    Ok(Filter(filter))
}

/// Install the filter for all threads of the process. This can't be undone.
pub fn seccomp_install(filter: Filter) -> ah::Result<()> {
    apply_filter_all_threads(&filter.0).context("Apply seccomp filter")
}


// vim: ts=4 sw=4 expandtab
