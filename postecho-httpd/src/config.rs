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

use anyhow::{self as ah, format_err as err, Context as _};
use configparser::ini::Ini;
use postecho::MAX_POST_BODY_LEN;
use std::{
    net::{Ipv4Addr, SocketAddr},
    path::Path,
};

const CONF_PATH: &str = "/opt/postecho/etc/postecho/httpd.conf";
const SECT: &str = "POSTECHO-HTTPD";
const DEFAULT_PORT: u16 = 8380;

fn parse_u32(s: &str) -> ah::Result<u32> {
    let s = s.trim();
    if let Some(s) = s.strip_prefix("0x") {
        Ok(u32::from_str_radix(s, 16)?)
    } else {
        Ok(s.parse::<u32>()?)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpdConfig {
    listen: SocketAddr,
    max_body_len: u32,
}

impl Default for HttpdConfig {
    fn default() -> Self {
        Self {
            listen: (Ipv4Addr::LOCALHOST, DEFAULT_PORT).into(),
            max_body_len: MAX_POST_BODY_LEN,
        }
    }
}

impl HttpdConfig {
    /// Load the configuration file.
    ///
    /// Without an explicit path the default location is tried.
    /// A missing default file results in the default configuration.
    pub fn load(path: Option<&Path>) -> ah::Result<Self> {
        let path = match path {
            Some(path) => path,
            None => {
                let path = Path::new(CONF_PATH);
                if !path.exists() {
                    return Ok(Default::default());
                }
                path
            }
        };
        let mut ini = Ini::new_cs();
        if let Err(e) = ini.load(path) {
            return Err(err!("Failed to load configuration {path:?}: {e}"));
        };
        Self::from_ini(&ini)
    }

    pub fn parse(text: &str) -> ah::Result<Self> {
        let mut ini = Ini::new_cs();
        if let Err(e) = ini.read(text.to_string()) {
            return Err(err!("Failed to parse configuration: {e}"));
        };
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> ah::Result<Self> {
        let mut conf = Self::default();
        if let Some(listen) = ini.get(SECT, "listen") {
            conf.listen = listen
                .trim()
                .parse()
                .context("Invalid 'listen' address")?;
        }
        if let Some(len) = ini.get(SECT, "max-body-len") {
            conf.max_body_len = parse_u32(&len).context("Invalid 'max-body-len'")?;
        }
        Ok(conf)
    }

    pub fn listen(&self) -> SocketAddr {
        self.listen
    }

    pub fn max_body_len(&self) -> u32 {
        self.max_body_len
    }

    #[cfg(test)]
    pub fn with_max_body_len(max_body_len: u32) -> Self {
        Self {
            max_body_len,
            ..Default::default()
        }
    }
}


// vim: ts=4 sw=4 expandtab
