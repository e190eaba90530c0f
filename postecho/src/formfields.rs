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

use crate::params::FormParams;
use anyhow::{self as ah, Context as _};
use multer::{parse_boundary, Multipart};

/// Parse a `multipart/form-data` body.
///
/// File upload parts are not POST variables and are skipped.
pub async fn parse_multipart(body: &[u8], body_mime: &str) -> ah::Result<FormParams> {
    let boundary = parse_boundary(body_mime).context("Parse form-data boundary")?;
    let mut multipart = Multipart::with_reader(body, boundary);
    let mut params = FormParams::new();
    while let Some(field) = multipart.next_field().await.context("Multipart field")? {
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name() else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        let name = name.as_bytes().to_vec();
        let data = field.bytes().await.context("Multipart field data")?;
        params.insert(name, data.to_vec());
    }
    Ok(params)
}


// vim: ts=4 sw=4 expandtab
