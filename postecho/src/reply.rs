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

use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HttpStatus {
    Ok = 200,
    BadRequest = 400,
}

impl fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let text = match self {
            Self::Ok => "Ok",
            Self::BadRequest => "Bad Request",
        };
        write!(f, "{} {}", *self as u16, text)
    }
}

#[derive(Clone, Debug)]
pub struct EchoReply {
    status: HttpStatus,
    body: Vec<u8>,
    mime: String,
}

impl EchoReply {
    pub fn ok(body: Vec<u8>, mime: &str) -> Self {
        Self {
            status: HttpStatus::Ok,
            body,
            mime: mime.to_string(),
        }
    }

    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: HttpStatus::BadRequest,
            body: format!("{}: {}\n", HttpStatus::BadRequest, msg).into_bytes(),
            mime: "text/plain".to_string(),
        }
    }

    pub fn status(&self) -> HttpStatus {
        self.status
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status() {
        assert_eq!(format!("{}", HttpStatus::Ok), "200 Ok");
        assert_eq!(format!("{}", HttpStatus::BadRequest), "400 Bad Request");
    }

    #[test]
    fn test_reply() {
        let r = EchoReply::bad_request("Broken head.");
        assert_eq!(r.status(), HttpStatus::BadRequest);
        assert_eq!(r.mime(), "text/plain");
        assert_eq!(r.body(), b"400 Bad Request: Broken head.\n");

        let r = EchoReply::ok(b"x".to_vec(), "text/plain");
        assert_eq!(r.status(), HttpStatus::Ok);
        assert_eq!(r.body(), b"x");
    }
}

// vim: ts=4 sw=4 expandtab
