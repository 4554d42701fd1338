//-
// Copyright (c) 2026, Jason Lingle
//
// This file is part of Mailzip.
//
// Mailzip is free software: you can  redistribute it and/or modify it under
// the terms of  the GNU General Public  License as published by  the Free
// Software Foundation, either version 3 of the License, or (at your option)
// any later version.
//
// Mailzip is distributed  in the hope that  it will be useful,  but WITHOUT
// ANY WARRANTY; without  even the implied  warranty of MERCHANTABILITY  or
// FITNESS FOR  A PARTICULAR PURPOSE.  See the GNU  General Public  License
// for more details.
//
// You should have received a copy of the GNU General Public License along
// with Mailzip. If not, see <http://www.gnu.org/licenses/>.

use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unsafe mailbox, annotation, or message name")]
    UnsafeName,
    #[error("Unknown system flag")]
    NxFlag,
    #[error("Truncated extra field block")]
    TruncatedExtraField,
    #[error("Malformed {0} extra field")]
    MalformedExtraField(&'static str),
    #[error("Extra field data too long")]
    ExtraFieldTooLong,
    #[error("Missing mandatory {0} extra field")]
    MissingExtraField(&'static str),
    #[error("Entry name does not name a mailbox, annotation, or message")]
    UnclassifiableEntry,
    #[error("Annotations name a mailbox not in the archive: {0}")]
    OrphanAnnotations(String),
    #[error("Duplicate mailbox entry: {0}")]
    DuplicateMailbox(String),
    #[error("Missing parent mailbox: {0}")]
    MissingParent(String),
    #[error("Invalid backup archive: {0}")]
    InvalidArchive(&'static str),
    #[error("Unsupported backup archive: {0}")]
    UnsupportedArchive(&'static str),
    #[error(transparent)]
    Utf8(#[from] std::str::Utf8Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Whether this error dooms the whole backup or restore operation.
    ///
    /// Non-fatal errors concern a single archive entry, which is dropped
    /// from the reconstructed results and reported, while the rest of the
    /// archive is still processed.
    pub fn is_fatal(&self) -> bool {
        matches!(
            *self,
            Error::Io(_)
                | Error::InvalidArchive(_)
                | Error::UnsupportedArchive(_)
        )
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self {
        use zip::result::ZipError as Z;

        match e {
            Z::Io(e) => Error::Io(e),
            Z::InvalidArchive(msg) => Error::InvalidArchive(msg),
            Z::UnsupportedArchive(msg) => Error::UnsupportedArchive(msg),
            Z::FileNotFound => Error::InvalidArchive("entry not found"),
        }
    }
}
