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

//! The data model shared between the backup writer and reader.
//!
//! All of these values are constructed by the mailbox store and passed
//! through the codec unchanged. The codec never assigns ids, never reorders
//! anything, and never looks inside message content.

use std::fmt;
use std::str::FromStr;

use chrono::prelude::*;
use serde::{Deserialize, Serialize};

use crate::support::error::Error;

/// The delimiter between the segments of a hierarchical mailbox name.
///
/// This is the classic IMAP namespace delimiter, so `INBOX.Drafts` names a
/// child of `INBOX`. Note that the hierarchy it implies is nothing more
/// than a naming convention as far as this crate is concerned; a mailbox
/// whose parent does not exist is perfectly representable.
pub const MAILBOX_DELIM: char = '.';

/// The store-assigned identity of a mailbox.
///
/// This is opaque to the codec beyond being a serializable string. It is
/// stable across backup and restore, unlike the mailbox name, which merely
/// describes the mailbox's position in the hierarchy at backup time.
#[derive(
    Deserialize, Serialize, Clone, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(transparent)]
pub struct MailboxId(pub String);

impl fmt::Debug for MailboxId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MailboxId({})", self.0)
    }
}

impl fmt::Display for MailboxId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The store-assigned, globally-unique identity of a message.
///
/// The serialized form doubles as the message's archive entry name, though
/// identity on restore is always taken from the decoded metadata and never
/// from the entry name (entry names in an archive are not required to be
/// unique).
#[derive(
    Deserialize, Serialize, Clone, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl fmt::Debug for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MessageId({})", self.0)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies a message within a single mailbox.
///
/// UIDs increase monotonically as messages are added to a mailbox and are
/// never reused, but this crate treats them as opaque numbers to be carried
/// through the archive; it neither assigns nor orders by them.
#[derive(
    Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(transparent)]
pub struct Uid(pub u64);

impl fmt::Debug for Uid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Uid({})", self.0)
    }
}

/// A mailbox as it exists in the archive: identity, position in the name
/// hierarchy, and the UID validity the owning protocol layer needs to make
/// sense of the mailbox's UIDs after a restore.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Mailbox {
    pub id: MailboxId,
    /// Full hierarchical name, delimited by `MAILBOX_DELIM`.
    pub name: String,
    pub uid_validity: u32,
}

/// One annotation on a mailbox: a namespaced key (e.g. `/vendor/note`) and
/// an opaque byte payload.
///
/// A mailbox may carry several annotations with the same key. They are
/// distinct records and must stay distinct through a backup/restore cycle.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Annotation {
    pub key: String,
    pub value: Vec<u8>,
}

/// A mailbox together with its annotations, in the order the store supplied
/// them.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct MailboxWithAnnotations {
    pub mailbox: Mailbox,
    pub annotations: Vec<Annotation>,
}

/// Everything known about a message other than its content.
///
/// `size` is the length of the content in bytes. It is carried as metadata
/// (rather than derived from the content on demand) so that a reader can
/// report sizes without decompressing entries.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct MessageMetadata {
    pub id: MessageId,
    pub mailbox_id: MailboxId,
    pub uid: Uid,
    pub size: u64,
    /// The `INTERNALDATE` of the message. The archive stores this with
    /// millisecond precision and no zone, so it is a plain instant here.
    pub internal_date: DateTime<Utc>,
    pub flags: Vec<Flag>,
}

/// A message flag.
///
/// System flags are represented as top-level enum values. Keywords are in
/// the `Keyword` case.
///
/// The `Display` format of this type is the exact string value that would
/// be sent over the wire, and the exact string stored in the archive.
/// `FromStr` does the reverse conversion, and also understands non-standard
/// casing of the system flags.
#[derive(Clone, Serialize, Deserialize)]
pub enum Flag {
    Answered,
    Deleted,
    Draft,
    Flagged,
    Recent,
    Seen,
    Keyword(String),
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            &Flag::Answered => write!(f, "\\Answered"),
            &Flag::Deleted => write!(f, "\\Deleted"),
            &Flag::Draft => write!(f, "\\Draft"),
            &Flag::Flagged => write!(f, "\\Flagged"),
            &Flag::Recent => write!(f, "\\Recent"),
            &Flag::Seen => write!(f, "\\Seen"),
            &Flag::Keyword(ref kw) => write!(f, "{}", kw),
        }
    }
}

impl fmt::Debug for Flag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        <Flag as fmt::Display>::fmt(self, f)
    }
}

impl FromStr for Flag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        if s.eq_ignore_ascii_case("\\answered") {
            Ok(Flag::Answered)
        } else if s.eq_ignore_ascii_case("\\deleted") {
            Ok(Flag::Deleted)
        } else if s.eq_ignore_ascii_case("\\draft") {
            Ok(Flag::Draft)
        } else if s.eq_ignore_ascii_case("\\flagged") {
            Ok(Flag::Flagged)
        } else if s.eq_ignore_ascii_case("\\recent") {
            Ok(Flag::Recent)
        } else if s.eq_ignore_ascii_case("\\seen") {
            Ok(Flag::Seen)
        } else if s.starts_with("\\") {
            Err(Error::NxFlag)
        } else if s.as_bytes().iter().copied().all(is_atom_char) {
            Ok(Flag::Keyword(s.to_owned()))
        } else {
            Err(Error::UnsafeName)
        }
    }
}

fn is_atom_char(ch: u8) -> bool {
    match ch {
        0..=b' ' => false,
        127..=255 => false,
        b'(' | b')' | b'{' | b'*' | b'%' | b'\\' | b'"' | b']' => false,
        _ => true,
    }
}

impl PartialEq for Flag {
    fn eq(&self, other: &Flag) -> bool {
        match (self, other) {
            (&Flag::Answered, &Flag::Answered) => true,
            (&Flag::Deleted, &Flag::Deleted) => true,
            (&Flag::Draft, &Flag::Draft) => true,
            (&Flag::Flagged, &Flag::Flagged) => true,
            (&Flag::Recent, &Flag::Recent) => true,
            (&Flag::Seen, &Flag::Seen) => true,
            (&Flag::Keyword(ref a), &Flag::Keyword(ref b)) => {
                a.eq_ignore_ascii_case(b)
            },
            _ => false,
        }
    }
}

impl Eq for Flag {}
