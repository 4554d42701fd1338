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

//! Computation and classification of archive entry names.
//!
//! The naming scheme is deliberately simple enough to survive any
//! conformant ZIP tool:
//!
//! - `Parent.Child/` — a mailbox, as a directory entry. The hierarchical
//!   name is one path segment; `.` is the hierarchy delimiter, not `/`.
//! - `Parent.Child/annotations/` — the annotations directory, present only
//!   when the mailbox has at least one annotation.
//! - `Parent.Child/annotations/<key>` — one annotation. Keys are
//!   slash-delimited paths of their own (`/vendor/note`), so everything
//!   after the `annotations/` marker, slashes included, is the key.
//! - `<serialized message id>` — a message, at the archive root.
//!
//! Since a mailbox name contains no `/`, these four shapes cannot collide,
//! and `classify` is total: any name that fits none of them is `Unknown`.
//!
//! The resolver performs no existence checks; computing the name of an
//! annotation entry does not require the mailbox's own entry to exist
//! anywhere.

use crate::account::model::{Mailbox, MessageMetadata};
use crate::support::error::Error;
use crate::support::safe_name::{is_safe_annotation_key, is_safe_name};

/// The reserved directory name holding a mailbox's annotations.
pub const ANNOTATIONS_DIR: &str = "annotations";

/// The entry name of the mailbox itself, e.g. `INBOX.Drafts/`.
pub fn mailbox_directory(mailbox: &Mailbox) -> Result<String, Error> {
    if !is_safe_name(&mailbox.name) {
        return Err(Error::UnsafeName);
    }

    Ok(format!("{}/", mailbox.name))
}

/// The entry name of the mailbox's annotations directory.
pub fn annotations_directory(mailbox: &Mailbox) -> Result<String, Error> {
    if !is_safe_name(&mailbox.name) {
        return Err(Error::UnsafeName);
    }

    Ok(format!("{}/{}/", mailbox.name, ANNOTATIONS_DIR))
}

/// The entry name of one annotation on the mailbox.
pub fn annotation_entry(
    mailbox: &Mailbox,
    key: &str,
) -> Result<String, Error> {
    if !is_safe_name(&mailbox.name) || !is_safe_annotation_key(key) {
        return Err(Error::UnsafeName);
    }

    Ok(format!("{}/{}/{}", mailbox.name, ANNOTATIONS_DIR, key))
}

/// The entry name of the message, i.e. its serialized id.
pub fn message_entry(metadata: &MessageMetadata) -> Result<String, Error> {
    if !is_safe_name(&metadata.id.0) {
        return Err(Error::UnsafeName);
    }

    Ok(metadata.id.0.clone())
}

/// What an entry name means, as decided by `classify`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind<'a> {
    /// A mailbox directory; the wrapped value is the hierarchical name.
    MailboxDirectory(&'a str),
    /// A mailbox's annotations directory; the wrapped value is the
    /// hierarchical name of the owning mailbox.
    AnnotationsDirectory(&'a str),
    /// One annotation.
    Annotation { mailbox: &'a str, key: &'a str },
    /// A message; the wrapped value is the serialized message id as it
    /// appears in the name. Identity on restore still comes from the
    /// decoded metadata.
    Message(&'a str),
    /// Anything this codec did not write.
    Unknown,
}

/// Classify an entry name.
///
/// Total over arbitrary input: every name the writer can produce maps back
/// to its kind, and any other name (including names written by foreign
/// tools into the same archive) maps to `Unknown`.
pub fn classify(name: &str) -> EntryKind<'_> {
    if name.is_empty() {
        return EntryKind::Unknown;
    }

    let slash = match name.find('/') {
        Some(ix) => ix,
        // No slash anywhere: a message at the archive root
        None => return EntryKind::Message(name),
    };

    let (mailbox, rest) = name.split_at(slash);
    let rest = &rest[1..];
    if mailbox.is_empty() {
        return EntryKind::Unknown;
    }

    if rest.is_empty() {
        return EntryKind::MailboxDirectory(mailbox);
    }

    match rest.strip_prefix(ANNOTATIONS_DIR) {
        Some(sub) => match sub.strip_prefix('/') {
            Some("") => EntryKind::AnnotationsDirectory(mailbox),
            Some(key) => EntryKind::Annotation { mailbox, key },
            None => EntryKind::Unknown,
        },
        None => EntryKind::Unknown,
    }
}
