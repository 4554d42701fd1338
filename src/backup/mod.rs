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

//! Backup and restore of mailbox state as standard ZIP archives.
//!
//! A backup is a single ZIP file. Mailboxes are directory entries named by
//! their hierarchical name (`INBOX.Drafts/`), carrying the mailbox id and
//! UID validity as extra-field metadata. A mailbox's annotations, if it
//! has any, live under a reserved `annotations/` subdirectory, one content
//! entry per annotation (duplicate keys are distinct entries). Messages
//! are content entries at the archive root, named by their serialized
//! message id, carrying size, UID, message id, mailbox id, internal date,
//! and flags as extra-field metadata.
//!
//! Everything that makes this a *mailbox* backup rides in the extra
//! fields, so any ordinary ZIP tool can open an archive, list it, and pull
//! message bodies out of it without knowing about any of this.
//!
//! Writing is a single streaming pass in input order; reading walks the
//! central directory and is tolerant of archives written by other tools
//! (see `reader`). Neither direction ever indexes entries by name, since
//! the format deliberately permits duplicate names.

pub mod container;
pub mod entry_name;
pub mod extra_field;
pub mod reader;
pub mod restore;
pub mod writer;

pub use self::reader::{
    BackupReader, EntryIssue, Messages, RestoredMailboxes, RestoredMessage,
};
pub use self::restore::{
    restore, MailboxStore, ParentPolicy, RestoreOptions, RestoreReport,
};
pub use self::writer::{write_backup, BackupMessage};
