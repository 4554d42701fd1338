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

//! Streaming of mailbox state into a backup archive.
//!
//! The writer makes exactly one pass: first the mailboxes (each with its
//! annotations, in the order given), then the messages, pulled one at a
//! time from a lazy sequence that is consumed exactly once and never
//! rewound. Message content is streamed straight into the active entry;
//! nothing is buffered beyond it, so a mail store holding millions of
//! messages can be archived in constant memory.
//!
//! The writer reproduces its input faithfully: no reordering, grouping, or
//! deduplication, no synthesized ancestor mailboxes, and no entry at all
//! for an empty annotation list. Archiving empty input produces a valid
//! zero-entry archive.

use std::io::{Read, Seek, Write};

use log::debug;

use super::container::ContainerWriter;
use super::entry_name;
use super::extra_field::ExtraField;
use crate::account::model::{MailboxWithAnnotations, MessageMetadata};
use crate::support::error::Error;

/// One message to be archived: its metadata plus a content stream.
///
/// The content is read exactly once, to the end, while the message's entry
/// is active.
pub struct BackupMessage<R> {
    pub metadata: MessageMetadata,
    pub content: R,
}

/// Archive `mailboxes` and then `messages` into `sink`.
///
/// `messages` yields `Result`s so that the mail store can fail lazily,
/// mid-iteration; any failure aborts the whole backup. On success the sink
/// is handed back with the central directory flushed. On failure the sink
/// is dropped, leaving whatever partial bytes were written — an incomplete
/// archive, not a corrupted one, since the entry being written at the time
/// was never finalized.
pub fn write_backup<W, R, I>(
    mailboxes: &[MailboxWithAnnotations],
    messages: I,
    sink: W,
) -> Result<W, Error>
where
    W: Write + Seek,
    R: Read,
    I: IntoIterator<Item = Result<BackupMessage<R>, Error>>,
{
    let mut container = ContainerWriter::new(sink);

    let mut annotation_count = 0usize;
    for boxed in mailboxes {
        let mailbox = &boxed.mailbox;
        container.add_directory(
            &entry_name::mailbox_directory(mailbox)?,
            &[
                ExtraField::MailboxId(mailbox.id.clone()),
                ExtraField::UidValidity(mailbox.uid_validity),
            ],
        )?;

        if boxed.annotations.is_empty() {
            continue;
        }

        container
            .add_directory(&entry_name::annotations_directory(mailbox)?, &[])?;
        for annotation in &boxed.annotations {
            container.add_entry(
                &entry_name::annotation_entry(mailbox, &annotation.key)?,
                &[],
                &mut &annotation.value[..],
            )?;
            annotation_count += 1;
        }
    }

    let mut message_count = 0usize;
    for message in messages {
        let mut message = message?;
        let name = entry_name::message_entry(&message.metadata)?;
        container.add_entry(
            &name,
            &message_fields(&message.metadata),
            &mut message.content,
        )?;
        message_count += 1;
    }

    let sink = container.finish()?;
    debug!(
        "archived {} mailboxes, {} annotations, {} messages",
        mailboxes.len(),
        annotation_count,
        message_count
    );
    Ok(sink)
}

fn message_fields(metadata: &MessageMetadata) -> [ExtraField; 6] {
    [
        ExtraField::Size(metadata.size),
        ExtraField::Uid(metadata.uid),
        ExtraField::MessageId(metadata.id.clone()),
        ExtraField::MailboxId(metadata.mailbox_id.clone()),
        ExtraField::InternalDate(metadata.internal_date),
        ExtraField::Flags(metadata.flags.clone()),
    ]
}
