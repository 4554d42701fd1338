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

//! Reconstruction of mailbox state from a backup archive.
//!
//! The reader walks entries in central-directory order and classifies each
//! one by name. Since the archive may have been written by another tool,
//! or by a newer version of this codec, decoding is deliberately
//! forgiving: a problem with one entry (unknown name, malformed or missing
//! metadata) drops that entry and records an `EntryIssue`, while the rest
//! of the archive is still reconstructed. Only I/O failures and structural
//! format violations abort.
//!
//! Annotations are accumulated per mailbox path and attached once the
//! whole archive has been seen, because a foreign writer is free to place
//! annotation entries anywhere relative to their mailbox's own entry (our
//! own writer keeps them adjacent). Messages, by contrast, are delivered
//! through a lazy iterator that buffers one message body at a time; a
//! restore of millions of messages never holds more than the largest
//! single body in memory.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::io::{Read, Seek};

use chrono::prelude::*;
use log::{debug, warn};

use super::container::Container;
use super::entry_name::{classify, EntryKind};
use crate::account::model::{
    Annotation, Flag, Mailbox, MailboxId, MailboxWithAnnotations,
    MessageMetadata, Uid,
};
use crate::support::error::Error;

/// A non-fatal problem with one archive entry.
///
/// Issues are aggregated and returned alongside the successfully
/// reconstructed data so that a restore which recovers most of an archive
/// can still say exactly what it could not recover, and why.
#[derive(Debug)]
pub struct EntryIssue {
    /// Position of the entry in central-directory order.
    pub index: usize,
    /// The entry's name, if it could be read at all.
    pub name: String,
    pub error: Error,
}

impl EntryIssue {
    /// See `Error::is_fatal`. A fatal issue terminates iteration.
    pub fn is_fatal(&self) -> bool {
        self.error.is_fatal()
    }
}

impl fmt::Display for EntryIssue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "entry #{} `{}`: {}", self.index, self.name, self.error)
    }
}

/// The mailboxes recovered from an archive, with any per-entry issues
/// encountered along the way.
#[derive(Debug)]
pub struct RestoredMailboxes {
    /// Recovered mailboxes, in archive order, each with its annotations in
    /// archive order.
    pub mailboxes: Vec<MailboxWithAnnotations>,
    pub issues: Vec<EntryIssue>,
}

/// One message recovered from an archive.
#[derive(Debug)]
pub struct RestoredMessage {
    pub metadata: MessageMetadata,
    pub content: Vec<u8>,
}

/// Reads a backup archive from any seekable byte source.
pub struct BackupReader<R: Read + Seek> {
    container: Container<R>,
}

impl<R: Read + Seek> BackupReader<R> {
    /// Open `source`, failing with `Error::InvalidArchive` (distinct from
    /// `Error::Io`) if it is not structurally an archive.
    pub fn open(source: R) -> Result<Self, Error> {
        Ok(BackupReader { container: Container::open(source)? })
    }

    pub fn entry_count(&self) -> usize {
        self.container.len()
    }

    /// Reconstruct every mailbox in the archive, with annotations
    /// attached.
    ///
    /// This is a full pass over the entry list (message content is not
    /// read). A mailbox entry whose mandatory metadata is missing or
    /// malformed is dropped and reported; annotations for a mailbox that
    /// has no entry of its own are reported as orphaned.
    pub fn mailboxes(&mut self) -> Result<RestoredMailboxes, Error> {
        let mut mailboxes: Vec<(String, Mailbox)> = Vec::new();
        let mut seen = HashSet::new();
        // path => (first annotation entry index/name, annotations so far)
        let mut accumulated: BTreeMap<String, (usize, String, Vec<Annotation>)> =
            BTreeMap::new();
        let mut issues = Vec::new();

        for index in 0..self.container.len() {
            let mut entry = self.container.entry(index)?;
            let name = entry.name().to_owned();

            match classify(&name) {
                EntryKind::MailboxDirectory(path) => {
                    let path = path.to_owned();
                    let fields = match entry.parse_fields() {
                        Ok(fields) => fields,
                        Err(error) if !error.is_fatal() => {
                            warn!("skipping mailbox entry `{}`: {}", name, error);
                            issues.push(EntryIssue { index, name, error });
                            continue;
                        },
                        Err(error) => return Err(error),
                    };

                    let id = match fields.mailbox_id() {
                        Some(id) => id.clone(),
                        None => {
                            issues.push(EntryIssue {
                                index,
                                name,
                                error: Error::MissingExtraField("mailbox id"),
                            });
                            continue;
                        },
                    };
                    let uid_validity = match fields.uid_validity() {
                        Some(validity) => validity,
                        None => {
                            issues.push(EntryIssue {
                                index,
                                name,
                                error: Error::MissingExtraField(
                                    "UID validity",
                                ),
                            });
                            continue;
                        },
                    };

                    if !seen.insert(path.clone()) {
                        issues.push(EntryIssue {
                            index,
                            name,
                            error: Error::DuplicateMailbox(path.clone()),
                        });
                    }
                    mailboxes.push((
                        path.clone(),
                        Mailbox { id, name: path, uid_validity },
                    ));
                },

                EntryKind::Annotation { mailbox, key } => {
                    let mailbox = mailbox.to_owned();
                    let key = key.to_owned();
                    let mut value = Vec::new();
                    entry.read_to_end(&mut value)?;

                    accumulated
                        .entry(mailbox)
                        .or_insert_with(|| (index, name, Vec::new()))
                        .2
                        .push(Annotation { key, value });
                },

                EntryKind::AnnotationsDirectory(..) | EntryKind::Message(..) => {
                },

                EntryKind::Unknown => {
                    warn!("ignoring unclassifiable entry `{}`", name);
                    issues.push(EntryIssue {
                        index,
                        name,
                        error: Error::UnclassifiableEntry,
                    });
                },
            }
        }

        // All entries seen; attach annotations to their mailboxes. The
        // first occurrence of a path claims them (duplicate paths were
        // reported above).
        let mut out = Vec::with_capacity(mailboxes.len());
        for (path, mailbox) in mailboxes {
            let annotations = accumulated
                .remove(&path)
                .map(|(_, _, annotations)| annotations)
                .unwrap_or_default();
            out.push(MailboxWithAnnotations { mailbox, annotations });
        }

        for (path, (index, name, _)) in accumulated {
            warn!("annotations for `{}` have no mailbox entry", path);
            issues.push(EntryIssue {
                index,
                name,
                error: Error::OrphanAnnotations(path),
            });
        }

        debug!(
            "recovered {} mailboxes with {} issues",
            out.len(),
            issues.len()
        );
        Ok(RestoredMailboxes { mailboxes: out, issues })
    }

    /// Iterate the messages in the archive, in archive order.
    ///
    /// Each item is either a recovered message or the issue that made one
    /// entry unrecoverable; a fatal issue (I/O, structural corruption)
    /// ends the iteration. Message content is buffered one entry at a
    /// time.
    pub fn messages(&mut self) -> Messages<'_, R> {
        let len = self.container.len();
        Messages { container: &mut self.container, len, next: 0, fatal: false }
    }
}

/// Lazy message iterator; see `BackupReader::messages`.
pub struct Messages<'a, R: Read + Seek> {
    container: &'a mut Container<R>,
    len: usize,
    next: usize,
    fatal: bool,
}

impl<'a, R: Read + Seek> Iterator for Messages<'a, R> {
    type Item = Result<RestoredMessage, EntryIssue>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.fatal && self.next < self.len {
            let index = self.next;
            self.next += 1;

            let mut entry = match self.container.entry(index) {
                Ok(entry) => entry,
                Err(error) => {
                    self.fatal = error.is_fatal();
                    return Some(Err(EntryIssue {
                        index,
                        name: String::new(),
                        error,
                    }));
                },
            };
            let name = entry.name().to_owned();

            match classify(&name) {
                EntryKind::Message(..) => (),
                _ => continue,
            }

            let fields = match entry.parse_fields() {
                Ok(fields) => fields,
                Err(error) => {
                    warn!("skipping message entry `{}`: {}", name, error);
                    return Some(Err(EntryIssue { index, name, error }));
                },
            };

            let id = match fields.message_id() {
                Some(id) => id.clone(),
                None => {
                    warn!("message entry `{}` has no message id", name);
                    return Some(Err(EntryIssue {
                        index,
                        name,
                        error: Error::MissingExtraField("message id"),
                    }));
                },
            };
            let size = match fields.size() {
                Some(size) => size,
                None => {
                    warn!("message entry `{}` has no size", name);
                    return Some(Err(EntryIssue {
                        index,
                        name,
                        error: Error::MissingExtraField("size"),
                    }));
                },
            };

            if fields.mailbox_id().is_none()
                || fields.uid().is_none()
                || fields.internal_date().is_none()
                || fields.flags().is_none()
            {
                debug!(
                    "message entry `{}` lacks optional metadata; \
                     using defaults",
                    name
                );
            }

            let metadata = MessageMetadata {
                id,
                mailbox_id: fields
                    .mailbox_id()
                    .cloned()
                    .unwrap_or_else(|| MailboxId(String::new())),
                uid: fields.uid().unwrap_or(Uid(0)),
                size,
                internal_date: fields.internal_date().unwrap_or_else(epoch),
                flags: fields.flags().map(<[Flag]>::to_vec).unwrap_or_default(),
            };

            // The entry's own size is a hint for preallocation only; a
            // hostile archive can declare anything here.
            let mut content =
                Vec::with_capacity(entry.size().min(1 << 20) as usize);
            if let Err(e) = entry.read_to_end(&mut content) {
                self.fatal = true;
                return Some(Err(EntryIssue {
                    index,
                    name,
                    error: Error::Io(e),
                }));
            }

            return Some(Ok(RestoredMessage { metadata, content }));
        }

        None
    }
}

fn epoch() -> DateTime<Utc> {
    Utc.timestamp_millis_opt(0).single().expect("epoch is representable")
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use proptest::prelude::*;

    use super::*;
    use crate::account::model::*;
    use crate::backup::container::ContainerWriter;
    use crate::backup::extra_field::ExtraField;
    use crate::backup::writer::test::*;
    use crate::backup::writer::{write_backup, BackupMessage};

    fn reader_over(
        mailboxes: &[MailboxWithAnnotations],
        messages: Vec<Result<BackupMessage<&[u8]>, Error>>,
    ) -> BackupReader<Cursor<Vec<u8>>> {
        let sink =
            write_backup(mailboxes, messages, Cursor::new(Vec::new())).unwrap();
        BackupReader::open(Cursor::new(sink.into_inner())).unwrap()
    }

    fn collect_messages<R: Read + Seek>(
        reader: &mut BackupReader<R>,
    ) -> (Vec<RestoredMessage>, Vec<EntryIssue>) {
        let mut messages = Vec::new();
        let mut issues = Vec::new();
        for item in reader.messages() {
            match item {
                Ok(message) => messages.push(message),
                Err(issue) => issues.push(issue),
            }
        }
        (messages, issues)
    }

    #[test]
    fn empty_archive_reads_back_empty() {
        let mut reader = reader_over(&[], no_messages());

        assert_eq!(0, reader.entry_count());
        let restored = reader.mailboxes().unwrap();
        assert!(restored.mailboxes.is_empty());
        assert!(restored.issues.is_empty());
        let (messages, issues) = collect_messages(&mut reader);
        assert!(messages.is_empty());
        assert!(issues.is_empty());
    }

    #[test]
    fn full_round_trip() {
        let input = vec![
            annotated(
                mailbox("mb-1", "INBOX", 100),
                vec![("/vendor/note", b"hello"), ("/vendor/note", b"world")],
            ),
            mailbox("mb-2", "INBOX.Drafts", 101),
        ];
        let meta_1 = metadata("msg-1", "mb-1", 1, 6);
        let meta_2 = metadata("msg-2", "mb-2", 9, 7);

        let mut reader = reader_over(
            &input,
            vec![
                message(meta_1.clone(), b"Body 1"),
                message(meta_2.clone(), b"Body 02"),
            ],
        );

        let restored = reader.mailboxes().unwrap();
        assert!(restored.issues.is_empty());
        assert_eq!(input, restored.mailboxes);

        let (messages, issues) = collect_messages(&mut reader);
        assert!(issues.is_empty());
        assert_eq!(2, messages.len());
        assert_eq!(meta_1, messages[0].metadata);
        assert_eq!(b"Body 1".to_vec(), messages[0].content);
        assert_eq!(meta_2, messages[1].metadata);
        assert_eq!(b"Body 02".to_vec(), messages[1].content);
    }

    #[test]
    fn orphan_child_mailbox_round_trips() {
        let input = vec![mailbox("mb-2", "INBOX.Drafts", 101)];
        let mut reader = reader_over(&input, no_messages());

        let restored = reader.mailboxes().unwrap();
        assert!(restored.issues.is_empty());
        assert_eq!(input, restored.mailboxes);
    }

    #[test]
    fn non_adjacent_annotations_still_attach() {
        // A foreign writer may interleave entries arbitrarily; write the
        // annotation after an unrelated message entry.
        let mut writer = ContainerWriter::new(Cursor::new(Vec::new()));
        writer
            .add_directory(
                "INBOX/",
                &[
                    ExtraField::MailboxId(MailboxId("mb-1".to_owned())),
                    ExtraField::UidValidity(100),
                ],
            )
            .unwrap();
        let meta = metadata("msg-1", "mb-1", 1, 6);
        writer
            .add_entry(
                "msg-1",
                &[
                    ExtraField::Size(meta.size),
                    ExtraField::MessageId(meta.id.clone()),
                ],
                &mut &b"Body 1"[..],
            )
            .unwrap();
        writer
            .add_entry(
                "INBOX/annotations//vendor/note",
                &[],
                &mut &b"late"[..],
            )
            .unwrap();
        let sink = writer.finish().unwrap();

        let mut reader =
            BackupReader::open(Cursor::new(sink.into_inner())).unwrap();
        let restored = reader.mailboxes().unwrap();
        assert!(restored.issues.is_empty());
        assert_eq!(1, restored.mailboxes.len());
        assert_eq!(
            vec![Annotation {
                key: "/vendor/note".to_owned(),
                value: b"late".to_vec(),
            }],
            restored.mailboxes[0].annotations
        );
    }

    #[test]
    fn orphan_annotations_are_reported() {
        let mut writer = ContainerWriter::new(Cursor::new(Vec::new()));
        writer
            .add_entry("Gone/annotations/key", &[], &mut &b"x"[..])
            .unwrap();
        let sink = writer.finish().unwrap();

        let mut reader =
            BackupReader::open(Cursor::new(sink.into_inner())).unwrap();
        let restored = reader.mailboxes().unwrap();
        assert!(restored.mailboxes.is_empty());
        assert_eq!(1, restored.issues.len());
        assert!(matches!(
            restored.issues[0].error,
            Error::OrphanAnnotations(..)
        ));
        assert!(!restored.issues[0].is_fatal());
    }

    #[test]
    fn unknown_entries_are_reported_and_skipped() {
        let mut writer = ContainerWriter::new(Cursor::new(Vec::new()));
        writer
            .add_entry("deep/path/of/foreign/tool", &[], &mut &b"?"[..])
            .unwrap();
        writer
            .add_directory(
                "INBOX/",
                &[
                    ExtraField::MailboxId(MailboxId("mb-1".to_owned())),
                    ExtraField::UidValidity(100),
                ],
            )
            .unwrap();
        let sink = writer.finish().unwrap();

        let mut reader =
            BackupReader::open(Cursor::new(sink.into_inner())).unwrap();
        let restored = reader.mailboxes().unwrap();
        assert_eq!(1, restored.mailboxes.len());
        assert_eq!(1, restored.issues.len());
        assert!(matches!(
            restored.issues[0].error,
            Error::UnclassifiableEntry
        ));
        assert_eq!("deep/path/of/foreign/tool", restored.issues[0].name);

        // The unknown entry is not a message either
        let (messages, issues) = collect_messages(&mut reader);
        assert!(messages.is_empty());
        assert!(issues.is_empty());
    }

    #[test]
    fn message_missing_mandatory_field_is_dropped_and_reported() {
        let meta = metadata("msg-2", "mb-1", 2, 6);
        let mut writer = ContainerWriter::new(Cursor::new(Vec::new()));
        // No MessageId field
        writer
            .add_entry(
                "msg-1",
                &[ExtraField::Size(6)],
                &mut &b"Body 1"[..],
            )
            .unwrap();
        writer
            .add_entry(
                "msg-2",
                &[
                    ExtraField::Size(meta.size),
                    ExtraField::Uid(meta.uid),
                    ExtraField::MessageId(meta.id.clone()),
                    ExtraField::MailboxId(meta.mailbox_id.clone()),
                    ExtraField::InternalDate(meta.internal_date),
                    ExtraField::Flags(meta.flags.clone()),
                ],
                &mut &b"Body 2"[..],
            )
            .unwrap();
        let sink = writer.finish().unwrap();

        let mut reader =
            BackupReader::open(Cursor::new(sink.into_inner())).unwrap();
        let (messages, issues) = collect_messages(&mut reader);

        assert_eq!(1, messages.len());
        assert_eq!(meta, messages[0].metadata);
        assert_eq!(1, issues.len());
        assert_eq!("msg-1", issues[0].name);
        assert!(matches!(
            issues[0].error,
            Error::MissingExtraField("message id")
        ));
        assert!(!issues[0].is_fatal());
    }

    #[test]
    fn malformed_extra_field_is_reported_per_entry() {
        let mut writer = ContainerWriter::new(Cursor::new(Vec::new()));
        // Structurally valid block framing, but a size payload of the
        // wrong width
        writer
            .add_raw_entry(
                "msg-1",
                &[b's', b'z', 4, 0, 1, 2, 3, 4],
                b"Body 1",
            )
            .unwrap();
        let sink = writer.finish().unwrap();

        let mut reader =
            BackupReader::open(Cursor::new(sink.into_inner())).unwrap();
        let (messages, issues) = collect_messages(&mut reader);

        assert!(messages.is_empty());
        assert_eq!(1, issues.len());
        assert!(matches!(
            issues[0].error,
            Error::MalformedExtraField("size")
        ));
    }

    #[test]
    fn foreign_extra_tags_do_not_disturb_messages() {
        let meta = metadata("msg-1", "mb-1", 1, 6);
        let mut extra = vec![0x09, 0x64, 3, 0, 1, 2, 3];
        extra.extend(
            crate::backup::extra_field::encode(&[
                ExtraField::Size(meta.size),
                ExtraField::Uid(meta.uid),
                ExtraField::MessageId(meta.id.clone()),
                ExtraField::MailboxId(meta.mailbox_id.clone()),
                ExtraField::InternalDate(meta.internal_date),
                ExtraField::Flags(meta.flags.clone()),
            ])
            .unwrap(),
        );

        let mut writer = ContainerWriter::new(Cursor::new(Vec::new()));
        writer.add_raw_entry("msg-1", &extra, b"Body 1").unwrap();
        let sink = writer.finish().unwrap();

        let mut reader =
            BackupReader::open(Cursor::new(sink.into_inner())).unwrap();
        let (messages, issues) = collect_messages(&mut reader);

        assert!(issues.is_empty());
        assert_eq!(1, messages.len());
        assert_eq!(meta, messages[0].metadata);
    }

    #[test]
    fn duplicate_mailbox_paths_reported_annotations_go_to_first() {
        let mut writer = ContainerWriter::new(Cursor::new(Vec::new()));
        for id in &["mb-1", "mb-2"] {
            writer
                .add_directory(
                    "INBOX/",
                    &[
                        ExtraField::MailboxId(MailboxId((*id).to_owned())),
                        ExtraField::UidValidity(100),
                    ],
                )
                .unwrap();
        }
        writer
            .add_entry("INBOX/annotations/key", &[], &mut &b"x"[..])
            .unwrap();
        let sink = writer.finish().unwrap();

        let mut reader =
            BackupReader::open(Cursor::new(sink.into_inner())).unwrap();
        let restored = reader.mailboxes().unwrap();

        assert_eq!(2, restored.mailboxes.len());
        assert_eq!(1, restored.mailboxes[0].annotations.len());
        assert!(restored.mailboxes[1].annotations.is_empty());
        assert_eq!(1, restored.issues.len());
        assert!(matches!(
            restored.issues[0].error,
            Error::DuplicateMailbox(..)
        ));
    }

    #[test]
    fn file_backed_round_trip() {
        let input = vec![mailbox("mb-1", "INBOX", 100)];
        let meta = metadata("msg-1", "mb-1", 1, 6);

        let file = write_backup(
            &input,
            vec![message(meta.clone(), b"Body 1")],
            tempfile::tempfile().unwrap(),
        )
        .unwrap();

        let mut reader = BackupReader::open(file).unwrap();
        let restored = reader.mailboxes().unwrap();
        assert_eq!(input, restored.mailboxes);
        let (messages, issues) = collect_messages(&mut reader);
        assert!(issues.is_empty());
        assert_eq!(meta, messages[0].metadata);
        assert_eq!(b"Body 1".to_vec(), messages[0].content);
    }

    fn arb_flag() -> impl Strategy<Value = Flag> {
        prop_oneof![
            Just(Flag::Answered),
            Just(Flag::Deleted),
            Just(Flag::Draft),
            Just(Flag::Flagged),
            Just(Flag::Recent),
            Just(Flag::Seen),
            "[A-Za-z]{1,8}".prop_map(Flag::Keyword),
        ]
    }

    fn arb_mailboxes(
    ) -> impl Strategy<Value = Vec<(String, Vec<(String, Vec<u8>)>)>> {
        prop::collection::btree_map(
            "[A-Za-z0-9]{1,8}(\\.[A-Za-z0-9]{1,8}){0,2}",
            prop::collection::vec(
                ("/[a-z]{1,6}/[a-z]{1,6}", prop::collection::vec(any::<u8>(), 0..32)),
                0..3,
            ),
            0..4,
        )
        .prop_map(|m| m.into_iter().collect())
    }

    fn arb_messages() -> impl Strategy<
        Value = Vec<(String, (Vec<u8>, u64, u64, i64, Vec<Flag>))>,
    > {
        prop::collection::btree_map(
            "[a-z0-9]{1,12}",
            (
                prop::collection::vec(any::<u8>(), 0..256),
                any::<u64>(),
                any::<u64>(),
                -30_000_000_000_000..30_000_000_000_000i64,
                prop::collection::vec(arb_flag(), 0..4),
            ),
            0..4,
        )
        .prop_map(|m| m.into_iter().collect())
    }

    proptest! {
        #[test]
        fn round_trip_is_lossless(
            mailboxes in arb_mailboxes(),
            messages in arb_messages(),
        ) {
            let input_mailboxes: Vec<MailboxWithAnnotations> = mailboxes
                .into_iter()
                .enumerate()
                .map(|(ix, (name, annotations))| MailboxWithAnnotations {
                    mailbox: Mailbox {
                        id: MailboxId(format!("mb-{}", ix)),
                        name,
                        uid_validity: ix as u32,
                    },
                    annotations: annotations
                        .into_iter()
                        .map(|(key, value)| Annotation { key, value })
                        .collect(),
                })
                .collect();

            let input_messages: Vec<(MessageMetadata, Vec<u8>)> = messages
                .into_iter()
                .enumerate()
                .map(|(ix, (id, (content, uid, size, millis, flags)))| {
                    (
                        MessageMetadata {
                            id: MessageId(id),
                            mailbox_id: MailboxId(format!("mb-{}", ix)),
                            uid: Uid(uid),
                            size,
                            internal_date: Utc
                                .timestamp_millis_opt(millis)
                                .single()
                                .unwrap(),
                            flags,
                        },
                        content,
                    )
                })
                .collect();

            let sink = write_backup(
                &input_mailboxes,
                input_messages.iter().map(|(meta, content)| {
                    Ok(BackupMessage {
                        metadata: meta.clone(),
                        content: &content[..],
                    })
                }),
                Cursor::new(Vec::new()),
            )
            .unwrap();

            let mut reader =
                BackupReader::open(Cursor::new(sink.into_inner())).unwrap();

            let restored = reader.mailboxes().unwrap();
            prop_assert!(restored.issues.is_empty());
            prop_assert_eq!(&input_mailboxes, &restored.mailboxes);

            let mut restored_messages = Vec::new();
            for item in reader.messages() {
                restored_messages.push(item.unwrap());
            }
            prop_assert_eq!(input_messages.len(), restored_messages.len());
            for ((meta, content), restored) in
                input_messages.iter().zip(&restored_messages)
            {
                prop_assert_eq!(meta, &restored.metadata);
                prop_assert_eq!(content, &restored.content);
            }
        }
    }
}
