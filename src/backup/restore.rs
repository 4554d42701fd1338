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

//! Replaying a read archive into a live mailbox store.
//!
//! The codec's own contract ends at producing decoded descriptors; actually
//! creating mailboxes and appending messages is the store's business. This
//! module is the seam between the two: a `MailboxStore` trait the store
//! implements, and a `restore` driver that walks a `BackupReader` through
//! it in archive order (mailboxes and their annotations first, then
//! messages).
//!
//! An archive may describe a mailbox whose ancestors are absent, since the
//! writer never synthesizes them. What to do about that on restore is a
//! policy choice the caller makes through `ParentPolicy`; there is no
//! hidden default behaviour beyond "do what the archive says".

use std::collections::HashSet;
use std::io::{Read, Seek};

use log::{debug, warn};

use super::reader::{BackupReader, EntryIssue};
use crate::account::model::{
    Annotation, Mailbox, MailboxId, MessageMetadata, MAILBOX_DELIM,
};
use crate::support::error::Error;

/// The mailbox store, as seen by a restore operation.
pub trait MailboxStore {
    /// Whether a mailbox with the given hierarchical name already exists
    /// in the store.
    fn has_mailbox(&self, name: &str) -> bool;
    /// Create `mailbox` exactly as described, id included.
    fn create_mailbox(&mut self, mailbox: &Mailbox) -> Result<(), Error>;
    /// Mint a placeholder mailbox for an ancestor that is in neither the
    /// archive nor the store. The store assigns the id and UID validity.
    fn create_placeholder(&mut self, name: &str) -> Result<(), Error>;
    fn set_annotation(
        &mut self,
        mailbox: &MailboxId,
        annotation: &Annotation,
    ) -> Result<(), Error>;
    fn append_message(
        &mut self,
        metadata: &MessageMetadata,
        content: &[u8],
    ) -> Result<(), Error>;
}

/// What to do with a mailbox whose ancestors are in neither the archive
/// nor the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParentPolicy {
    /// Ask the store to mint placeholder mailboxes for the missing
    /// ancestors, outermost first, before creating the orphan.
    CreatePlaceholders,
    /// Restore the orphan as-is. The store ends up holding exactly what
    /// the archive held, dangling names and all.
    LeaveOrphaned,
    /// Skip the orphan (and its annotations) and report it.
    Reject,
}

impl Default for ParentPolicy {
    fn default() -> Self {
        ParentPolicy::LeaveOrphaned
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RestoreOptions {
    pub parent_policy: ParentPolicy,
}

/// What a restore operation accomplished, and what it could not.
#[derive(Debug, Default)]
pub struct RestoreReport {
    pub mailboxes: usize,
    pub annotations: usize,
    pub messages: usize,
    /// Ancestor names minted by the store under
    /// `ParentPolicy::CreatePlaceholders`.
    pub placeholders: Vec<String>,
    /// Mailboxes skipped under `ParentPolicy::Reject`, with the reason.
    pub skipped_mailboxes: Vec<(String, Error)>,
    /// Per-entry problems encountered while reading the archive.
    pub issues: Vec<EntryIssue>,
}

/// Replay `reader` into `store`.
///
/// Fatal errors abort with no attempt to undo what was already replayed
/// (the codec has no transaction over the store). Per-entry problems are
/// collected into the report.
pub fn restore<R, S>(
    reader: &mut BackupReader<R>,
    store: &mut S,
    options: &RestoreOptions,
) -> Result<RestoreReport, Error>
where
    R: Read + Seek,
    S: MailboxStore,
{
    let mut report = RestoreReport::default();

    let restored = reader.mailboxes()?;
    report.issues = restored.issues;

    // A parent is "present" if any mailbox in the archive claims the name,
    // wherever it sits in archive order, or if the store already has it.
    let archived: HashSet<&str> = restored
        .mailboxes
        .iter()
        .map(|boxed| boxed.mailbox.name.as_str())
        .collect();

    let mut minted: HashSet<String> = HashSet::new();
    for boxed in &restored.mailboxes {
        let name = &boxed.mailbox.name;

        let missing: Vec<&str> = ancestors(name)
            .filter(|ancestor| {
                !archived.contains(ancestor)
                    && !minted.contains(*ancestor)
                    && !store.has_mailbox(ancestor)
            })
            .collect();

        if !missing.is_empty() {
            match options.parent_policy {
                ParentPolicy::LeaveOrphaned => (),
                ParentPolicy::CreatePlaceholders => {
                    for ancestor in missing {
                        store.create_placeholder(ancestor)?;
                        minted.insert(ancestor.to_owned());
                        report.placeholders.push(ancestor.to_owned());
                    }
                },
                ParentPolicy::Reject => {
                    warn!(
                        "not restoring `{}`: missing parent `{}`",
                        name, missing[0]
                    );
                    report.skipped_mailboxes.push((
                        name.clone(),
                        Error::MissingParent(missing[0].to_owned()),
                    ));
                    continue;
                },
            }
        }

        store.create_mailbox(&boxed.mailbox)?;
        report.mailboxes += 1;
        for annotation in &boxed.annotations {
            store.set_annotation(&boxed.mailbox.id, annotation)?;
            report.annotations += 1;
        }
    }

    for item in reader.messages() {
        match item {
            Ok(message) => {
                store.append_message(&message.metadata, &message.content)?;
                report.messages += 1;
            },
            Err(issue) => {
                if issue.is_fatal() {
                    return Err(issue.error);
                }
                report.issues.push(issue);
            },
        }
    }

    debug!(
        "restored {} mailboxes, {} annotations, {} messages \
         ({} issues, {} skipped)",
        report.mailboxes,
        report.annotations,
        report.messages,
        report.issues.len(),
        report.skipped_mailboxes.len()
    );
    Ok(report)
}

/// The proper ancestors of a hierarchical name, outermost first.
fn ancestors(name: &str) -> impl Iterator<Item = &str> {
    name.match_indices(MAILBOX_DELIM).map(move |(ix, _)| &name[..ix])
}
