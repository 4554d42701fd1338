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

/// Determine whether the given name is "safe" as a single archive path
/// segment.
///
/// This is used to validate mailbox hierarchical names and serialized
/// message ids before they become archive member names. It excludes empty
/// names and patterns that cause directory traversal or other unwanted
/// behaviours when the archive is extracted with an ordinary ZIP tool.
///
/// The mailbox hierarchy delimiter (`.`) is not a path separator at the
/// archive level, so a full hierarchical name like `INBOX.Drafts` is a
/// single segment.
pub fn is_safe_name(name: &str) -> bool {
    !name.is_empty() &&
        // Block directory traversal through .. and creation of hidden files
        // on UNIX
        name.chars().next() != Some('.') &&
        // '/' is the archive path separator and would change the entry's
        // position in the tree
        name.find('/').is_none() &&
        // Only a path separator on Windows, but always block since it has
        // high potential of causing problems
        name.find('\\').is_none() &&
        // Don't allow any ASCII control characters
        name.find(|c| c < ' ' || c == '\x7F').is_none()
}

/// Determine whether the given annotation key is safe to embed in an
/// archive member name.
///
/// Annotation keys are slash-delimited paths in their own right (e.g.
/// `/vendor/note`), so `/` is allowed, including leading separators and
/// empty interior segments. What is not allowed is anything that could make
/// an extracting tool walk out of the archive root, plus control
/// characters.
pub fn is_safe_annotation_key(key: &str) -> bool {
    !key.is_empty()
        && key.split('/').all(|seg| seg != "." && seg != "..")
        && key.find('\\').is_none()
        && key.find(|c: char| c < ' ' || c == '\x7F').is_none()
}
