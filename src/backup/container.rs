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

//! A thin seam over the `zip` crate: append-only writing and
//! random-access reading of the backup container.
//!
//! Two properties of the archive format are load-bearing and drive the
//! shape of this module:
//!
//! - Duplicate entry names are legal (two annotations may share a key), so
//!   nothing here ever looks an entry up by name; reading is strictly
//!   by index in central-directory order.
//! - Directory entries can carry extra-field metadata. `ZipWriter`'s own
//!   `add_directory` cannot attach extra data, so such entries are written
//!   as zero-length entries whose trailing `/` marks them as directories,
//!   which is what ZIP tools actually key on.
//!
//! Content entries are deflated; directory entries are stored.

use std::io::{self, Read, Seek, Write};

use zip::read::{ZipArchive, ZipFile};
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

use super::extra_field::{self, ExtraField, ParsedFields};
use crate::support::error::Error;

pub struct ContainerWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
}

impl<W: Write + Seek> ContainerWriter<W> {
    pub fn new(sink: W) -> Self {
        ContainerWriter { zip: ZipWriter::new(sink) }
    }

    /// Append a directory entry, with the given metadata fields attached
    /// if any.
    pub fn add_directory(
        &mut self,
        name: &str,
        fields: &[ExtraField],
    ) -> Result<(), Error> {
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Stored);

        if fields.is_empty() {
            self.zip.add_directory(name, options)?;
        } else {
            debug_assert!(name.ends_with('/'));
            self.start_with_fields(name, fields, options)?;
        }

        Ok(())
    }

    /// Append a content entry, streaming `content` into it, and return the
    /// number of content bytes written.
    pub fn add_entry(
        &mut self,
        name: &str,
        fields: &[ExtraField],
        content: &mut impl Read,
    ) -> Result<u64, Error> {
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated);

        if fields.is_empty() {
            self.zip.start_file(name, options)?;
        } else {
            self.start_with_fields(name, fields, options)?;
        }

        Ok(io::copy(content, &mut self.zip)?)
    }

    fn start_with_fields(
        &mut self,
        name: &str,
        fields: &[ExtraField],
        options: FileOptions,
    ) -> Result<(), Error> {
        let extra = extra_field::encode(fields)?;
        self.zip.start_file_with_extra_data(name, options)?;
        self.zip.write_all(&extra)?;
        self.zip.end_extra_data()?;
        Ok(())
    }

    /// Append a content entry with verbatim extra-field bytes, bypassing
    /// the codec. Lets tests fabricate foreign and malformed archives.
    #[cfg(test)]
    pub(crate) fn add_raw_entry(
        &mut self,
        name: &str,
        extra: &[u8],
        content: &[u8],
    ) -> Result<(), Error> {
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated);
        self.zip.start_file_with_extra_data(name, options)?;
        self.zip.write_all(extra)?;
        self.zip.end_extra_data()?;
        self.zip.write_all(content)?;
        Ok(())
    }

    /// Finalize the archive, flushing the central directory, and hand the
    /// sink back.
    ///
    /// Dropping the writer without calling this leaves the sink holding an
    /// incomplete archive, which is the intended outcome of an aborted
    /// backup.
    pub fn finish(mut self) -> Result<W, Error> {
        Ok(self.zip.finish()?)
    }
}

/// Random-access view of an existing container.
pub struct Container<R: Read + Seek> {
    zip: ZipArchive<R>,
}

impl<R: Read + Seek> Container<R> {
    /// Open `source` as a container, failing if it is not structurally a
    /// ZIP archive.
    pub fn open(source: R) -> Result<Self, Error> {
        Ok(Container { zip: ZipArchive::new(source)? })
    }

    pub fn len(&self) -> usize {
        self.zip.len()
    }

    pub fn is_empty(&self) -> bool {
        0 == self.zip.len()
    }

    /// Fetch the entry at `index` in central-directory order.
    pub fn entry(&mut self, index: usize) -> Result<Entry<'_>, Error> {
        Ok(Entry { file: self.zip.by_index(index)? })
    }
}

/// One container entry: name, kind, metadata, and content (via `Read`).
pub struct Entry<'a> {
    file: ZipFile<'a>,
}

impl<'a> Entry<'a> {
    pub fn name(&self) -> &str {
        self.file.name()
    }

    pub fn is_directory(&self) -> bool {
        self.file.is_dir()
    }

    /// Uncompressed content size as recorded by the container itself (as
    /// distinct from the `Size` metadata field).
    pub fn size(&self) -> u64 {
        self.file.size()
    }

    /// Decode this entry's extra-field metadata.
    pub fn parse_fields(&self) -> Result<ParsedFields, Error> {
        extra_field::parse(self.file.extra_data())
    }
}

impl<'a> Read for Entry<'a> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn duplicate_names_both_survive() {
        let mut writer = ContainerWriter::new(Cursor::new(Vec::new()));
        writer
            .add_entry("INBOX/annotations//vendor/note", &[], &mut &b"hello"[..])
            .unwrap();
        writer
            .add_entry("INBOX/annotations//vendor/note", &[], &mut &b"world"[..])
            .unwrap();
        let sink = writer.finish().unwrap();

        let mut container = Container::open(Cursor::new(sink.into_inner())).unwrap();
        assert_eq!(2, container.len());

        let mut contents = Vec::new();
        for ix in 0..container.len() {
            let mut entry = container.entry(ix).unwrap();
            assert_eq!("INBOX/annotations//vendor/note", entry.name());
            let mut content = Vec::new();
            entry.read_to_end(&mut content).unwrap();
            contents.push(content);
        }

        assert_eq!(vec![b"hello".to_vec(), b"world".to_vec()], contents);
    }

    #[test]
    fn directory_entries_carry_fields() {
        let mut writer = ContainerWriter::new(Cursor::new(Vec::new()));
        writer
            .add_directory("INBOX/", &[ExtraField::UidValidity(99)])
            .unwrap();
        let sink = writer.finish().unwrap();

        let mut container = Container::open(Cursor::new(sink.into_inner())).unwrap();
        let entry = container.entry(0).unwrap();
        assert!(entry.is_directory());
        assert_eq!(0, entry.size());
        assert_eq!(Some(99), entry.parse_fields().unwrap().uid_validity());
    }

    #[test]
    fn empty_container_round_trips() {
        let writer = ContainerWriter::new(Cursor::new(Vec::new()));
        let sink = writer.finish().unwrap();

        let container = Container::open(Cursor::new(sink.into_inner())).unwrap();
        assert!(container.is_empty());
    }

    #[test]
    fn garbage_is_not_a_container() {
        assert_matches!(
            Some(Error::InvalidArchive(..)),
            Container::open(Cursor::new(b"not a zip file".to_vec())).err()
        );
    }
}
