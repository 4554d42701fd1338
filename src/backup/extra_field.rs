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

//! Encoding and decoding of the typed metadata records attached to archive
//! entries.
//!
//! Each record occupies one standard ZIP extra-field block so that any
//! conformant ZIP reader can enumerate the archive without understanding
//! them:
//!
//! - `u16` LE: tag
//! - `u16` LE: payload length
//! - `[u8; length]`: payload
//!
//! Payloads themselves are big-endian:
//!
//! - `Size`, `Uid`, `UidValidity`: `u64`
//! - `InternalDate`: `i64`, milliseconds since the UNIX epoch
//! - `MessageId`, `MailboxId`: `u16` length-prefixed UTF-8 string
//! - `Flags`: `u16` count, then that many `u16` length-prefixed UTF-8 flag
//!   names (system flags and keywords alike; no bit-packing, since keywords
//!   are open-ended strings)
//!
//! Tags this codec does not know are not an error: their blocks are
//! surfaced verbatim as "unparsed" so that archives written by a newer
//! codec still restore. A known tag with a malformed payload is an error
//! which the reader charges to the offending entry alone.

use std::convert::TryInto;
use std::str;

use byteorder::{BigEndian, ByteOrder, LittleEndian, WriteBytesExt};
use chrono::prelude::*;

use crate::account::model::{Flag, MailboxId, MessageId, Uid};
use crate::support::error::Error;

const fn tag(b: [u8; 2]) -> u16 {
    u16::from_le_bytes(b)
}

const TAG_SIZE: u16 = tag(*b"sz");
const TAG_UID: u16 = tag(*b"ui");
const TAG_MESSAGE_ID: u16 = tag(*b"mi");
const TAG_MAILBOX_ID: u16 = tag(*b"bx");
const TAG_INTERNAL_DATE: u16 = tag(*b"dt");
const TAG_UID_VALIDITY: u16 = tag(*b"uv");
const TAG_FLAGS: u16 = tag(*b"fl");

/// One typed metadata record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExtraField {
    /// Message content size in bytes.
    Size(u64),
    /// Per-mailbox message UID.
    Uid(Uid),
    /// Message identity.
    MessageId(MessageId),
    /// Owning (or described) mailbox identity.
    MailboxId(MailboxId),
    /// Message internal date, millisecond precision.
    InternalDate(DateTime<Utc>),
    /// Mailbox UID validity.
    UidValidity(u32),
    /// Message flag set.
    Flags(Vec<Flag>),
}

impl ExtraField {
    pub fn tag(&self) -> u16 {
        match *self {
            ExtraField::Size(..) => TAG_SIZE,
            ExtraField::Uid(..) => TAG_UID,
            ExtraField::MessageId(..) => TAG_MESSAGE_ID,
            ExtraField::MailboxId(..) => TAG_MAILBOX_ID,
            ExtraField::InternalDate(..) => TAG_INTERNAL_DATE,
            ExtraField::UidValidity(..) => TAG_UID_VALIDITY,
            ExtraField::Flags(..) => TAG_FLAGS,
        }
    }

    fn encode_payload(&self) -> Result<Vec<u8>, Error> {
        let mut buf = Vec::new();
        match *self {
            ExtraField::Size(size) => buf.write_u64::<BigEndian>(size)?,
            ExtraField::Uid(uid) => buf.write_u64::<BigEndian>(uid.0)?,
            ExtraField::MessageId(ref id) => write_string(&mut buf, &id.0)?,
            ExtraField::MailboxId(ref id) => write_string(&mut buf, &id.0)?,
            ExtraField::InternalDate(date) => {
                buf.write_i64::<BigEndian>(date.timestamp_millis())?
            },
            ExtraField::UidValidity(validity) => {
                buf.write_u64::<BigEndian>(validity.into())?
            },
            ExtraField::Flags(ref flags) => {
                let count: u16 = flags
                    .len()
                    .try_into()
                    .map_err(|_| Error::ExtraFieldTooLong)?;
                buf.write_u16::<BigEndian>(count)?;
                for flag in flags {
                    write_string(&mut buf, &flag.to_string())?;
                }
            },
        }
        Ok(buf)
    }
}

/// Encode `fields` as a run of ZIP extra-field blocks.
pub fn encode(fields: &[ExtraField]) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    for field in fields {
        let payload = field.encode_payload()?;
        let len: u16 = payload
            .len()
            .try_into()
            .map_err(|_| Error::ExtraFieldTooLong)?;
        out.write_u16::<LittleEndian>(field.tag())?;
        out.write_u16::<LittleEndian>(len)?;
        out.extend_from_slice(&payload);
    }

    // The whole run must fit the ZIP extra-field length field
    if out.len() > usize::from(u16::MAX) {
        return Err(Error::ExtraFieldTooLong);
    }

    Ok(out)
}

/// The result of parsing one entry's extra-field data.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedFields {
    /// The fields this codec understands, in block order.
    pub fields: Vec<ExtraField>,
    /// Blocks with tags this codec does not understand, preserved verbatim
    /// as `(tag, payload)`.
    pub unparsed: Vec<(u16, Vec<u8>)>,
}

impl ParsedFields {
    pub fn size(&self) -> Option<u64> {
        self.fields.iter().find_map(|f| match *f {
            ExtraField::Size(size) => Some(size),
            _ => None,
        })
    }

    pub fn uid(&self) -> Option<Uid> {
        self.fields.iter().find_map(|f| match *f {
            ExtraField::Uid(uid) => Some(uid),
            _ => None,
        })
    }

    pub fn message_id(&self) -> Option<&MessageId> {
        self.fields.iter().find_map(|f| match *f {
            ExtraField::MessageId(ref id) => Some(id),
            _ => None,
        })
    }

    pub fn mailbox_id(&self) -> Option<&MailboxId> {
        self.fields.iter().find_map(|f| match *f {
            ExtraField::MailboxId(ref id) => Some(id),
            _ => None,
        })
    }

    pub fn internal_date(&self) -> Option<DateTime<Utc>> {
        self.fields.iter().find_map(|f| match *f {
            ExtraField::InternalDate(date) => Some(date),
            _ => None,
        })
    }

    pub fn uid_validity(&self) -> Option<u32> {
        self.fields.iter().find_map(|f| match *f {
            ExtraField::UidValidity(validity) => Some(validity),
            _ => None,
        })
    }

    pub fn flags(&self) -> Option<&[Flag]> {
        self.fields.iter().find_map(|f| match *f {
            ExtraField::Flags(ref flags) => Some(&flags[..]),
            _ => None,
        })
    }
}

/// Parse one entry's raw extra-field data.
///
/// Foreign blocks (e.g. zip64 or timestamp fields added by other tools)
/// land in `unparsed`; only structurally broken data and malformed payloads
/// of known tags are errors.
pub fn parse(data: &[u8]) -> Result<ParsedFields, Error> {
    let mut parsed = ParsedFields::default();

    let mut rest = data;
    while !rest.is_empty() {
        if rest.len() < 4 {
            return Err(Error::TruncatedExtraField);
        }

        let tag = LittleEndian::read_u16(rest);
        let len = usize::from(LittleEndian::read_u16(&rest[2..]));
        rest = &rest[4..];
        if rest.len() < len {
            return Err(Error::TruncatedExtraField);
        }

        let (payload, tail) = rest.split_at(len);
        rest = tail;

        match decode_payload(tag, payload)? {
            Some(field) => parsed.fields.push(field),
            None => parsed.unparsed.push((tag, payload.to_vec())),
        }
    }

    Ok(parsed)
}

fn decode_payload(tag: u16, data: &[u8]) -> Result<Option<ExtraField>, Error> {
    match tag {
        TAG_SIZE => Ok(Some(ExtraField::Size(fixed_u64(data, "size")?))),
        TAG_UID => Ok(Some(ExtraField::Uid(Uid(fixed_u64(data, "UID")?)))),
        TAG_MESSAGE_ID => Ok(Some(ExtraField::MessageId(MessageId(
            whole_string(data, "message id")?,
        )))),
        TAG_MAILBOX_ID => Ok(Some(ExtraField::MailboxId(MailboxId(
            whole_string(data, "mailbox id")?,
        )))),
        TAG_INTERNAL_DATE => {
            let millis = fixed_i64(data, "internal date")?;
            let date = Utc
                .timestamp_millis_opt(millis)
                .single()
                .ok_or(Error::MalformedExtraField("internal date"))?;
            Ok(Some(ExtraField::InternalDate(date)))
        },
        TAG_UID_VALIDITY => {
            let validity: u32 = fixed_u64(data, "UID validity")?
                .try_into()
                .map_err(|_| Error::MalformedExtraField("UID validity"))?;
            Ok(Some(ExtraField::UidValidity(validity)))
        },
        TAG_FLAGS => {
            let mut rest = data;
            if rest.len() < 2 {
                return Err(Error::MalformedExtraField("flags"));
            }

            let count = BigEndian::read_u16(rest);
            rest = &rest[2..];

            let mut flags = Vec::with_capacity(count.into());
            for _ in 0..count {
                flags.push(take_string(&mut rest, "flags")?.parse::<Flag>()?);
            }

            if !rest.is_empty() {
                return Err(Error::MalformedExtraField("flags"));
            }

            Ok(Some(ExtraField::Flags(flags)))
        },
        _ => Ok(None),
    }
}

fn write_string(buf: &mut Vec<u8>, s: &str) -> Result<(), Error> {
    let len: u16 = s.len().try_into().map_err(|_| Error::ExtraFieldTooLong)?;
    buf.write_u16::<BigEndian>(len)?;
    buf.extend_from_slice(s.as_bytes());
    Ok(())
}

fn take_string(
    rest: &mut &[u8],
    name: &'static str,
) -> Result<String, Error> {
    if rest.len() < 2 {
        return Err(Error::MalformedExtraField(name));
    }

    let len = usize::from(BigEndian::read_u16(rest));
    if rest.len() - 2 < len {
        return Err(Error::MalformedExtraField(name));
    }

    let s = str::from_utf8(&rest[2..2 + len])?.to_owned();
    *rest = &rest[2 + len..];
    Ok(s)
}

fn whole_string(data: &[u8], name: &'static str) -> Result<String, Error> {
    let mut rest = data;
    let s = take_string(&mut rest, name)?;
    if !rest.is_empty() {
        return Err(Error::MalformedExtraField(name));
    }
    Ok(s)
}

fn fixed_u64(data: &[u8], name: &'static str) -> Result<u64, Error> {
    if 8 != data.len() {
        return Err(Error::MalformedExtraField(name));
    }
    Ok(BigEndian::read_u64(data))
}

fn fixed_i64(data: &[u8], name: &'static str) -> Result<i64, Error> {
    if 8 != data.len() {
        return Err(Error::MalformedExtraField(name));
    }
    Ok(BigEndian::read_i64(data))
}
