/*
 * Helios Toolkit
 * Copyright (C) 2023-onward the Helios contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::str::Utf8Error;

use snafu::prelude::*;
use zerocopy::{FromBytes, Immutable, KnownLayout};

use crate::naif::Endian;

use super::NaifRecord;

#[derive(Clone, Debug, Snafu, PartialEq)]
#[snafu(visibility(pub(crate)))]
pub enum FileRecordError {
    #[snafu(display("identifier or endian flag is not a valid UTF8 string: {source:?}"))]
    ParsingError { source: Utf8Error },
    #[snafu(display("endian flag is `{read}` but it should be either `BIG-IEEE` or `LTL-IEEE`"))]
    UnsupportedEndian { read: String },
    #[snafu(display("identifier `{loci}` indicates this is not an SPK file"))]
    NotSPK { loci: String },
    #[snafu(display("summary counts ND={nd}, NI={ni} do not match an SPK (expected 2 and 6)"))]
    InvalidCounts { nd: u32, ni: u32 },
    #[snafu(display("is empty (ensure file is valid, e.g. do you need to run git-lfs)"))]
    EmptyRecord,
}

/// The first 1024 bytes of a DAF: identifiers, summary counts, the summary-record
/// pointers and the byte-order flag. The integer fields are raw file-order values;
/// read them through the accessors that take the detected [Endian].
#[derive(Debug, Clone, FromBytes, KnownLayout, Immutable, PartialEq)]
#[repr(C)]
pub struct FileRecord {
    pub id_str: [u8; 8],
    nd: u32,
    ni: u32,
    pub internal_filename: [u8; 60],
    forward: u32,
    backward: u32,
    free_addr: u32,
    pub endian_str: [u8; 8],
    pub pre_null: [u8; 603],
    pub ftp_str: [u8; 28],
    pub pst_null: [u8; 297],
}

impl Default for FileRecord {
    fn default() -> Self {
        Self {
            id_str: [0; 8],
            nd: Default::default(),
            ni: Default::default(),
            internal_filename: [0; 60],
            forward: Default::default(),
            backward: Default::default(),
            free_addr: Default::default(),
            endian_str: [0; 8],
            pre_null: [0; 603],
            ftp_str: [0; 28],
            pst_null: [0; 297],
        }
    }
}

impl NaifRecord for FileRecord {}

impl FileRecord {
    pub fn nd(&self, endian: Endian) -> usize {
        endian.cast_u32(self.nd) as usize
    }

    pub fn ni(&self, endian: Endian) -> usize {
        endian.cast_u32(self.ni) as usize
    }

    /// 1-based record index of the initial summary record.
    pub fn fwrd_idx(&self, endian: Endian) -> usize {
        endian.cast_u32(self.forward) as usize
    }

    /// 1-based record index of the final summary record.
    pub fn bwrd_idx(&self, endian: Endian) -> usize {
        endian.cast_u32(self.backward) as usize
    }

    /// Size of one segment summary in 8-byte words: ND + ceil(NI / 2).
    pub fn summary_size(&self, endian: Endian) -> usize {
        let (nd, ni) = (endian.cast_u32(self.nd), endian.cast_u32(self.ni));
        (nd + ni.div_ceil(2)) as usize
    }

    /// Checks that the identifier marks an SPK: either the modern `DAF/SPK` or the
    /// pre-DAF `NAIF/DA` word.
    pub fn identification(&self) -> Result<(), FileRecordError> {
        let locidw = core::str::from_utf8(&self.id_str).context(ParsingSnafu)?;
        if locidw.trim_end_matches(['\0', ' ']) == "DAF/SPK" || locidw.starts_with("NAIF/DA") {
            Ok(())
        } else {
            Err(FileRecordError::NotSPK {
                loci: locidw.trim().to_string(),
            })
        }
    }

    /// Byte order of the file per the flag at offset 88. Both orders are readable on
    /// any host; scalar reads go through [crate::parse_bytes_as].
    pub fn endianness(&self) -> Result<Endian, FileRecordError> {
        let str_endianness = core::str::from_utf8(&self.endian_str).context(ParsingSnafu)?;
        if str_endianness == "LTL-IEEE" {
            Ok(Endian::Little)
        } else if str_endianness == "BIG-IEEE" {
            Ok(Endian::Big)
        } else {
            Err(FileRecordError::UnsupportedEndian {
                read: str_endianness.to_string(),
            })
        }
    }

    pub fn internal_filename(&self) -> Result<&str, FileRecordError> {
        Ok(core::str::from_utf8(&self.internal_filename)
            .context(ParsingSnafu)?
            .trim())
    }

    /// Returns whether this record was just null bytes
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
