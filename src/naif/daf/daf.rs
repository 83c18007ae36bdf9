/*
 * Helios Toolkit
 * Copyright (C) 2023-onward the Helios contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::file_record::FileRecordError;
use super::{
    DAFError, DecodingSummarySnafu, FileRecord, FileRecordSnafu, IOSnafu, MalformedChainSnafu,
    NameRecord, NaifRecord, SummaryRecord, RCRD_LEN,
};
use crate::errors::{DecodingError, IntegrityError};
use crate::naif::spk::summary::SPKSummaryRecord;
use crate::naif::Endian;
use crate::parse_bytes_as;
use crate::prelude::InputOutputError;
use crate::{file2heap, DBL_SIZE, NaifId};
use bytes::Bytes;
use core::ops::Deref;
use log::trace;
use snafu::prelude::*;
use zerocopy::FromBytes;

use std::fs::File;

/// How many records the summary chain walker will visit before declaring the
/// doubly-linked list circular.
const MAX_CHAIN_RECORDS: usize = 10_000;

/// A NAIF Double-precision Array File holding SPK segments.
///
/// The byte image is read-only and reference counted, so cloning a `DAF` (e.g. to share
/// one kernel between several providers) only copies a pointer. The segment catalog is
/// decoded once at parse time, honoring the byte-order flag of the file; queries never
/// mutate shared state.
#[derive(Clone, Debug, PartialEq)]
pub struct DAF {
    pub bytes: Bytes,
    pub crc32_checksum: u32,
    pub endianness: Endian,
    segments: Vec<SPKSummaryRecord>,
}

impl DAF {
    /// Parse the provided bytes as a SPICE Double Array File
    pub fn parse<B: Deref<Target = [u8]>>(bytes: B) -> Result<Self, DAFError> {
        let crc32_checksum = crc32fast::hash(&bytes);
        let bytes = Bytes::copy_from_slice(&bytes);

        let rcrd_bytes = bytes
            .get(..FileRecord::SIZE)
            .ok_or(DAFError::TruncatedFile {
                start: 0,
                end: FileRecord::SIZE,
                size: bytes.len(),
            })?;
        let file_record =
            FileRecord::read_from_bytes(rcrd_bytes).map_err(|_| DAFError::FileRecord {
                source: FileRecordError::EmptyRecord,
            })?;
        if file_record.is_empty() {
            return Err(DAFError::FileRecord {
                source: FileRecordError::EmptyRecord,
            });
        }
        file_record.identification().context(FileRecordSnafu)?;
        let endianness = file_record.endianness().context(FileRecordSnafu)?;
        let (nd, ni) = (file_record.nd(endianness), file_record.ni(endianness));
        if nd != 2 || ni != 6 {
            return Err(DAFError::FileRecord {
                source: FileRecordError::InvalidCounts {
                    nd: nd as u32,
                    ni: ni as u32,
                },
            });
        }

        let mut me = Self {
            bytes,
            crc32_checksum,
            endianness,
            segments: Vec::new(),
        };
        me.walk_summary_chain(&file_record)?;
        Ok(me)
    }

    /// Parse the DAF only if the CRC32 checksum of the data is valid
    pub fn check_then_parse<B: Deref<Target = [u8]>>(
        bytes: B,
        expected: u32,
    ) -> Result<Self, DAFError> {
        let computed = crc32fast::hash(&bytes);
        if computed != expected {
            return Err(DAFError::DAFIntegrity {
                source: IntegrityError::ChecksumInvalid { expected, computed },
            });
        }

        Self::parse(bytes)
    }

    /// Memory maps the file at the provided path and parses it. The image is copied to
    /// the heap once; subsequent queries perform no blocking I/O.
    pub fn load(path: &str) -> Result<Self, DAFError> {
        let bytes = file2heap!(path).context(IOSnafu {
            action: format!("loading {path:?}"),
        })?;

        Self::parse(bytes)
    }

    /// Compute the CRC32 of the underlying bytes
    pub fn crc32(&self) -> u32 {
        crc32fast::hash(&self.bytes)
    }

    /// Scrubs the data by computing the CRC32 of the bytes and making sure that it still matches the previously known hash
    pub fn scrub(&self) -> Result<(), IntegrityError> {
        if self.crc32() == self.crc32_checksum {
            Ok(())
        } else {
            // Compiler will optimize the double computation away
            Err(IntegrityError::ChecksumInvalid {
                expected: self.crc32_checksum,
                computed: self.crc32(),
            })
        }
    }

    /// Walks the doubly-linked list of summary records starting at FWARD, decoding each
    /// descriptor and its segment name into the catalog.
    fn walk_summary_chain(&mut self, file_record: &FileRecord) -> Result<(), DAFError> {
        let endian = self.endianness;
        let summary_size_bytes = file_record.summary_size(endian) * DBL_SIZE;
        let mut rcrd_idx = file_record.fwrd_idx(endian);
        let mut hops = 0;

        while rcrd_idx != 0 {
            ensure!(
                hops < MAX_CHAIN_RECORDS,
                MalformedChainSnafu { rcrd: rcrd_idx }
            );

            let start = (rcrd_idx - 1) * RCRD_LEN;
            let rcrd_bytes =
                self.bytes
                    .get(start..start + RCRD_LEN)
                    .ok_or(DAFError::TruncatedFile {
                        start,
                        end: start + RCRD_LEN,
                        size: self.bytes.len(),
                    })?;
            let summary_rcrd = SummaryRecord::read_from_bytes(&rcrd_bytes[..SummaryRecord::SIZE])
                .map_err(|_| DAFError::DecodingSummary {
                    source: DecodingError::Casting,
                })?;

            // The record that follows a summary record names its segments.
            let name_start = rcrd_idx * RCRD_LEN;
            let name_rcrd = self
                .bytes
                .get(name_start..name_start + RCRD_LEN)
                .and_then(|b| NameRecord::read_from_bytes(b).ok())
                .unwrap_or_default();

            let nsum = summary_rcrd.num_summaries(endian);
            let max_per_record = (RCRD_LEN - SummaryRecord::SIZE) / summary_size_bytes;
            ensure!(
                nsum <= max_per_record,
                MalformedChainSnafu { rcrd: rcrd_idx }
            );

            for i in 0..nsum {
                let off = SummaryRecord::SIZE + i * summary_size_bytes;
                let mut summary =
                    SPKSummaryRecord::parse(&rcrd_bytes[off..off + summary_size_bytes], endian)
                        .context(DecodingSummarySnafu)?;
                summary.name = name_rcrd
                    .nth_name(i, file_record.summary_size(endian))
                    .to_string();
                trace!("catalog += {summary}");
                self.segments.push(summary);
            }

            rcrd_idx = summary_rcrd.next_record(endian);
            hops += 1;
        }

        Ok(())
    }

    pub fn file_record(&self) -> Result<FileRecord, DAFError> {
        let rcrd_bytes = self
            .bytes
            .get(..FileRecord::SIZE)
            .ok_or(DAFError::TruncatedFile {
                start: 0,
                end: FileRecord::SIZE,
                size: self.bytes.len(),
            })?;
        FileRecord::read_from_bytes(rcrd_bytes).map_err(|_| DAFError::FileRecord {
            source: FileRecordError::EmptyRecord,
        })
    }

    /// The ordered segment catalog of this file.
    pub fn summaries(&self) -> &[SPKSummaryRecord] {
        &self.segments
    }

    /// First catalog entry matching the target, observer and time, in catalog order.
    pub fn segment_for(
        &self,
        target: NaifId,
        observer: NaifId,
        et_s: f64,
    ) -> Option<&SPKSummaryRecord> {
        self.segments
            .iter()
            .find(|s| s.target_id == target && s.center_id == observer && s.covers(et_s))
    }

    /// First catalog entry for the target regardless of observer, in catalog order.
    pub fn segment_for_target(&self, target: NaifId, et_s: f64) -> Option<&SPKSummaryRecord> {
        self.segments
            .iter()
            .find(|s| s.target_id == target && s.covers(et_s))
    }

    /// Word-addressed view over the data region of a segment.
    pub fn segment_view(&self, summary: &SPKSummaryRecord) -> SegmentView<'_> {
        SegmentView {
            daf: self,
            first_word: summary.start_idx,
            last_word: summary.end_idx,
        }
    }

    /// Reads one double at the provided 1-based 8-byte-word address, honoring the byte
    /// order of the file.
    pub fn double_at_word(&self, word_idx: usize) -> Result<f64, DecodingError> {
        let start = (word_idx - 1) * DBL_SIZE;
        let raw = self
            .bytes
            .get(start..start + DBL_SIZE)
            .ok_or(DecodingError::InaccessibleBytes {
                start,
                end: start + DBL_SIZE,
                size: self.bytes.len(),
            })?;
        Ok(parse_bytes_as!(f64, raw, self.endianness))
    }

    /// The text of the comment records (records 2 through FWARD - 1), if any.
    pub fn comments(&self) -> Result<Option<String>, DAFError> {
        let file_record = self.file_record()?;
        let mut rslt = String::new();
        for rid in 1..file_record.fwrd_idx(self.endianness).saturating_sub(1) {
            let raw = self
                .bytes
                .get(rid * RCRD_LEN..(rid + 1) * RCRD_LEN)
                .ok_or(DAFError::DecodingComments {
                    source: DecodingError::InaccessibleBytes {
                        start: rid * RCRD_LEN,
                        end: (rid + 1) * RCRD_LEN,
                        size: self.bytes.len(),
                    },
                })?;
            match core::str::from_utf8(raw) {
                Ok(s) => rslt += s.replace('\u{0}', "\n").trim(),
                Err(e) => {
                    // The bytes up to the first invalid sequence are still comment text.
                    let valid_s = core::str::from_utf8(&raw[..e.valid_up_to()]).unwrap_or("");
                    rslt += valid_s.replace('\u{0}', "\n").trim()
                }
            }
        }

        if rslt.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rslt))
        }
    }
}

/// A read-only window over one segment's doubles, addressed from zero. All reads honor
/// the byte order of the underlying file, so evaluators are identical for both orders.
#[derive(Clone, Copy)]
pub struct SegmentView<'a> {
    daf: &'a DAF,
    /// 1-based word address of the first double
    first_word: usize,
    /// 1-based word address of the last double (inclusive)
    last_word: usize,
}

impl<'a> SegmentView<'a> {
    pub fn len(&self) -> usize {
        // A summary with end < start describes no data; treat it as empty.
        (self.last_word + 1).saturating_sub(self.first_word)
    }

    pub fn is_empty(&self) -> bool {
        self.last_word < self.first_word
    }

    /// Reads the idx-th double of this segment (0-based).
    pub fn double(&self, idx: usize) -> Result<f64, DecodingError> {
        if idx >= self.len() {
            return Err(DecodingError::InaccessibleBytes {
                start: idx,
                end: idx + 1,
                size: self.len(),
            });
        }
        self.daf.double_at_word(self.first_word + idx)
    }

    /// Fills `out` with consecutive doubles starting at the 0-based index `start`.
    pub fn read_into(&self, start: usize, out: &mut [f64]) -> Result<(), DecodingError> {
        if start + out.len() > self.len() {
            return Err(DecodingError::InaccessibleBytes {
                start,
                end: start + out.len(),
                size: self.len(),
            });
        }
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.daf.double_at_word(self.first_word + start + i)?;
        }
        Ok(())
    }
}
