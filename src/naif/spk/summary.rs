/*
 * Helios Toolkit
 * Copyright (C) 2023-onward the Helios contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use core::fmt;

use crate::errors::DecodingError;
use crate::naif::daf::{DAFError, DafDataType};
use crate::naif::Endian;
use crate::parse_bytes_as;
use crate::NaifId;

/// One segment descriptor of an SPK: ND = 2 doubles and NI = 6 integers, decoded from
/// the file byte order into machine values when the catalog is built.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SPKSummaryRecord {
    pub start_epoch_et_s: f64,
    pub end_epoch_et_s: f64,
    pub target_id: NaifId,
    pub center_id: NaifId,
    pub frame_id: NaifId,
    pub data_type_i: i32,
    /// 1-based 8-byte-word address of the first double of the segment
    pub start_idx: usize,
    /// 1-based 8-byte-word address of the last double of the segment
    pub end_idx: usize,
    /// Segment name from the DAF name record, kept for display and logging
    pub name: String,
}

impl SPKSummaryRecord {
    /// On-disk size of one summary: 8 * (ND + NI/2) bytes.
    pub const SIZE: usize = 40;

    pub fn parse(raw: &[u8], endian: Endian) -> Result<Self, DecodingError> {
        if raw.len() < Self::SIZE {
            return Err(DecodingError::InaccessibleBytes {
                start: 0,
                end: Self::SIZE,
                size: raw.len(),
            });
        }

        Ok(Self {
            start_epoch_et_s: parse_bytes_as!(f64, &raw[0..8], endian),
            end_epoch_et_s: parse_bytes_as!(f64, &raw[8..16], endian),
            target_id: parse_bytes_as!(i32, &raw[16..20], endian),
            center_id: parse_bytes_as!(i32, &raw[20..24], endian),
            frame_id: parse_bytes_as!(i32, &raw[24..28], endian),
            data_type_i: parse_bytes_as!(i32, &raw[28..32], endian),
            start_idx: parse_bytes_as!(i32, &raw[32..36], endian) as usize,
            end_idx: parse_bytes_as!(i32, &raw[36..40], endian) as usize,
            name: String::new(),
        })
    }

    pub fn data_type(&self) -> Result<DafDataType, DAFError> {
        DafDataType::try_from(self.data_type_i)
    }

    pub fn covers(&self, et_s: f64) -> bool {
        self.start_epoch_et_s <= et_s && et_s <= self.end_epoch_et_s
    }

    pub fn is_empty(&self) -> bool {
        self.start_idx == self.end_idx
    }
}

impl fmt::Display for SPKSummaryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SPK Summary for TGT={} CTR={} FRM={} from {} to {} s past J2000",
            self.target_id,
            self.center_id,
            self.frame_id,
            self.start_epoch_et_s,
            self.end_epoch_et_s
        )
    }
}

#[cfg(test)]
mod summary_ut {
    use super::SPKSummaryRecord;
    use crate::naif::Endian;

    #[test]
    fn parse_round_trips_both_byte_orders() {
        let mut le = Vec::new();
        le.extend_from_slice(&(-1.5e9f64).to_le_bytes());
        le.extend_from_slice(&(1.5e9f64).to_le_bytes());
        for v in [399i32, 3, 1, 2, 641, 310_404] {
            le.extend_from_slice(&v.to_le_bytes());
        }
        let mut be = Vec::new();
        be.extend_from_slice(&(-1.5e9f64).to_be_bytes());
        be.extend_from_slice(&(1.5e9f64).to_be_bytes());
        for v in [399i32, 3, 1, 2, 641, 310_404] {
            be.extend_from_slice(&v.to_be_bytes());
        }

        for (raw, endian) in [(le, Endian::Little), (be, Endian::Big)] {
            let summary = SPKSummaryRecord::parse(&raw, endian).unwrap();
            assert_eq!(summary.start_epoch_et_s, -1.5e9);
            assert_eq!(summary.end_epoch_et_s, 1.5e9);
            assert_eq!(summary.target_id, 399);
            assert_eq!(summary.center_id, 3);
            assert_eq!(summary.frame_id, 1);
            assert_eq!(summary.data_type_i, 2);
            assert_eq!(summary.start_idx, 641);
            assert_eq!(summary.end_idx, 310_404);
            assert!(summary.covers(0.0));
            assert!(!summary.covers(2e9));
        }
    }
}
