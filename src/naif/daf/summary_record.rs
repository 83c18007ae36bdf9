/*
 * Helios Toolkit
 * Copyright (C) 2023-onward the Helios contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use zerocopy::{FromBytes, Immutable, KnownLayout};

use crate::naif::Endian;

use super::NaifRecord;

/// The first 24 bytes of every summary record: the doubly-linked-list pointers and the
/// number of summaries, all three stored as doubles.
#[derive(Clone, Copy, Debug, Default, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct SummaryRecord {
    next_record: f64,
    prev_record: f64,
    num_summaries: f64,
}

impl NaifRecord for SummaryRecord {}

impl SummaryRecord {
    pub fn next_record(&self, endian: Endian) -> usize {
        endian.cast_f64(self.next_record) as usize
    }

    pub fn prev_record(&self, endian: Endian) -> usize {
        endian.cast_f64(self.prev_record) as usize
    }

    pub fn num_summaries(&self, endian: Endian) -> usize {
        endian.cast_f64(self.num_summaries) as usize
    }

    pub fn is_final_record(&self, endian: Endian) -> bool {
        self.next_record(endian) == 0
    }
}
