/*
 * Helios Toolkit
 * Copyright (C) 2023-onward the Helios contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::errors::{DecodingError, IntegrityError};
use crate::math::interpolation::InterpolationError;
use crate::math::Vector3;
use crate::prelude::InputOutputError;
use crate::NaifId;
use snafu::prelude::*;
use zerocopy::{FromBytes, Immutable, KnownLayout};

pub(crate) const RCRD_LEN: usize = 1024;

#[allow(clippy::module_inception)]
pub mod daf;
mod data_types;
pub use data_types::DafDataType;
pub mod file_record;
pub mod name_record;
pub mod summary_record;
// Defines the supported data types
pub mod datatypes;

pub use daf::{SegmentView, DAF};

use core::fmt::Debug;
pub use file_record::FileRecord;
pub use name_record::NameRecord;
pub use summary_record::SummaryRecord;

use self::file_record::FileRecordError;

pub trait NaifRecord: FromBytes + KnownLayout + Immutable + Sized + Debug {
    const SIZE: usize = core::mem::size_of::<Self>();
}

/// A segment data set: built from the directory of a segment, evaluated one record per query.
pub trait DafDataSet<'a>: Sized {
    /// The name of this data set, used in errors
    const DATASET_NAME: &'static str;

    /// Builds this dataset from the directory entries of the provided segment.
    fn from_segment(segment: SegmentView<'a>) -> Result<Self, DecodingError>;

    /// Evaluates position (km) and velocity (km/s) at the provided time in seconds past J2000.
    fn evaluate(&self, et_s: f64) -> Result<(Vector3, Vector3), InterpolationError>;

    /// Checks the integrity of the whole segment, returns an error if the data has issues.
    fn check_integrity(&self) -> Result<(), IntegrityError>;
}

/// Errors associated with handling NAIF DAF files
#[derive(Clone, Debug, Snafu, PartialEq)]
#[snafu(visibility(pub(crate)))]
pub enum DAFError {
    #[snafu(display("DAF/SPK: file record {source}"))]
    FileRecord {
        source: FileRecordError,
    },
    #[snafu(display(
        "DAF/SPK: file truncated: need bytes {start} to {end} but file contains {size}"
    ))]
    TruncatedFile {
        start: usize,
        end: usize,
        size: usize,
    },
    #[snafu(display("DAF/SPK: summary record: {source}"))]
    DecodingSummary {
        source: DecodingError,
    },
    #[snafu(display("DAF/SPK: summary record chain is malformed at record {rcrd}"))]
    MalformedChain {
        rcrd: usize,
    },
    #[snafu(display("DAF/SPK: data of segment {idx}: {source}"))]
    DecodingData {
        idx: usize,
        source: DecodingError,
    },
    #[snafu(display("DAF/SPK: comments: {source}"))]
    DecodingComments {
        source: DecodingError,
    },
    DAFIntegrity {
        source: IntegrityError,
    },
    #[snafu(display("while {action} encountered input/output error {source}"))]
    IO {
        action: String,
        source: InputOutputError,
    },
    #[snafu(display("SPK data type {id} is not supported (only types 1, 2 and 3 are)"))]
    UnsupportedDatatype {
        id: i32,
    },
    #[snafu(display(
        "no segment covers target {target} w.r.t. {observer} at {et_s} s past J2000"
    ))]
    SegmentNotFound {
        target: NaifId,
        observer: NaifId,
        et_s: f64,
    },
}
