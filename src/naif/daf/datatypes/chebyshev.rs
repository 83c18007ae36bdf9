/*
 * Helios Toolkit
 * Copyright (C) 2023-onward the Helios contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use core::fmt;
use snafu::ensure;

use crate::errors::{DecodingError, IntegrityError, TooFewDoublesSnafu};
use crate::math::interpolation::{chebyshev_eval, InterpolationError};
use crate::math::Vector3;
use crate::naif::daf::{DafDataSet, SegmentView};

use super::MAX_RCRD_DOUBLES;

/// Reads and validates the four directory doubles every Chebyshev segment ends with:
/// `(init, intlen, rsize, n_records)`.
fn chebyshev_directory(
    segment: &SegmentView<'_>,
    dataset: &'static str,
    blocks: usize,
) -> Result<(f64, f64, usize, usize), DecodingError> {
    ensure!(
        segment.len() >= 5,
        TooFewDoublesSnafu {
            dataset,
            need: 5_usize,
            got: segment.len()
        }
    );

    let trailer_at = segment.len() - 4;
    let init_s = segment.double(trailer_at)?;
    let interval_length_s = segment.double(trailer_at + 1)?;
    let rsize = segment.double(trailer_at + 2)?;
    let num_records = segment.double(trailer_at + 3)?;

    if !init_s.is_finite() {
        return Err(DecodingError::Integrity {
            source: IntegrityError::SubNormal {
                dataset,
                variable: "seconds since J2000 ET",
            },
        });
    }
    if !interval_length_s.is_finite() {
        return Err(DecodingError::Integrity {
            source: IntegrityError::SubNormal {
                dataset,
                variable: "interval length in seconds",
            },
        });
    } else if interval_length_s <= 0.0 {
        return Err(DecodingError::Integrity {
            source: IntegrityError::InvalidValue {
                dataset,
                variable: "interval length in seconds",
                value: interval_length_s,
                reason: "must be strictly greater than zero",
            },
        });
    }

    let rsize_u = rsize as usize;
    // Records hold the midpoint, the radius, and `blocks` equal coefficient runs.
    let valid_rsize = rsize_u > 2
        && rsize_u <= MAX_RCRD_DOUBLES
        && (rsize_u - 2) % blocks == 0;
    if !valid_rsize {
        return Err(DecodingError::Integrity {
            source: IntegrityError::InvalidValue {
                dataset,
                variable: "rsize",
                value: rsize,
                reason: "record size does not match the data type",
            },
        });
    }

    let num_records_u = num_records as usize;
    ensure!(
        num_records_u * rsize_u <= segment.len() - 4,
        TooFewDoublesSnafu {
            dataset,
            need: num_records_u * rsize_u + 4,
            got: segment.len()
        }
    );

    Ok((init_s, interval_length_s, rsize_u, num_records_u))
}

/// Returns the record index covering `et_s` in a uniform-interval segment, clamped to
/// the final record exactly as CSPICE's `spkr02` does.
fn record_index(init_s: f64, interval_length_s: f64, num_records: usize, et_s: f64) -> usize {
    let raw = ((et_s - init_s) / interval_length_s).floor();
    if raw < 0.0 {
        0
    } else {
        (raw as usize).min(num_records.saturating_sub(1))
    }
}

fn integrity_scan(segment: &SegmentView<'_>, dataset: &'static str) -> Result<(), IntegrityError> {
    for idx in 0..segment.len() {
        let val = segment.double(idx).map_err(|_| IntegrityError::SubNormal {
            dataset,
            variable: "one of the record data",
        })?;
        if !val.is_finite() {
            return Err(IntegrityError::SubNormal {
                dataset,
                variable: "one of the record data",
            });
        }
    }
    Ok(())
}

/// SPK Type 2: uniform-interval Chebyshev coefficients for position; velocity is the
/// analytic derivative of the position series.
pub struct Type2ChebyshevSet<'a> {
    pub init_s: f64,
    pub interval_length_s: f64,
    pub rsize: usize,
    pub num_records: usize,
    segment: SegmentView<'a>,
}

impl Type2ChebyshevSet<'_> {
    pub fn degree(&self) -> usize {
        (self.rsize - 2) / 3 - 1
    }
}

impl fmt::Display for Type2ChebyshevSet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "start: {} s\tlength: {} s\trsize: {}\tnum_records: {}",
            self.init_s, self.interval_length_s, self.rsize, self.num_records
        )
    }
}

impl<'a> DafDataSet<'a> for Type2ChebyshevSet<'a> {
    const DATASET_NAME: &'static str = "Chebyshev Type 2";

    fn from_segment(segment: SegmentView<'a>) -> Result<Self, DecodingError> {
        let (init_s, interval_length_s, rsize, num_records) =
            chebyshev_directory(&segment, Self::DATASET_NAME, 3)?;

        Ok(Self {
            init_s,
            interval_length_s,
            rsize,
            num_records,
            segment,
        })
    }

    fn evaluate(&self, et_s: f64) -> Result<(Vector3, Vector3), InterpolationError> {
        let radius_s = self.interval_length_s / 2.0;
        let rcrd_idx = record_index(self.init_s, self.interval_length_s, self.num_records, et_s);

        // Per-query scratch for one record, on the stack.
        let mut rcrd: heapless::Vec<f64, MAX_RCRD_DOUBLES> = heapless::Vec::new();
        rcrd.resize_default(self.rsize)
            .map_err(|_| InterpolationError::InterpDecoding {
                source: DecodingError::Casting,
            })?;
        self.segment
            .read_into(rcrd_idx * self.rsize, &mut rcrd)
            .map_err(|source| InterpolationError::InterpDecoding { source })?;

        let midpoint_s = rcrd[0];
        let normalized_time = (et_s - midpoint_s) / radius_s;

        let num_coeffs = (self.rsize - 2) / 3;
        let mut state = Vector3::zeros();
        let mut rate = Vector3::zeros();
        for cno in 0..3 {
            let coeffs = &rcrd[2 + cno * num_coeffs..2 + (cno + 1) * num_coeffs];
            let (val, deriv) = chebyshev_eval(normalized_time, coeffs, radius_s, self.degree())?;
            state[cno] = val;
            rate[cno] = deriv;
        }

        Ok((state, rate))
    }

    fn check_integrity(&self) -> Result<(), IntegrityError> {
        integrity_scan(&self.segment, Self::DATASET_NAME)
    }
}

/// SPK Type 3: like Type 2, but each record carries six coefficient runs and velocity
/// has its own Chebyshev blocks.
pub struct Type3ChebyshevSet<'a> {
    pub init_s: f64,
    pub interval_length_s: f64,
    pub rsize: usize,
    pub num_records: usize,
    segment: SegmentView<'a>,
}

impl Type3ChebyshevSet<'_> {
    pub fn degree(&self) -> usize {
        (self.rsize - 2) / 6 - 1
    }
}

impl fmt::Display for Type3ChebyshevSet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "start: {} s\tlength: {} s\trsize: {}\tnum_records: {}",
            self.init_s, self.interval_length_s, self.rsize, self.num_records
        )
    }
}

impl<'a> DafDataSet<'a> for Type3ChebyshevSet<'a> {
    const DATASET_NAME: &'static str = "Chebyshev Type 3";

    fn from_segment(segment: SegmentView<'a>) -> Result<Self, DecodingError> {
        let (init_s, interval_length_s, rsize, num_records) =
            chebyshev_directory(&segment, Self::DATASET_NAME, 6)?;

        Ok(Self {
            init_s,
            interval_length_s,
            rsize,
            num_records,
            segment,
        })
    }

    fn evaluate(&self, et_s: f64) -> Result<(Vector3, Vector3), InterpolationError> {
        let radius_s = self.interval_length_s / 2.0;
        let rcrd_idx = record_index(self.init_s, self.interval_length_s, self.num_records, et_s);

        let mut rcrd: heapless::Vec<f64, MAX_RCRD_DOUBLES> = heapless::Vec::new();
        rcrd.resize_default(self.rsize)
            .map_err(|_| InterpolationError::InterpDecoding {
                source: DecodingError::Casting,
            })?;
        self.segment
            .read_into(rcrd_idx * self.rsize, &mut rcrd)
            .map_err(|source| InterpolationError::InterpDecoding { source })?;

        let midpoint_s = rcrd[0];
        let normalized_time = (et_s - midpoint_s) / radius_s;

        let num_coeffs = (self.rsize - 2) / 6;
        let mut state = Vector3::zeros();
        let mut rate = Vector3::zeros();
        for cno in 0..3 {
            let coeffs = &rcrd[2 + cno * num_coeffs..2 + (cno + 1) * num_coeffs];
            let (val, _) = chebyshev_eval(normalized_time, coeffs, radius_s, self.degree())?;
            state[cno] = val;
        }
        // The velocity blocks follow the position blocks and are plain series values,
        // already expressed in km/s.
        for cno in 0..3 {
            let coeffs = &rcrd[2 + (cno + 3) * num_coeffs..2 + (cno + 4) * num_coeffs];
            let (val, _) = chebyshev_eval(normalized_time, coeffs, radius_s, self.degree())?;
            rate[cno] = val;
        }

        Ok((state, rate))
    }

    fn check_integrity(&self) -> Result<(), IntegrityError> {
        integrity_scan(&self.segment, Self::DATASET_NAME)
    }
}
