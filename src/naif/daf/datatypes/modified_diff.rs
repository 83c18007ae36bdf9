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
use crate::math::interpolation::InterpolationError;
use crate::math::Vector3;
use crate::naif::daf::{DafDataSet, SegmentView};

/// Length of a single modified-difference record.
const MD1_RCRD_LEN: usize = 71;

/// SPK Type 1: variable-step records of modified divided differences, evaluated with
/// Krogh's recurrence. Each record extrapolates from a reference state at its final
/// epoch; the record covering a query is the first whose epoch is strictly greater.
pub struct ModifiedDiffType1<'a> {
    pub num_records: usize,
    segment: SegmentView<'a>,
}

impl ModifiedDiffType1<'_> {
    /// 0-based index of the first entry of the epoch table within the segment.
    fn epoch_table_at(&self) -> usize {
        self.num_records * MD1_RCRD_LEN
    }

    fn epoch(&self, idx: usize) -> Result<f64, DecodingError> {
        self.segment.double(self.epoch_table_at() + idx)
    }
}

impl fmt::Display for ModifiedDiffType1<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Modified Differences Type 1 with {} records",
            self.num_records
        )
    }
}

impl<'a> DafDataSet<'a> for ModifiedDiffType1<'a> {
    const DATASET_NAME: &'static str = "Modified Differences Type 1";

    fn from_segment(segment: SegmentView<'a>) -> Result<Self, DecodingError> {
        // 71 doubles of one record, its epoch, and the trailing record count.
        ensure!(
            segment.len() >= MD1_RCRD_LEN + 2,
            TooFewDoublesSnafu {
                dataset: Self::DATASET_NAME,
                need: MD1_RCRD_LEN + 2,
                got: segment.len()
            }
        );
        let num_records = segment.double(segment.len() - 1)? as usize;
        // Records, the epoch table, and the trailing count must all fit. The interior
        // epoch directory (one entry per 100 epochs) occupies whatever lies between.
        ensure!(
            num_records * MD1_RCRD_LEN + num_records + 1 <= segment.len(),
            TooFewDoublesSnafu {
                dataset: Self::DATASET_NAME,
                need: num_records * (MD1_RCRD_LEN + 1) + 1,
                got: segment.len()
            }
        );

        Ok(Self {
            num_records,
            segment,
        })
    }

    fn evaluate(&self, et_s: f64) -> Result<(Vector3, Vector3), InterpolationError> {
        if self.num_records == 0 {
            return Err(InterpolationError::MissingInterpolationData { et_s });
        }

        let first_epoch = self
            .epoch(0)
            .map_err(|source| InterpolationError::InterpDecoding { source })?;
        let last_epoch = self
            .epoch(self.num_records - 1)
            .map_err(|source| InterpolationError::InterpDecoding { source })?;
        // Check that we even have interpolation data for that time
        if et_s < first_epoch - 1e-2 || et_s > last_epoch + 1e-2 {
            return Err(InterpolationError::NoInterpolationData {
                req_et_s: et_s,
                start_et_s: first_epoch,
                end_et_s: last_epoch,
            });
        }

        // NOTE: the interior epoch directory is not used: the full table is already in
        // memory-mapped reach, and a plain binary search of it is exact.

        // We want the index of the first epoch that is strictly greater than the request.
        let mut lo = 0_usize;
        let mut hi = self.num_records;
        while lo < hi {
            let mid = (lo + hi) / 2;
            let epoch = self
                .epoch(mid)
                .map_err(|source| InterpolationError::InterpDecoding { source })?;
            if epoch <= et_s {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        let rcrd_idx = lo.min(self.num_records - 1);

        let mut rcrd = [0.0_f64; MD1_RCRD_LEN];
        self.segment
            .read_into(rcrd_idx * MD1_RCRD_LEN, &mut rcrd)
            .map_err(|source| InterpolationError::InterpDecoding { source })?;

        let record = ModifiedDiffRecord::from_slice_f64(&rcrd);
        record
            .validate()
            .map_err(|source| InterpolationError::InterpDecoding {
                source: DecodingError::Integrity { source },
            })?;
        Ok(record.to_pos_vel(et_s))
    }

    fn check_integrity(&self) -> Result<(), IntegrityError> {
        for idx in 0..self.segment.len() {
            let val = self
                .segment
                .double(idx)
                .map_err(|_| IntegrityError::SubNormal {
                    dataset: Self::DATASET_NAME,
                    variable: "one of the record data",
                })?;
            if !val.is_finite() {
                return Err(IntegrityError::SubNormal {
                    dataset: Self::DATASET_NAME,
                    variable: "one of the record data",
                });
            }
        }
        Ok(())
    }
}

/// One 71-double modified-difference record. The reference position and velocity are
/// interleaved on disk: x, vx, y, vy, z, vz.
#[derive(Copy, Clone, Debug)]
pub struct ModifiedDiffRecord<'a> {
    /// Reference epoch at the end of the record's coverage, in seconds past J2000
    pub ref_epoch: f64,
    /// Step-size function G
    pub step_sizes: &'a [f64],
    /// Reference position, in km
    pub ref_pos: [f64; 3],
    /// Reference velocity, in km/s
    pub ref_vel: [f64; 3],
    /// Modified divided difference arrays, 3 components x 15
    pub diff_array: &'a [f64],
    /// Maximum integration order plus 1
    pub kqmax1: usize,
    /// Integration order array for each component
    pub kq: [usize; 3],
}

impl<'a> ModifiedDiffRecord<'a> {
    pub fn from_slice_f64(slice: &'a [f64]) -> Self {
        Self {
            ref_epoch: slice[0],
            step_sizes: &slice[1..16],
            ref_pos: [slice[16], slice[18], slice[20]],
            ref_vel: [slice[17], slice[19], slice[21]],
            diff_array: &slice[22..67],
            kqmax1: slice[67] as usize,
            kq: [slice[68] as usize, slice[69] as usize, slice[70] as usize],
        }
    }

    pub(crate) fn validate(&self) -> Result<(), IntegrityError> {
        if !(2..=16).contains(&self.kqmax1) {
            return Err(IntegrityError::InvalidValue {
                dataset: "Modified Differences Type 1",
                variable: "KQMAX1",
                value: self.kqmax1 as f64,
                reason: "must be within 2..=16",
            });
        }
        for kq_i in self.kq {
            if kq_i > 15 {
                return Err(IntegrityError::InvalidValue {
                    dataset: "Modified Differences Type 1",
                    variable: "KQ",
                    value: kq_i as f64,
                    reason: "must be at most 15",
                });
            }
        }
        Ok(())
    }

    /// Krogh's recurrence: builds the interpolation-basis weights at the offset from the
    /// reference epoch, then refines the reference state with the weighted differences.
    pub fn to_pos_vel(&self, et_s: f64) -> (Vector3, Vector3) {
        let delta = et_s - self.ref_epoch;
        let mq2 = self.kqmax1 - 2;

        // Recurrence-relation coefficients from the step-size function.
        let mut fc = [0.0_f64; 15];
        let mut wc = [0.0_f64; 15];
        let mut tp = delta;
        for j in 0..mq2 {
            fc[j] = tp / self.step_sizes[j];
            wc[j] = delta / self.step_sizes[j];
            tp = delta + self.step_sizes[j];
        }

        // The W(k) basis terms for position, seeded with reciprocals.
        let mut w = [0.0_f64; 17];
        for (j, w_j) in w.iter_mut().enumerate().take(self.kqmax1) {
            *w_j = 1.0 / ((j + 1) as f64);
        }

        let mut ks = self.kqmax1 - 1;
        for jx in 1..=mq2 {
            for j in 0..jx {
                w[j + ks] = fc[j] * w[j + ks - 1] - wc[j] * w[j + ks];
            }
            ks -= 1;
        }
        // ks is now 1: the weights for the position sums are in place.

        let mut pos_km = Vector3::zeros();
        let mut vel_km_s = Vector3::zeros();

        for i in 0..3 {
            let mut poly_sum = 0.0;
            for j in 0..self.kq[i] {
                poly_sum += self.diff_array[i * 15 + j] * w[j + ks];
            }
            pos_km[i] = self.ref_pos[i] + delta * (self.ref_vel[i] + delta * poly_sum);
        }

        // One more recurrence pass turns the position weights into velocity weights.
        for j in 1..=mq2 {
            w[j] = fc[j - 1] * w[j - 1] - wc[j - 1] * w[j];
        }
        ks -= 1;

        for i in 0..3 {
            let mut poly_sum = 0.0;
            for j in 0..self.kq[i] {
                poly_sum += self.diff_array[i * 15 + j] * w[j + ks];
            }
            vel_km_s[i] = self.ref_vel[i] + delta * poly_sum;
        }

        (pos_km, vel_km_s)
    }
}

impl fmt::Display for ModifiedDiffRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod mda_ut {
    use super::ModifiedDiffRecord;
    use approx::assert_abs_diff_eq;

    /// A pure two-body-free record: all differences zero, so the state must reduce to
    /// linear motion from the reference state.
    #[test]
    fn zero_differences_reduce_to_linear_motion() {
        let mut rcrd = [0.0_f64; 71];
        rcrd[0] = 1_000.0; // reference epoch
        for g in rcrd.iter_mut().take(16).skip(1) {
            *g = 16.0; // step sizes must be non-zero
        }
        rcrd[16] = 7_000.0; // x
        rcrd[17] = 1.0; // vx
        rcrd[18] = -4_000.0; // y
        rcrd[19] = -2.5; // vy
        rcrd[20] = 123.0; // z
        rcrd[21] = 0.25; // vz
        rcrd[67] = 4.0; // kqmax1
        rcrd[68] = 3.0;
        rcrd[69] = 3.0;
        rcrd[70] = 3.0;

        let record = ModifiedDiffRecord::from_slice_f64(&rcrd);
        record.validate().unwrap();
        let (pos, vel) = record.to_pos_vel(988.0);
        let dt = 988.0 - 1_000.0;
        assert_abs_diff_eq!(pos[0], 7_000.0 + dt * 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pos[1], -4_000.0 + dt * -2.5, epsilon = 1e-9);
        assert_abs_diff_eq!(pos[2], 123.0 + dt * 0.25, epsilon = 1e-9);
        assert_abs_diff_eq!(vel[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(vel[1], -2.5, epsilon = 1e-12);
        assert_abs_diff_eq!(vel[2], 0.25, epsilon = 1e-12);
    }

    /// With differences present, the velocity must stay the time derivative of the
    /// position to within finite-difference accuracy.
    #[test]
    fn velocity_is_derivative_of_position() {
        let mut rcrd = [0.0_f64; 71];
        rcrd[0] = 0.0;
        for (j, g) in rcrd.iter_mut().take(16).skip(1).enumerate() {
            *g = 32.0 + j as f64;
        }
        rcrd[16] = 1_000.0;
        rcrd[17] = 0.3;
        rcrd[18] = 2_000.0;
        rcrd[19] = -0.6;
        rcrd[20] = -500.0;
        rcrd[21] = 0.05;
        // Small, decaying differences on each component
        for i in 0..3 {
            for j in 0..5 {
                rcrd[22 + i * 15 + j] = 1e-4 / ((j + 1) as f64 * (i + 1) as f64);
            }
        }
        rcrd[67] = 7.0; // kqmax1
        rcrd[68] = 5.0;
        rcrd[69] = 5.0;
        rcrd[70] = 5.0;

        let record = ModifiedDiffRecord::from_slice_f64(&rcrd);
        record.validate().unwrap();
        let t = -3.0;
        let h = 1e-3;
        let (_, vel) = record.to_pos_vel(t);
        let (above, _) = record.to_pos_vel(t + h);
        let (below, _) = record.to_pos_vel(t - h);
        for i in 0..3 {
            let fd = (above[i] - below[i]) / (2.0 * h);
            assert_abs_diff_eq!(vel[i], fd, epsilon = 1e-6);
        }
    }
}
