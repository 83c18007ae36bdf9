/*
 * Helios Toolkit
 * Copyright (C) 2023-onward the Helios contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::errors::MathError;

use super::InterpolationError;

/// Evaluates a Chebyshev series with the Clenshaw recurrence, returning the value and its
/// time derivative in units-per-second.
///
/// # Notes
/// 1. The coefficients are expected to be in Chebyshev format and no verification is done.
/// 2. The derivative of the recurrence runs alongside the value, and is scaled by the
///    interval radius to map the normalized time back to seconds.
pub fn chebyshev_eval(
    normalized_time: f64,
    coeffs: &[f64],
    radius_s: f64,
    degree: usize,
) -> Result<(f64, f64), InterpolationError> {
    if radius_s.abs() < f64::EPSILON {
        return Err(InterpolationError::InterpMath {
            source: MathError::DivisionByZero {
                action: "interval radius in Chebyshev eval is zero",
            },
        });
    }

    // Workspace arrays
    let mut w = [0.0_f64; 3];
    let mut dw = [0.0_f64; 3];

    for j in (2..=degree + 1).rev() {
        let c_j = coeffs
            .get(j - 1)
            .ok_or(InterpolationError::MissingInterpolationData { et_s: f64::NAN })?;
        w[2] = w[1];
        w[1] = w[0];
        w[0] = c_j + (2.0 * normalized_time * w[1] - w[2]);

        dw[2] = dw[1];
        dw[1] = dw[0];
        dw[0] = w[1] * 2. + dw[1] * 2.0 * normalized_time - dw[2];
    }

    let c_0 = coeffs
        .first()
        .ok_or(InterpolationError::MissingInterpolationData { et_s: f64::NAN })?;
    let val = c_0 + (normalized_time * w[0] - w[1]);
    let deriv = (w[0] + normalized_time * dw[0] - dw[1]) / radius_s;

    Ok((val, deriv))
}
