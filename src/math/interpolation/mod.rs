/*
 * Helios Toolkit
 * Copyright (C) 2023-onward the Helios contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

mod chebyshev;

pub use chebyshev::chebyshev_eval;
use snafu::Snafu;

use crate::errors::{DecodingError, MathError};

#[derive(Clone, Debug, Snafu, PartialEq)]
#[snafu(visibility(pub(crate)))]
pub enum InterpolationError {
    #[snafu(display("decoding error during interpolation: {source}"))]
    InterpDecoding { source: DecodingError },
    #[snafu(display("math error during interpolation: {source}"))]
    InterpMath { source: MathError },
    #[snafu(display(
        "interpolation data valid from {start_et_s} to {end_et_s} s past J2000 but requested {req_et_s}"
    ))]
    NoInterpolationData {
        req_et_s: f64,
        start_et_s: f64,
        end_et_s: f64,
    },
    #[snafu(display("no interpolation data at {et_s} s past J2000, but prior checks succeeded (check integrity of the data?)"))]
    MissingInterpolationData { et_s: f64 },
}
