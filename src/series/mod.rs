/*
 * Helios Toolkit
 * Copyright (C) 2023-onward the Helios contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use snafu::prelude::*;

use crate::errors::InputOutputError;

pub mod tass;
pub mod triton;

pub use tass::{SaturnMoon, TassTables};
pub use triton::TritonEphemeris;

#[derive(Clone, Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SeriesError {
    #[snafu(display("while reading {path}: {source}"))]
    SeriesIO {
        path: String,
        source: InputOutputError,
    },
    #[snafu(display("{path}:{line}: {reason}"))]
    SeriesParsing {
        path: String,
        line: usize,
        reason: &'static str,
    },
    #[snafu(display("Saturnian moon {index} is not covered by the theory"))]
    UnsupportedMoon { index: usize },
}
