/*
 * Helios Toolkit
 * Copyright (C) 2023-onward the Helios contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use core::fmt;

use super::DAFError;

/// The SPK segment data types this toolkit evaluates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DafDataType {
    /// Modified divided differences in fixed 71-double records
    Type1ModifiedDifferences = 1,
    /// Chebyshev polynomials over uniform intervals, position only
    Type2ChebyshevTriplet = 2,
    /// Chebyshev polynomials over uniform intervals, position and velocity
    Type3ChebyshevSextuplet = 3,
}

impl TryFrom<i32> for DafDataType {
    type Error = DAFError;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        match id {
            1 => Ok(Self::Type1ModifiedDifferences),
            2 => Ok(Self::Type2ChebyshevTriplet),
            3 => Ok(Self::Type3ChebyshevSextuplet),
            _ => Err(DAFError::UnsupportedDatatype { id }),
        }
    }
}

impl fmt::Display for DafDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type1ModifiedDifferences => write!(f, "Modified Differences (type 1)"),
            Self::Type2ChebyshevTriplet => write!(f, "Chebyshev position (type 2)"),
            Self::Type3ChebyshevSextuplet => write!(f, "Chebyshev position and velocity (type 3)"),
        }
    }
}
