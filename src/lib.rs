#![doc = include_str!("../README.md")]
/*
 * Helios Toolkit
 * Copyright (C) 2023-onward the Helios contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

extern crate log;

pub mod astro;
pub mod constants;
pub mod errors;
pub mod frames;
pub mod math;
pub mod naif;
pub mod series;
pub mod system;
pub mod time;

pub mod prelude {
    pub use crate::errors::InputOutputError;
    pub use crate::math::Vector3;
    pub use crate::naif::SPK;
    pub use crate::system::{EphemerisError, SolarSystem};
    pub use crate::time::{CivilDate, Era, JulianDate};
    pub use std::fs::File;
}

/// Defines the number of bytes in a double (prevents magic numbers)
pub(crate) const DBL_SIZE: usize = 8;

/// NAIF integer codes identify targets, observers and frames.
pub type NaifId = i32;

/// Memory maps a file and **copies** the data on the heap prior to returning a pointer to this heap data.
#[macro_export]
macro_rules! file2heap {
    ($filename:tt) => {
        match File::open($filename) {
            Err(e) => Err(InputOutputError::IOError { kind: e.kind() }),
            Ok(file) => unsafe {
                use bytes::Bytes;
                use memmap2::MmapOptions;
                match MmapOptions::new().map(&file) {
                    Err(_) => Err(InputOutputError::IOUnknownError),
                    Ok(mmap) => {
                        let bytes = Bytes::copy_from_slice(&mmap);
                        Ok(bytes)
                    }
                }
            },
        }
    };
}
