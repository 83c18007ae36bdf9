/*
 * Helios Toolkit
 * Copyright (C) 2023-onward the Helios contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

pub mod daf;
pub mod pretty_print;
pub mod spk;

use self::daf::daf::DAF;

/// Spacecraft and Planet Kernel
pub type SPK = DAF;

/// Parses the input bytes as the provided type, swapping bytes when the file order
/// differs from the machine order.
#[macro_export]
macro_rules! parse_bytes_as {
    ($type:ident, $input:expr, $order:expr) => {{
        let (int_bytes, _) = $input.split_at(std::mem::size_of::<$type>());

        match $order {
            $crate::naif::Endian::Little => $type::from_le_bytes(int_bytes.try_into().unwrap()),
            $crate::naif::Endian::Big => $type::from_be_bytes(int_bytes.try_into().unwrap()),
        }
    }};
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    /// Returns the byte order of the platform we're running on.
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            Self::Big
        } else {
            Self::Little
        }
    }

    /// Reinterprets a u32 that zerocopy assembled in machine order as a value in this byte order.
    pub fn cast_u32(&self, raw: u32) -> u32 {
        if *self == Self::native() {
            raw
        } else {
            raw.swap_bytes()
        }
    }

    /// Reinterprets an f64 that zerocopy assembled in machine order as a value in this byte order.
    pub fn cast_f64(&self, raw: f64) -> f64 {
        if *self == Self::native() {
            raw
        } else {
            f64::from_bits(raw.to_bits().swap_bytes())
        }
    }
}
