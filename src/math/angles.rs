/*
 * Helios Toolkit
 * Copyright (C) 2023-onward the Helios contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use core::f64::consts::TAU;

/// Returns the provided angle bounded between 0.0 and 360.0.
///
/// If the angle is negative, it will be converted to a positive angle in the equivalent position.
/// For example, an angle of -90 degrees will be converted to 270 degrees.
pub fn between_0_360(angle_deg: f64) -> f64 {
    angle_deg.rem_euclid(360.0)
}

/// Returns the provided angle in radians bounded between 0 and two pi.
pub fn between_0_tau(angle_rad: f64) -> f64 {
    angle_rad.rem_euclid(TAU)
}

/// Returns the provided angle in radians bounded between minus pi and pi.
pub fn between_pm_pi(angle_rad: f64) -> f64 {
    let mut bounded = angle_rad.rem_euclid(TAU);
    if bounded >= core::f64::consts::PI {
        bounded -= TAU;
    }
    bounded
}
