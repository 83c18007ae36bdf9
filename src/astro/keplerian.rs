/*
 * Helios Toolkit
 * Copyright (C) 2023-onward the Helios contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use core::f64::consts::PI;

use crate::constants::{ASTRONOMICAL_UNIT_M, DAYS_PER_CENTURY, SECONDS_PER_CENTURY};
use crate::math::angles::between_pm_pi;
use crate::math::{rotation_x, rotation_x_deriv, rotation_z, rotation_z_deriv, Vector3};
use crate::time::{JulianDate, J2000_JD};

/// Convergence tolerance of the Kepler solver, in radians.
pub const KEPLER_TOL_RAD: f64 = 1e-14;

/// Iteration cap of the Kepler solver; the solution at the cap is returned as-is.
pub const KEPLER_MAX_ITER: usize = 20;

/// Inverts Kepler's equation `M = E - e sin E` for the eccentric anomaly with Halley's
/// method. Converges to [KEPLER_TOL_RAD] in a handful of iterations for elliptic
/// eccentricities; stops after [KEPLER_MAX_ITER] rounds regardless.
pub fn solve_kepler(mean_anomaly_rad: f64, ecc: f64) -> f64 {
    let m = between_pm_pi(mean_anomaly_rad);
    let mut ecc_anom = if ecc < 0.8 { m } else { PI * m.signum() };

    for _ in 0..KEPLER_MAX_ITER {
        let (sin_e, cos_e) = ecc_anom.sin_cos();
        let f = ecc_anom - ecc * sin_e - m;
        let f_prime = 1.0 - ecc * cos_e;
        let f_second = ecc * sin_e;
        let delta = -2.0 * f * f_prime / (2.0 * f_prime * f_prime - f * f_second);
        ecc_anom += delta;
        if delta.abs() < KEPLER_TOL_RAD {
            break;
        }
    }

    ecc_anom
}

/// Mean Keplerian elements of a planet with their secular rates, in the JPL
/// approximate-elements form: values at J2000, rates per Julian century, angles in
/// degrees, semi-major axis in astronomical units. The element order of each row is
/// (a, e, I, L, long.peri., long.node).
///
/// The outer planets additionally carry the four long-period correction terms
/// (b, c, s, f) applied to the mean anomaly over the 3000 BC to 3000 AD span.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlanetaryElements {
    pub name: &'static str,
    /// (a [AU], e, I [deg], L [deg], ϖ [deg], Ω [deg]) at J2000
    pub elements: [f64; 6],
    /// Rates of the six elements per Julian century
    pub rates_per_century: [f64; 6],
    /// Long-period mean-anomaly corrections (b, c, s, f), degrees and deg/century
    pub correction: Option<[f64; 4]>,
}

impl PlanetaryElements {
    /// Builds an entry from a tabulated row of 12 doubles (six elements followed by
    /// their six rates).
    pub const fn from_row(name: &'static str, row: [f64; 12]) -> Self {
        Self {
            name,
            elements: [row[0], row[1], row[2], row[3], row[4], row[5]],
            rates_per_century: [row[6], row[7], row[8], row[9], row[10], row[11]],
            correction: None,
        }
    }

    /// Heliocentric position (m) and velocity (m/s) in the ecliptic J2000 frame.
    ///
    /// The velocity is the analytic derivative of the element expressions through the
    /// tabulated century rates, including the frame rotation rates.
    pub fn state_at(&self, jd: JulianDate) -> (Vector3, Vector3) {
        let t = (jd.days() - J2000_JD) / DAYS_PER_CENTURY;

        let [a0, e0, i0, l0, peri0, node0] = self.elements;
        let [a_dot, e_dot, i_dot_deg, l_dot, peri_dot, node_dot] = self.rates_per_century;

        let sma = a0 + a_dot * t;
        let ecc = e0 + e_dot * t;
        let inc = (i0 + i_dot_deg * t).to_radians();
        let peri = peri0 + peri_dot * t;
        let node = node0 + node_dot * t;

        let mut mean_anom_deg = l0 + l_dot * t - peri;
        let mut mean_anom_dot_deg = l_dot - peri_dot;
        if let Some([b, c, s, f]) = self.correction {
            let ft = (f * t).to_radians();
            mean_anom_deg += b * t * t + c * ft.cos() + s * ft.sin();
            mean_anom_dot_deg +=
                2.0 * b * t + (-c * ft.sin() + s * ft.cos()) * f.to_radians();
        }

        let mean_anom = between_pm_pi(mean_anom_deg.to_radians());
        let ecc_anom = solve_kepler(mean_anom, ecc);
        let (sin_e, cos_e) = ecc_anom.sin_cos();
        let ecc_factor = (1.0 - ecc * ecc).sqrt();

        // In-plane state, AU and AU per century
        let x_p = sma * (cos_e - ecc);
        let y_p = sma * ecc_factor * sin_e;

        let mean_anom_dot = mean_anom_dot_deg.to_radians();
        let ecc_anom_dot = (mean_anom_dot + e_dot * sin_e) / (1.0 - ecc * cos_e);
        let x_p_dot = a_dot * (cos_e - ecc) + sma * (-sin_e * ecc_anom_dot - e_dot);
        let y_p_dot = a_dot * ecc_factor * sin_e - sma * ecc * e_dot * sin_e / ecc_factor
            + sma * ecc_factor * cos_e * ecc_anom_dot;

        // Rotate through the argument of perihelion, the inclination and the node; the
        // rotation itself drifts with the element rates, so its derivative contributes.
        let arg_peri = (peri - node).to_radians();
        let raan = node.to_radians();
        let arg_peri_dot = (peri_dot - node_dot).to_radians();
        let raan_dot = node_dot.to_radians();
        let inc_dot = i_dot_deg.to_radians();

        let rot = rotation_z(raan) * rotation_x(inc) * rotation_z(arg_peri);
        let rot_dot = rotation_z_deriv(raan) * raan_dot * rotation_x(inc) * rotation_z(arg_peri)
            + rotation_z(raan) * rotation_x_deriv(inc) * inc_dot * rotation_z(arg_peri)
            + rotation_z(raan) * rotation_x(inc) * rotation_z_deriv(arg_peri) * arg_peri_dot;

        let p_plane = Vector3::new(x_p, y_p, 0.0);
        let v_plane = Vector3::new(x_p_dot, y_p_dot, 0.0);

        let pos_m = rot * p_plane * ASTRONOMICAL_UNIT_M;
        let vel_m_s =
            (rot_dot * p_plane + rot * v_plane) * (ASTRONOMICAL_UNIT_M / SECONDS_PER_CENTURY);

        (pos_m, vel_m_s)
    }
}
