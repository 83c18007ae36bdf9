/*
 * Helios Toolkit
 * Copyright (C) 2023-onward the Helios contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Analytical theory of Triton after Emelyanov & Samorodov (2015): a precessing
//! circular orbit on a fixed plane near Neptune's equator, with solar perturbations
//! carried by three short trigonometric series.

use crate::constants::SECONDS_PER_DAY;
use crate::frames::equatorial_to_ecliptic;
use crate::math::{rotation_x, rotation_z, Vector3};
use crate::time::JulianDate;

/// Mean distance of Triton from Neptune, km.
const SEMI_MAJOR_AXIS_KM: f64 = 354_758.98;

/// Inclination of the orbit to the fixed plane, degrees (retrograde).
const INCLINATION_DEG: f64 = 156.865_618_83;

/// Right ascension and declination of the pole of the fixed plane, degrees (EQJ2000).
const POLE_RA_DEG: f64 = 299.461_07;
const POLE_DEC_DEG: f64 = 43.402_73;

/// Epoch of the mean angles, JD (TDB).
const T0_JD: f64 = 2_451_545.0;
/// Epoch of the auxiliary anomaly, JD (TDB), at 1950 Jan 1.0.
const TS_JD: f64 = 2_433_282.5;

/// Mean argument of latitude at T0 and its rate, degrees and degrees per day.
const U0_DEG: f64 = 33.619_554;
const U_RATE_DEG_DAY: f64 = 61.257_263_8;

/// Auxiliary (anomalistic) argument at TS and its rate, degrees and degrees per day.
const UP0_DEG: f64 = 358.640_912;
const UP_RATE_DEG_DAY: f64 = 61.258_820_5;

/// Node of the orbit on the fixed plane at T0 and its precession rate (687.4-year
/// period), degrees and degrees per day.
const NODE0_DEG: f64 = 221.641_77;
const NODE_RATE_DEG_DAY: f64 = 0.001_434_06;

/// Mean longitude of the Sun as seen from Neptune at T0 and its rate (one revolution
/// per Neptune year), degrees and degrees per day.
const SUN0_DEG: f64 = 358.321_09;
const SUN_RATE_DEG_DAY: f64 = 0.005_981_82;

/// Solar perturbation series: amplitude in degrees and the integer multipliers of the
/// auxiliary anomaly u' and of the Sun-from-node elongation.
struct PerturbationTerm {
    amplitude_deg: f64,
    k_anomaly: i8,
    k_sun: i8,
}

const INCLINATION_TERMS: [PerturbationTerm; 7] = [
    PerturbationTerm { amplitude_deg: -0.025_614, k_anomaly: 0, k_sun: 2 },
    PerturbationTerm { amplitude_deg: 0.009_796, k_anomaly: 0, k_sun: 4 },
    PerturbationTerm { amplitude_deg: 0.006_836, k_anomaly: 1, k_sun: -2 },
    PerturbationTerm { amplitude_deg: -0.003_709, k_anomaly: 1, k_sun: 0 },
    PerturbationTerm { amplitude_deg: 0.001_907, k_anomaly: 1, k_sun: 2 },
    PerturbationTerm { amplitude_deg: -0.001_021, k_anomaly: 2, k_sun: 0 },
    PerturbationTerm { amplitude_deg: 0.000_672, k_anomaly: 2, k_sun: 2 },
];

const LATITUDE_TERMS: [PerturbationTerm; 7] = [
    PerturbationTerm { amplitude_deg: 0.029_363, k_anomaly: 0, k_sun: 2 },
    PerturbationTerm { amplitude_deg: -0.011_242, k_anomaly: 0, k_sun: 4 },
    PerturbationTerm { amplitude_deg: 0.007_825, k_anomaly: 1, k_sun: -2 },
    PerturbationTerm { amplitude_deg: 0.004_249, k_anomaly: 1, k_sun: 0 },
    PerturbationTerm { amplitude_deg: -0.002_183, k_anomaly: 1, k_sun: 2 },
    PerturbationTerm { amplitude_deg: 0.001_169, k_anomaly: 2, k_sun: 0 },
    PerturbationTerm { amplitude_deg: -0.000_770, k_anomaly: 2, k_sun: 2 },
];

const NODE_TERMS: [PerturbationTerm; 7] = [
    PerturbationTerm { amplitude_deg: 0.057_355, k_anomaly: 0, k_sun: 2 },
    PerturbationTerm { amplitude_deg: -0.021_953, k_anomaly: 0, k_sun: 4 },
    PerturbationTerm { amplitude_deg: 0.015_305, k_anomaly: 1, k_sun: -2 },
    PerturbationTerm { amplitude_deg: -0.008_302, k_anomaly: 1, k_sun: 0 },
    PerturbationTerm { amplitude_deg: 0.004_266, k_anomaly: 1, k_sun: 2 },
    PerturbationTerm { amplitude_deg: -0.002_286, k_anomaly: 2, k_sun: 0 },
    PerturbationTerm { amplitude_deg: 0.001_503, k_anomaly: 2, k_sun: 2 },
];

/// Evaluates one 7-term series and its time derivative, in degrees and degrees per day.
/// `days_ts` counts from the anomaly epoch, `days_t0` from the angle epoch.
fn perturbation(
    terms: &[PerturbationTerm; 7],
    days_ts: f64,
    days_t0: f64,
    use_sine: bool,
) -> (f64, f64) {
    let anomaly = (UP0_DEG + UP_RATE_DEG_DAY * days_ts).to_radians();
    let elong = (SUN0_DEG + SUN_RATE_DEG_DAY * days_t0
        - (NODE0_DEG + NODE_RATE_DEG_DAY * days_t0))
        .to_radians();
    let anomaly_rate = UP_RATE_DEG_DAY.to_radians();
    let elong_rate = (SUN_RATE_DEG_DAY - NODE_RATE_DEG_DAY).to_radians();

    let mut value = 0.0;
    let mut rate = 0.0;
    for term in terms {
        let arg = f64::from(term.k_anomaly) * anomaly + f64::from(term.k_sun) * elong;
        // The argument rate is in radians per day, which is a plain per-day factor on
        // the dimensionless trigonometric derivative.
        let arg_rate =
            f64::from(term.k_anomaly) * anomaly_rate + f64::from(term.k_sun) * elong_rate;
        if use_sine {
            value += term.amplitude_deg * arg.sin();
            rate += term.amplitude_deg * arg.cos() * arg_rate;
        } else {
            value += term.amplitude_deg * arg.cos();
            rate -= term.amplitude_deg * arg.sin() * arg_rate;
        }
    }
    (value, rate)
}

/// The Triton provider. The theory is closed form, so this carries no state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TritonEphemeris;

impl TritonEphemeris {
    /// Neptune-centric position (m) and velocity (m/s) of Triton in the ecliptic J2000
    /// frame. The velocity is the analytic time derivative of the series.
    pub fn state_at(&self, jd: JulianDate) -> (Vector3, Vector3) {
        let days_t0 = jd.days() - T0_JD;
        let days_ts = jd.days() - TS_JD;

        let (d_inc, d_inc_rate) = perturbation(&INCLINATION_TERMS, days_ts, days_t0, false);
        let (d_lat, d_lat_rate) = perturbation(&LATITUDE_TERMS, days_ts, days_t0, true);
        let (d_node, d_node_rate) = perturbation(&NODE_TERMS, days_ts, days_t0, true);

        let u = (U0_DEG + U_RATE_DEG_DAY * days_t0 + d_lat).to_radians();
        let inc = (INCLINATION_DEG + d_inc).to_radians();
        let node = (NODE0_DEG + NODE_RATE_DEG_DAY * days_t0 + d_node).to_radians();

        // Rates in radians per second
        let u_rate = (U_RATE_DEG_DAY + d_lat_rate).to_radians() / SECONDS_PER_DAY;
        let inc_rate = d_inc_rate.to_radians() / SECONDS_PER_DAY;
        let node_rate = (NODE_RATE_DEG_DAY + d_node_rate).to_radians() / SECONDS_PER_DAY;

        let a_m = SEMI_MAJOR_AXIS_KM * 1e3;
        let (sin_u, cos_u) = u.sin_cos();
        let (sin_o, cos_o) = node.sin_cos();
        let (sin_i, cos_i) = inc.sin_cos();

        let pos_plane = Vector3::new(
            a_m * (cos_u * cos_o - sin_u * sin_o * cos_i),
            a_m * (cos_u * sin_o + sin_u * cos_o * cos_i),
            a_m * (sin_u * sin_i),
        );

        // Partial derivatives of the position with respect to the three angles
        let d_du = Vector3::new(
            a_m * (-sin_u * cos_o - cos_u * sin_o * cos_i),
            a_m * (-sin_u * sin_o + cos_u * cos_o * cos_i),
            a_m * (cos_u * sin_i),
        );
        let d_dnode = Vector3::new(
            a_m * (-cos_u * sin_o - sin_u * cos_o * cos_i),
            a_m * (cos_u * cos_o - sin_u * sin_o * cos_i),
            0.0,
        );
        let d_dinc = Vector3::new(
            a_m * (sin_u * sin_o * sin_i),
            a_m * (-sin_u * cos_o * sin_i),
            a_m * (sin_u * cos_i),
        );

        let vel_plane = d_du * u_rate + d_dnode * node_rate + d_dinc * inc_rate;

        // From the fixed plane into equatorial J2000 through the plane's pole, then the
        // ecliptic tilt.
        let pole = rotation_z((POLE_RA_DEG + 90.0).to_radians())
            * rotation_x((90.0 - POLE_DEC_DEG).to_radians());
        (
            equatorial_to_ecliptic(&(pole * pos_plane)),
            equatorial_to_ecliptic(&(pole * vel_plane)),
        )
    }
}

#[cfg(test)]
mod triton_ut {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn distance_stays_on_the_mean_orbit() {
        let eph = TritonEphemeris;
        // The orbit is circular: the radius is the semi-major axis at any date,
        // including the reference date of the published comparison.
        for jd in [2_451_497.5, 2_433_282.5, 2_451_545.0, 2_469_807.5] {
            let (pos, _) = eph.state_at(JulianDate::new(jd));
            assert_relative_eq!(pos.norm(), 3.547_589_8e8, max_relative = 1e-9);
        }
    }

    #[test]
    fn period_is_5_877_days() {
        let eph = TritonEphemeris;
        let jd = JulianDate::new(2_451_545.0);
        let (p0, _) = eph.state_at(jd);
        let (p1, _) = eph.state_at(jd.offset_days(360.0 / U_RATE_DEG_DAY));
        // One draconic revolution later Triton is back, up to the slow node drift.
        assert!((p1 - p0).norm() < 1e-3 * p0.norm());
    }

    #[test]
    fn orbital_speed_matches_the_circular_orbit() {
        let eph = TritonEphemeris;
        let (_, vel) = eph.state_at(JulianDate::new(2_455_000.5));
        // v = 2 pi a / P with P = 5.876854 days
        let expected = core::f64::consts::TAU * 3.547_589_8e8 / (5.876_854 * 86_400.0);
        assert_relative_eq!(vel.norm(), expected, max_relative = 1e-3);
    }

    /// The legacy cross-check: the analytic velocity against a central difference of
    /// the position with a step of 0.01 day.
    #[test]
    fn analytic_velocity_matches_numerical_differencing() {
        let eph = TritonEphemeris;
        let jd = JulianDate::new(2_451_497.5);
        let dt_days = 0.01;
        let (_, vel) = eph.state_at(jd);
        let (above, _) = eph.state_at(jd.offset_days(dt_days));
        let (below, _) = eph.state_at(jd.offset_days(-dt_days));
        let fd = (above - below) / (2.0 * dt_days * 86_400.0);
        assert!((fd - vel).norm() / vel.norm() < 1e-4);
    }

    #[test]
    fn orbit_is_retrograde() {
        let eph = TritonEphemeris;
        let jd = JulianDate::new(2_451_545.0);
        let (pos, vel) = eph.state_at(jd);
        // The angular momentum of a retrograde orbit points south of the ecliptic.
        assert!(pos.cross(&vel)[2] < 0.0);
    }
}
