/*
 * Helios Toolkit
 * Copyright (C) 2023-onward the Helios contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::math::{Matrix3, Vector3};

/// Sine of the J2000 mean obliquity as carried by the product frame definition; the
/// sign encodes the direction of the equatorial-to-ecliptic rotation.
pub const SIN_OBLIQUITY_J2000: f64 = -0.397_776_995;

fn cos_obliquity() -> f64 {
    (1.0 - SIN_OBLIQUITY_J2000 * SIN_OBLIQUITY_J2000).sqrt()
}

/// Rotates a vector from the equatorial J2000 frame into the ecliptic J2000 frame.
/// Rotations are linear: positions and velocities transform identically.
pub fn equatorial_to_ecliptic(v: &Vector3) -> Vector3 {
    let (s, c) = (SIN_OBLIQUITY_J2000, cos_obliquity());
    Vector3::new(v[0], c * v[1] - s * v[2], s * v[1] + c * v[2])
}

/// Inverse of [equatorial_to_ecliptic].
pub fn ecliptic_to_equatorial(v: &Vector3) -> Vector3 {
    let (s, c) = (SIN_OBLIQUITY_J2000, cos_obliquity());
    Vector3::new(v[0], c * v[1] + s * v[2], -s * v[1] + c * v[2])
}

/// The IAU 1976 precession rotation from the B1950 frame to J2000, as tabulated by
/// Lieske (1979) and used for the spacecraft kernels that carry B1950 states.
pub fn b1950_to_j2000_matrix() -> Matrix3 {
    Matrix3::new(
        0.999_925_679_495_687_7,
        -0.011_181_483_220_466_2,
        -0.004_859_003_815_359_2,
        0.011_181_483_239_171_7,
        0.999_937_484_893_313_5,
        -0.000_027_162_594_714_2,
        0.004_859_003_772_314_3,
        -0.000_027_170_293_744_0,
        0.999_988_194_602_374_2,
    )
}

/// Rotates a B1950 vector into the J2000 frame.
pub fn b1950_to_j2000(v: &Vector3) -> Vector3 {
    b1950_to_j2000_matrix() * v
}

#[cfg(test)]
mod frames_ut {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ecliptic_rotation_is_an_involution() {
        let vectors = [
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(1.47e11, -9.3e10, 4.2e7),
            Vector3::new(-3.2, 17.9, -0.004),
        ];
        for v in vectors {
            let round = ecliptic_to_equatorial(&equatorial_to_ecliptic(&v));
            assert_relative_eq!(round[0], v[0], max_relative = 1e-12);
            assert_relative_eq!(round[1], v[1], max_relative = 1e-12);
            assert_relative_eq!(round[2], v[2], max_relative = 1e-12);
        }
    }

    #[test]
    fn ecliptic_rotation_preserves_magnitude() {
        let v = Vector3::new(3.0, -4.0, 12.0);
        assert_relative_eq!(
            equatorial_to_ecliptic(&v).norm(),
            v.norm(),
            max_relative = 1e-14
        );
    }

    #[test]
    fn north_equatorial_pole_maps_toward_ecliptic_pole() {
        // The celestial pole tilts toward -y in ecliptic coordinates by the obliquity.
        let pole = equatorial_to_ecliptic(&Vector3::new(0.0, 0.0, 1.0));
        assert!(pole[2] > 0.91 && pole[2] < 0.92);
        assert_relative_eq!(pole[1], SIN_OBLIQUITY_J2000, max_relative = 1e-12);
    }

    #[test]
    fn b1950_rotation_is_orthonormal() {
        let m = b1950_to_j2000_matrix();
        let identity = m * m.transpose();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((identity[(i, j)] - expected).abs() < 1e-8);
            }
        }
    }
}
