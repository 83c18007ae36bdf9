/*
 * Helios Toolkit
 * Copyright (C) 2023-onward the Helios contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! The conventional provider chain: satellite and spacecraft kernels first, the DE
//! planetary ephemeris next, the analytical theories, and the Keplerian approximation
//! as the wide-window fallback.

use std::path::Path;

use crate::constants::celestial_objects::*;
use crate::time::JulianDate;

use super::providers::{ApproximateSource, Provider, SpkOrigin, SpkSource, TassSource, TritonSource};

// Window boundaries as Julian dates; the civil equivalents are in the comments.
const JD_1600: JulianDate = JulianDate::new(2_305_447.5); // 1600-01-01
const JD_1800: JulianDate = JulianDate::new(2_378_496.5); // 1800-01-01
const JD_1850: JulianDate = JulianDate::new(2_396_758.5); // 1850-01-01
const JD_1900: JulianDate = JulianDate::new(2_415_020.5); // 1900-01-01
const JD_2100: JulianDate = JulianDate::new(2_488_069.5); // 2100-01-01
const JD_2200: JulianDate = JulianDate::new(2_524_593.5); // 2200-01-01
const JD_2030: JulianDate = JulianDate::new(2_462_502.5); // 2030-01-01

const JD_GALILEO_LAUNCH: JulianDate = JulianDate::new(2_447_818.5); // 1989-10-19
const JD_GALILEO_IMPACT: JulianDate = JulianDate::new(2_452_903.5); // 2003-09-21
const JD_VOYAGER_1_LAUNCH: JulianDate = JulianDate::new(2_443_391.5); // 1977-09-05
const JD_VOYAGER_2_LAUNCH: JulianDate = JulianDate::new(2_443_375.5); // 1977-08-20
const JD_NEW_HORIZONS_LAUNCH: JulianDate = JulianDate::new(2_453_754.5); // 2006-01-19

/// Builds the standard providers over the kernel files in `data_dir`:
/// `de405.bsp`, `jup365.bsp`, `mar097.bsp`, `plu058.bsp`, the spacecraft trajectory
/// kernels, and the TASS table `tass16.txt`. Files open lazily, on first use of the
/// provider that needs them.
pub fn standard_catalog(data_dir: &str) -> Vec<Provider> {
    let dir = Path::new(data_dir);
    let file = |name: &str| dir.join(name);

    vec![
        Provider::Spk(SpkSource::new(
            "Galilean moons",
            vec![file("jup365.bsp")],
            vec![
                ("Io", IO),
                ("Europa", EUROPA),
                ("Ganymede", GANYMEDE),
                ("Callisto", CALLISTO),
            ],
            (JD_1850, JD_2100),
            SpkOrigin::Primary {
                body: "Jupiter",
                stop: JUPITER_BARYCENTER,
            },
        )),
        Provider::Spk(SpkSource::new(
            "Martian moons",
            vec![file("mar097.bsp")],
            vec![("Phobos", PHOBOS), ("Deimos", DEIMOS)],
            (JD_1900, JD_2100),
            SpkOrigin::Primary {
                body: "Mars",
                stop: MARS_BARYCENTER,
            },
        )),
        Provider::Spk(SpkSource::new(
            "Pluto system",
            vec![file("plu058.bsp")],
            vec![
                ("Pluto", PLUTO),
                ("Charon", CHARON),
                ("Nix", NIX),
                ("Hydra", HYDRA),
                ("Kerberos", KERBEROS),
                ("Styx", STYX),
            ],
            (JD_1900, JD_2100),
            SpkOrigin::Primary {
                body: "Pluto Barycenter",
                stop: PLUTO_BARYCENTER,
            },
        )),
        // The Galileo kernel carries its states in the B1950 frame; the evaluator
        // rotates them per segment.
        Provider::Spk(SpkSource::new(
            "Galileo trajectory",
            vec![file("galileo.bsp"), file("de405.bsp")],
            vec![("Galileo", GALILEO)],
            (JD_GALILEO_LAUNCH, JD_GALILEO_IMPACT),
            SpkOrigin::Sun,
        )),
        Provider::Spk(SpkSource::new(
            "Voyager 1 trajectory",
            vec![file("voyager1.bsp"), file("de405.bsp")],
            vec![("Voyager 1", VOYAGER_1)],
            (JD_VOYAGER_1_LAUNCH, JD_2030),
            SpkOrigin::Sun,
        )),
        Provider::Spk(SpkSource::new(
            "Voyager 2 trajectory",
            vec![file("voyager2.bsp"), file("de405.bsp")],
            vec![("Voyager 2", VOYAGER_2)],
            (JD_VOYAGER_2_LAUNCH, JD_2030),
            SpkOrigin::Sun,
        )),
        Provider::Spk(SpkSource::new(
            "New Horizons trajectory",
            vec![file("newhorizons.bsp"), file("de405.bsp")],
            vec![("New Horizons", NEW_HORIZONS)],
            (JD_NEW_HORIZONS_LAUNCH, JD_2030),
            SpkOrigin::Sun,
        )),
        Provider::Spk(SpkSource::new(
            "DE planets",
            vec![file("de405.bsp")],
            vec![
                ("Mercury", MERCURY),
                ("Venus", VENUS),
                ("Earth", EARTH),
                ("Moon", MOON),
                ("Mars", MARS_BARYCENTER),
                ("Jupiter", JUPITER_BARYCENTER),
                ("Saturn", SATURN_BARYCENTER),
                ("Uranus", URANUS_BARYCENTER),
                ("Neptune", NEPTUNE_BARYCENTER),
                ("Pluto", PLUTO_BARYCENTER),
                ("Pluto Barycenter", PLUTO_BARYCENTER),
            ],
            (JD_1600, JD_2200),
            SpkOrigin::Sun,
        )),
        Provider::SaturnMoons(TassSource::new(file("tass16.txt"), (JD_1800, JD_2200))),
        Provider::Triton(TritonSource::new((JD_1800, JD_2200))),
        Provider::Approximate(ApproximateSource),
    ]
}
