/*
 * Helios Toolkit
 * Copyright (C) 2023-onward the Helios contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! The JPL approximate mean elements of the planets (Standish, "Keplerian Elements for
//! Approximate Positions of the Major Planets", tables 2a and 2b), valid from 3000 BC
//! to 3000 AD. Earth is represented by the Earth-Moon barycenter.

use super::keplerian::PlanetaryElements;
use crate::time::JulianDate;

/// First Julian date the approximate elements are fitted for: 3000 BC Jan 1.
pub const APPROXIMATE_WINDOW_START: JulianDate = JulianDate::new(625_673.5);

/// Last Julian date the approximate elements are fitted for: 3000 AD Jan 1.
pub const APPROXIMATE_WINDOW_END: JulianDate = JulianDate::new(2_816_787.5);

pub const APPROXIMATE_PLANETS: [PlanetaryElements; 9] = [
    PlanetaryElements {
        name: "Mercury",
        elements: [
            0.387_098_43,
            0.205_636_61,
            7.005_594_32,
            252.251_667_24,
            77.457_718_95,
            48.339_618_19,
        ],
        rates_per_century: [
            0.0,
            0.000_021_23,
            -0.005_901_58,
            149_472.674_866_23,
            0.159_400_13,
            -0.122_141_82,
        ],
        correction: None,
    },
    PlanetaryElements {
        name: "Venus",
        elements: [
            0.723_321_02,
            0.006_763_99,
            3.397_775_45,
            181.979_708_50,
            131.767_557_13,
            76.672_614_96,
        ],
        rates_per_century: [
            -0.000_000_26,
            -0.000_051_07,
            0.000_434_94,
            58_517.815_602_60,
            0.056_796_48,
            -0.272_741_74,
        ],
        correction: None,
    },
    PlanetaryElements {
        name: "Earth",
        elements: [
            1.000_000_18,
            0.016_731_63,
            -0.000_543_46,
            100.466_915_72,
            102.930_058_85,
            -5.112_603_89,
        ],
        rates_per_century: [
            -0.000_000_03,
            -0.000_036_61,
            -0.013_371_78,
            35_999.373_063_29,
            0.317_952_60,
            -0.241_238_56,
        ],
        correction: None,
    },
    PlanetaryElements {
        name: "Mars",
        elements: [
            1.523_712_43,
            0.093_365_11,
            1.851_818_69,
            -4.568_131_64,
            -23.917_447_84,
            49.713_209_84,
        ],
        rates_per_century: [
            0.000_000_97,
            0.000_091_49,
            -0.007_247_57,
            19_140.299_342_43,
            0.452_236_25,
            -0.268_524_31,
        ],
        correction: None,
    },
    PlanetaryElements {
        name: "Jupiter",
        elements: [
            5.202_480_19,
            0.048_535_90,
            1.298_614_16,
            34.334_791_52,
            14.274_952_44,
            100.292_826_54,
        ],
        rates_per_century: [
            -0.000_028_64,
            0.000_180_26,
            -0.003_226_99,
            3_034.903_717_57,
            0.181_991_96,
            0.130_246_19,
        ],
        correction: Some([-0.000_124_52, 0.060_640_60, -0.356_354_38, 38.351_250_00]),
    },
    PlanetaryElements {
        name: "Saturn",
        elements: [
            9.541_498_83,
            0.055_508_25,
            2.494_241_02,
            50.075_713_29,
            92.861_360_63,
            113.639_987_02,
        ],
        rates_per_century: [
            -0.000_030_65,
            -0.000_320_44,
            0.004_519_69,
            1_222.114_947_24,
            0.541_794_78,
            -0.250_150_02,
        ],
        correction: Some([0.000_258_99, -0.134_344_69, 0.873_201_47, 38.351_250_00]),
    },
    PlanetaryElements {
        name: "Uranus",
        elements: [
            19.187_979_48,
            0.046_857_40,
            0.772_981_27,
            314.202_766_25,
            172.434_044_41,
            73.962_502_15,
        ],
        rates_per_century: [
            -0.000_204_55,
            -0.000_015_50,
            -0.001_801_55,
            428.495_125_95,
            0.092_669_85,
            0.057_396_99,
        ],
        correction: Some([0.000_583_31, -0.977_318_48, 0.176_892_45, 7.670_250_00]),
    },
    PlanetaryElements {
        name: "Neptune",
        elements: [
            30.069_527_52,
            0.008_954_39,
            1.770_055_20,
            304.222_892_87,
            46.681_587_24,
            131.786_358_53,
        ],
        rates_per_century: [
            0.000_064_47,
            0.000_008_18,
            0.000_224_00,
            218.465_153_14,
            0.010_099_38,
            -0.006_063_02,
        ],
        correction: Some([-0.000_413_48, 0.683_463_18, -0.101_625_47, 7.670_250_00]),
    },
    PlanetaryElements {
        name: "Pluto",
        elements: [
            39.486_860_35,
            0.248_852_38,
            17.141_042_60,
            238.965_350_11,
            224.097_025_98,
            110.301_679_86,
        ],
        rates_per_century: [
            0.004_497_51,
            0.000_060_16,
            0.000_005_01,
            145.180_429_03,
            -0.009_688_27,
            -0.008_099_81,
        ],
        correction: Some([-0.012_627_24, 0.0, 0.0, 0.0]),
    },
];

/// Looks a planet up by its product name.
pub fn approximate_elements_of(name: &str) -> Option<&'static PlanetaryElements> {
    APPROXIMATE_PLANETS.iter().find(|p| p.name == name)
}
