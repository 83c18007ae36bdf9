/*
 * Helios Toolkit
 * Copyright (C) 2023-onward the Helios contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use core::fmt;
use snafu::prelude::*;

use crate::constants::SECONDS_PER_DAY;

/// The Julian date of the J2000 epoch, 2000-01-01 12:00.
pub const J2000_JD: f64 = 2_451_545.0;

/// First Julian date of the Gregorian calendar, 1582-10-15 00:00.
pub const GREGORIAN_START_JD: f64 = 2_299_160.5;

const MS_PER_DAY: i64 = 86_400_000;

#[derive(Clone, Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TimeError {
    #[snafu(display("invalid civil date: {reason}"))]
    InvalidDate { reason: &'static str },
    #[snafu(display(
        "JD {jd} predates the Gregorian calendar and cannot be rendered as a civil date"
    ))]
    PredatesGregorian { jd: f64 },
}

/// Civil eras. Years before Christ map onto astronomical numbering as 1 BC = 0, 2 BC = -1.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Era {
    BeforeChrist,
    CommonEra,
}

/// A civil date and time of day, always interpreted in UTC.
///
/// Dates on or after 1582-10-15 follow the Gregorian calendar, earlier dates the Julian
/// calendar, matching the historical reform: 1582-10-04 is immediately followed by
/// 1582-10-15 and the ten dropped dates are rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CivilDate {
    pub era: Era,
    pub year: u32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub millisecond: u16,
}

impl CivilDate {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        era: Era,
        year: u32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        millisecond: u16,
    ) -> Result<Self, TimeError> {
        ensure!(year >= 1, InvalidDateSnafu { reason: "year 0 does not exist in civil reckoning" });
        ensure!((1..=12).contains(&month), InvalidDateSnafu { reason: "month must be 1..=12" });
        ensure!(hour < 24, InvalidDateSnafu { reason: "hour must be below 24" });
        ensure!(minute < 60, InvalidDateSnafu { reason: "minute must be below 60" });
        ensure!(second < 60, InvalidDateSnafu { reason: "second must be below 60" });
        ensure!(
            millisecond < 1000,
            InvalidDateSnafu { reason: "millisecond must be below 1000" }
        );

        let me = Self {
            era,
            year,
            month,
            day,
            hour,
            minute,
            second,
            millisecond,
        };

        ensure!(
            day >= 1 && day <= me.days_in_month(),
            InvalidDateSnafu { reason: "day is out of range for this month" }
        );
        // The ten dates dropped by the Gregorian reform never happened.
        ensure!(
            !(me.astronomical_year() == 1582 && month == 10 && (5..=14).contains(&day)),
            InvalidDateSnafu { reason: "date falls in the Gregorian reform gap (1582-10-05 to 1582-10-14)" }
        );

        Ok(me)
    }

    /// Astronomical year numbering: 1 BC is year 0, 2 BC is year -1.
    pub fn astronomical_year(&self) -> i64 {
        match self.era {
            Era::BeforeChrist => 1 - i64::from(self.year),
            Era::CommonEra => i64::from(self.year),
        }
    }

    /// Whether this date falls on or after the Gregorian reform of 1582-10-15.
    pub fn is_gregorian(&self) -> bool {
        let ymd = (self.astronomical_year(), self.month, self.day);
        ymd >= (1582, 10, 15)
    }

    fn is_leap_year(&self) -> bool {
        let y = self.astronomical_year();
        if (y, self.month, 1) >= (1582, 10, 15) || y > 1582 {
            y.rem_euclid(4) == 0 && (y.rem_euclid(100) != 0 || y.rem_euclid(400) == 0)
        } else {
            y.rem_euclid(4) == 0
        }
    }

    fn days_in_month(&self) -> u8 {
        match self.month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 => {
                if self.is_leap_year() {
                    29
                } else {
                    28
                }
            }
            _ => 0,
        }
    }

    fn day_fraction(&self) -> f64 {
        (f64::from(self.hour) * 3_600_000.0
            + f64::from(self.minute) * 60_000.0
            + f64::from(self.second) * 1_000.0
            + f64::from(self.millisecond))
            / (MS_PER_DAY as f64)
    }
}

impl fmt::Display for CivilDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let era = match self.era {
            Era::BeforeChrist => " BC",
            Era::CommonEra => "",
        };
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z{}",
            self.year, self.month, self.day, self.hour, self.minute, self.second, self.millisecond, era
        )
    }
}

/// A Julian date: a continuous day count from 4713 BC Jan 1, 12:00.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
pub struct JulianDate(f64);

impl JulianDate {
    pub const J2000: Self = Self(J2000_JD);

    pub const fn new(days: f64) -> Self {
        Self(days)
    }

    pub const fn days(&self) -> f64 {
        self.0
    }

    /// Seconds past the J2000 epoch.
    pub fn et_seconds(&self) -> f64 {
        (self.0 - J2000_JD) * SECONDS_PER_DAY
    }

    pub fn from_et_seconds(et_s: f64) -> Self {
        Self(J2000_JD + et_s / SECONDS_PER_DAY)
    }

    pub fn offset_days(&self, days: f64) -> Self {
        Self(self.0 + days)
    }

    /// Converts a civil date and time to a Julian date with the standard IAU algorithm.
    ///
    /// Dates before JD 0 (4713 BC Jan 1, 12:00) are rejected.
    pub fn from_civil(date: &CivilDate) -> Result<Self, TimeError> {
        let (y, m) = if date.month > 2 {
            (date.astronomical_year(), i64::from(date.month))
        } else {
            (date.astronomical_year() - 1, i64::from(date.month) + 12)
        };

        let b = if date.is_gregorian() {
            let a = (y as f64 / 100.0).floor();
            2.0 - a + (a / 4.0).floor()
        } else {
            0.0
        };

        let jd = (365.25 * (y as f64 + 4716.0)).floor()
            + (30.6001 * (m as f64 + 1.0)).floor()
            + f64::from(date.day)
            + b
            - 1524.5
            + date.day_fraction();

        ensure!(
            jd >= 0.0,
            InvalidDateSnafu { reason: "date predates JD 0 (4713 BC Jan 1, 12:00)" }
        );
        Ok(Self(jd))
    }

    /// Converts this Julian date back to a civil date.
    ///
    /// Only defined for dates in the Gregorian calendar, i.e. JD >= 2299160.5; the round
    /// trip through `from_civil` holds to below one millisecond.
    pub fn to_civil(&self) -> Result<CivilDate, TimeError> {
        ensure!(
            self.0 >= GREGORIAN_START_JD,
            PredatesGregorianSnafu { jd: self.0 }
        );

        let total = self.0 + 0.5;
        let mut z = total.floor();
        let mut ms_total = ((total - z) * MS_PER_DAY as f64).round() as i64;
        if ms_total >= MS_PER_DAY {
            // The time of day rounded up to exactly midnight of the next day.
            z += 1.0;
            ms_total = 0;
        }

        let alpha = ((z - 1_867_216.25) / 36_524.25).floor();
        let a = z + 1.0 + alpha - (alpha / 4.0).floor();
        let b = a + 1524.0;
        let c = ((b - 122.1) / 365.25).floor();
        let d = (365.25 * c).floor();
        let e = ((b - d) / 30.6001).floor();

        let day = (b - d - (30.6001 * e).floor()) as u8;
        let month = if e < 14.0 { e - 1.0 } else { e - 13.0 } as u8;
        let year = if month > 2 { c - 4716.0 } else { c - 4715.0 } as i64;

        let hour = (ms_total / 3_600_000) as u8;
        let minute = (ms_total % 3_600_000 / 60_000) as u8;
        let second = (ms_total % 60_000 / 1_000) as u8;
        let millisecond = (ms_total % 1_000) as u16;

        CivilDate::new(
            Era::CommonEra,
            year as u32,
            month,
            day,
            hour,
            minute,
            second,
            millisecond,
        )
    }
}

impl fmt::Display for JulianDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JD {}", self.0)
    }
}
