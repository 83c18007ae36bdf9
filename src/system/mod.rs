/*
 * Helios Toolkit
 * Copyright (C) 2023-onward the Helios contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! The body dispatcher: maps a body name to an ordered chain of providers and, per
//! date, selects the first provider whose validity window contains the date.

use snafu::prelude::*;

use crate::constants::SIDEREAL_MONTH_DAYS;
use crate::math::interpolation::InterpolationError;
use crate::math::Vector3;
use crate::naif::daf::DAFError;
use crate::series::SeriesError;
use crate::time::{CivilDate, JulianDate, TimeError};

pub mod catalog;
pub mod providers;

pub use catalog::standard_catalog;
pub use providers::{Provider, ProviderState, SpkOrigin, SpkSource, StateOrigin};

/// How deep the dispatcher will recurse while composing a moon with its primary.
const MAX_COMPOSITION_DEPTH: usize = 4;

#[derive(Clone, Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum EphemerisError {
    #[snafu(display("body `{name}` is not served by any provider"))]
    UnknownBody { name: String },
    #[snafu(display("no provider serving `{name}` covers {jd}"))]
    DateOutOfRange { name: String, jd: JulianDate },
    #[snafu(display("body `{name}` is not supported by its provider"))]
    UnsupportedBody { name: String },
    #[snafu(display("invalid date: {source}"))]
    Time { source: TimeError },
    #[snafu(display("when {action} caused {source}"))]
    SPK {
        action: &'static str,
        source: DAFError,
    },
    #[snafu(display("during an ephemeris interpolation {source}"))]
    EphemInterpolation { source: InterpolationError },
    #[snafu(display("analytical series: {source}"))]
    Series { source: SeriesError },
    /// While chasing the chain of segment centers, we recursed more times than allowed.
    MaxRecursionDepth,
    /// Somehow you've entered code that should not be reachable, please file a bug.
    Unreachable,
}

/// All loaded providers, queried in order. Provider configuration is immutable; kernel
/// files and series tables open lazily on the first query and stay open for the
/// lifetime of the value.
pub struct SolarSystem {
    providers: Vec<Provider>,
}

impl SolarSystem {
    pub fn new(providers: Vec<Provider>) -> Self {
        Self { providers }
    }

    /// Builds the conventional provider chain over JPL kernels and the TASS table
    /// found in `data_dir`. No file is touched until the first query.
    pub fn with_standard_catalog(data_dir: &str) -> Result<Self, EphemerisError> {
        Ok(Self::new(standard_catalog(data_dir)))
    }

    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    /// Every body name at least one provider serves, plus the Sun itself.
    pub fn bodies(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = vec!["Sun"];
        for provider in &self.providers {
            for name in provider.body_names() {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Earliest date any provider covers.
    pub fn first_valid_date(&self) -> JulianDate {
        self.providers
            .iter()
            .map(|p| p.window().0)
            .fold(JulianDate::new(f64::INFINITY), |acc, w| {
                if w < acc {
                    w
                } else {
                    acc
                }
            })
    }

    /// Latest date any provider covers.
    pub fn last_valid_date(&self) -> JulianDate {
        self.providers
            .iter()
            .map(|p| p.window().1)
            .fold(JulianDate::new(f64::NEG_INFINITY), |acc, w| {
                if w > acc {
                    w
                } else {
                    acc
                }
            })
    }

    /// Heliocentric position in meters, ecliptic J2000.
    pub fn body_position(&self, name: &str, jd: JulianDate) -> Result<Vector3, EphemerisError> {
        Ok(self.state(name, jd, 0)?.0)
    }

    /// Heliocentric velocity in meters per second, ecliptic J2000.
    pub fn body_velocity(&self, name: &str, jd: JulianDate) -> Result<Vector3, EphemerisError> {
        Ok(self.state(name, jd, 0)?.1)
    }

    /// Heliocentric position and velocity, ecliptic J2000, meters and meters per second.
    pub fn body_position_velocity(
        &self,
        name: &str,
        jd: JulianDate,
    ) -> Result<(Vector3, Vector3), EphemerisError> {
        self.state(name, jd, 0)
    }

    /// Like [Self::body_position], from a civil date and time.
    pub fn body_position_at(
        &self,
        name: &str,
        date: &CivilDate,
    ) -> Result<Vector3, EphemerisError> {
        let jd = JulianDate::from_civil(date).context(TimeSnafu)?;
        self.body_position(name, jd)
    }

    /// Like [Self::body_position_velocity], from a civil date and time.
    pub fn body_position_velocity_at(
        &self,
        name: &str,
        date: &CivilDate,
    ) -> Result<(Vector3, Vector3), EphemerisError> {
        let jd = JulianDate::from_civil(date).context(TimeSnafu)?;
        self.body_position_velocity(name, jd)
    }

    fn state(
        &self,
        name: &str,
        jd: JulianDate,
        depth: usize,
    ) -> Result<(Vector3, Vector3), EphemerisError> {
        ensure!(depth < MAX_COMPOSITION_DEPTH, MaxRecursionDepthSnafu);

        // The Sun is the canonical reference of the product frame.
        if name == "Sun" {
            ensure!(
                jd > self.first_valid_date() && jd < self.last_valid_date(),
                DateOutOfRangeSnafu { name, jd }
            );
            return Ok((Vector3::zeros(), Vector3::zeros()));
        }

        let mut known = false;
        for provider in &self.providers {
            if !provider.serves(name) {
                continue;
            }
            known = true;
            let (start, end) = provider.window();
            if !(jd > start && jd < end) {
                continue;
            }

            let state = provider.state(name, jd)?;
            return match state.origin {
                StateOrigin::Sun => Ok((state.pos_m, state.vel_m_s)),
                StateOrigin::Body(primary) => {
                    let (primary_pos, primary_vel) = self.state(primary, jd, depth + 1)?;
                    Ok((state.pos_m + primary_pos, state.vel_m_s + primary_vel))
                }
            };
        }

        if name == "Moon" {
            if let Some(state) = self.moon_by_epoch_shift(jd, depth)? {
                return Ok(state);
            }
        }

        if known {
            Err(EphemerisError::DateOutOfRange {
                name: name.to_string(),
                jd,
            })
        } else {
            Err(EphemerisError::UnknownBody {
                name: name.to_string(),
            })
        }
    }

    /// Approximates the Moon outside the accurate window: take the accurate Earth-Moon
    /// vector at a date shifted by a whole number of sidereal months into the window
    /// and add it to the approximate Earth. The relative geometry repeats with the
    /// orbit, so the copied vector keeps a realistic phase.
    fn moon_by_epoch_shift(
        &self,
        jd: JulianDate,
        depth: usize,
    ) -> Result<Option<(Vector3, Vector3)>, EphemerisError> {
        let Some(accurate) = self
            .providers
            .iter()
            .find(|p| matches!(p, Provider::Spk(_)) && p.serves("Moon") && p.serves("Earth"))
        else {
            return Ok(None);
        };

        let (start, end) = accurate.window();
        // Only useful when the date is outside the accurate window but some provider
        // still serves the Earth there.
        let target = if jd <= start {
            start.days() + 1.0
        } else {
            end.days() - 1.0
        };
        let mut months = ((target - jd.days()) / SIDEREAL_MONTH_DAYS).round();
        let mut shifted = jd.days() + months * SIDEREAL_MONTH_DAYS;
        if shifted <= start.days() {
            months += 1.0;
        } else if shifted >= end.days() {
            months -= 1.0;
        }
        shifted = jd.days() + months * SIDEREAL_MONTH_DAYS;
        let shifted = JulianDate::new(shifted);
        if !(shifted > start && shifted < end) {
            return Ok(None);
        }

        let earth_now = match self.state("Earth", jd, depth + 1) {
            Ok(state) => state,
            Err(EphemerisError::DateOutOfRange { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };

        let moon_then = accurate.state("Moon", shifted)?;
        let earth_then = accurate.state("Earth", shifted)?;

        Ok(Some((
            earth_now.0 + (moon_then.pos_m - earth_then.pos_m),
            earth_now.1 + (moon_then.vel_m_s - earth_then.vel_m_s),
        )))
    }
}
