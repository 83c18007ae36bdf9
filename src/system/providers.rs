/*
 * Helios Toolkit
 * Copyright (C) 2023-onward the Helios contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::path::PathBuf;
use std::sync::OnceLock;

use log::{debug, trace, warn};
use snafu::prelude::*;

use crate::astro::tables::{
    approximate_elements_of, APPROXIMATE_PLANETS, APPROXIMATE_WINDOW_END,
    APPROXIMATE_WINDOW_START,
};
use crate::constants::celestial_objects::{SOLAR_SYSTEM_BARYCENTER, SUN};
use crate::constants::orientations::B1950;
use crate::frames::{b1950_to_j2000, equatorial_to_ecliptic};
use crate::math::Vector3;
use crate::naif::daf::datatypes::{ModifiedDiffType1, Type2ChebyshevSet, Type3ChebyshevSet};
use crate::naif::daf::{DAFError, DafDataSet, DafDataType};
use crate::naif::spk::SPKSummaryRecord;
use crate::naif::SPK;
use crate::series::{SaturnMoon, SeriesError, TassTables, TritonEphemeris};
use crate::time::JulianDate;
use crate::NaifId;

use super::{EphemInterpolationSnafu, EphemerisError, SPKSnafu};

/// How many segment hops a center chain may take before it is considered circular.
const MAX_CHAIN_DEPTH: usize = 10;

/// What a provider reports its state relative to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StateOrigin {
    /// Heliocentric: ready to return.
    Sun,
    /// Relative to a primary body the dispatcher resolves separately.
    Body(&'static str),
}

/// A provider result: ecliptic J2000, meters and meters per second.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ProviderState {
    pub pos_m: Vector3,
    pub vel_m_s: Vector3,
    pub origin: StateOrigin,
}

/// How an SPK source anchors its chains.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SpkOrigin {
    /// Chain the target to the solar-system barycenter and subtract the Sun's chain.
    Sun,
    /// Chain the target down to its primary's barycenter; the dispatcher composes the
    /// primary's heliocentric state on top.
    Primary { body: &'static str, stop: NaifId },
}

/// A set of SPK kernels serving a fixed list of bodies over a validity window.
///
/// The files open on the first query and stay open; the two states of the source are
/// {Uninitialized, Open} and the transition is idempotent. A failed first open is
/// fatal for the source: the stored error is returned for every later query.
pub struct SpkSource {
    pub name: &'static str,
    paths: Vec<PathBuf>,
    bodies: Vec<(&'static str, NaifId)>,
    window: (JulianDate, JulianDate),
    origin: SpkOrigin,
    kernels: OnceLock<Result<Vec<SPK>, EphemerisError>>,
}

impl SpkSource {
    pub fn new(
        name: &'static str,
        paths: Vec<PathBuf>,
        bodies: Vec<(&'static str, NaifId)>,
        window: (JulianDate, JulianDate),
        origin: SpkOrigin,
    ) -> Self {
        Self {
            name,
            paths,
            bodies,
            window,
            origin,
            kernels: OnceLock::new(),
        }
    }

    fn kernels(&self) -> Result<&[SPK], EphemerisError> {
        let loaded = self.kernels.get_or_init(|| {
            let mut list = Vec::with_capacity(self.paths.len());
            for path in &self.paths {
                let path_str = path.to_string_lossy();
                debug!("{}: loading {path_str}", self.name);
                let spk = SPK::load(&path_str).map_err(|source| EphemerisError::SPK {
                    action: "loading kernel",
                    source,
                })?;
                list.push(spk);
            }
            Ok(list)
        });
        match loaded {
            Ok(list) => Ok(list.as_slice()),
            Err(e) => Err(e.clone()),
        }
    }

    /// Finds the first segment for the target across the kernel list, in list then
    /// catalog order.
    fn segment_for_target(
        &self,
        kernels: &[SPK],
        target: NaifId,
        et_s: f64,
    ) -> Option<(usize, SPKSummaryRecord)> {
        for (kno, spk) in kernels.iter().enumerate() {
            if let Some(summary) = spk.segment_for_target(target, et_s) {
                return Some((kno, summary.clone()));
            }
        }
        None
    }

    /// Sums segment states from `target` down the center chain until `stop`, in the
    /// equatorial J2000 frame, km and km/s.
    fn chain_to(
        &self,
        target: NaifId,
        stop: NaifId,
        et_s: f64,
    ) -> Result<(Vector3, Vector3), EphemerisError> {
        let kernels = self.kernels()?;
        let mut pos_km = Vector3::zeros();
        let mut vel_km_s = Vector3::zeros();
        let mut id = target;
        let mut hops = 0;

        while id != stop {
            ensure!(hops < MAX_CHAIN_DEPTH, super::MaxRecursionDepthSnafu);

            let (kno, summary) = self
                .segment_for_target(kernels, id, et_s)
                .ok_or(EphemerisError::SPK {
                    action: "searching the segment catalog",
                    source: DAFError::SegmentNotFound {
                        target: id,
                        observer: stop,
                        et_s,
                    },
                })?;
            trace!("{}: {} for target {id}", self.name, summary);

            let (seg_pos, seg_vel) = evaluate_segment(&kernels[kno], &summary, et_s)?;
            pos_km += seg_pos;
            vel_km_s += seg_vel;

            id = summary.center_id;
            hops += 1;
        }

        Ok((pos_km, vel_km_s))
    }

    /// State of the target relative to this source's origin, equatorial J2000, km and km/s.
    fn state_km(&self, target: NaifId, et_s: f64) -> Result<(Vector3, Vector3), EphemerisError> {
        match self.origin {
            SpkOrigin::Sun => {
                let (tgt_pos, tgt_vel) = self.chain_to(target, SOLAR_SYSTEM_BARYCENTER, et_s)?;
                let (sun_pos, sun_vel) = self.chain_to(SUN, SOLAR_SYSTEM_BARYCENTER, et_s)?;
                Ok((tgt_pos - sun_pos, tgt_vel - sun_vel))
            }
            SpkOrigin::Primary { stop, .. } => self.chain_to(target, stop, et_s),
        }
    }
}

/// Evaluates one segment at the requested time, rotating B1950 data into J2000.
/// Returns km and km/s in the equatorial J2000 frame.
fn evaluate_segment(
    spk: &SPK,
    summary: &SPKSummaryRecord,
    et_s: f64,
) -> Result<(Vector3, Vector3), EphemerisError> {
    let view = spk.segment_view(summary);
    let decoding = |source| EphemerisError::SPK {
        action: "decoding segment directory",
        source: DAFError::DecodingData { idx: 0, source },
    };

    let (pos_km, vel_km_s) = match summary.data_type().context(SPKSnafu {
        action: "resolving the segment data type",
    })? {
        DafDataType::Type1ModifiedDifferences => ModifiedDiffType1::from_segment(view)
            .map_err(decoding)?
            .evaluate(et_s)
            .context(EphemInterpolationSnafu)?,
        DafDataType::Type2ChebyshevTriplet => Type2ChebyshevSet::from_segment(view)
            .map_err(decoding)?
            .evaluate(et_s)
            .context(EphemInterpolationSnafu)?,
        DafDataType::Type3ChebyshevSextuplet => Type3ChebyshevSet::from_segment(view)
            .map_err(decoding)?
            .evaluate(et_s)
            .context(EphemInterpolationSnafu)?,
    };

    if summary.frame_id == B1950 {
        Ok((b1950_to_j2000(&pos_km), b1950_to_j2000(&vel_km_s)))
    } else {
        if summary.frame_id != crate::constants::orientations::J2000 {
            warn!(
                "segment `{}` uses frame {} which is treated as J2000",
                summary.name, summary.frame_id
            );
        }
        Ok((pos_km, vel_km_s))
    }
}

/// The TASS 1.6 provider for the major Saturnian moons; the harmonic table file loads
/// on the first query.
pub struct TassSource {
    path: PathBuf,
    window: (JulianDate, JulianDate),
    tables: OnceLock<Result<TassTables, EphemerisError>>,
}

impl TassSource {
    pub fn new(path: PathBuf, window: (JulianDate, JulianDate)) -> Self {
        Self {
            path,
            window,
            tables: OnceLock::new(),
        }
    }

    fn tables(&self) -> Result<&TassTables, EphemerisError> {
        let loaded = self.tables.get_or_init(|| {
            let path_str = self.path.to_string_lossy();
            debug!("TASS: loading {path_str}");
            TassTables::load(&path_str)
                .map_err(|source| EphemerisError::Series { source })
        });
        match loaded {
            Ok(tables) => Ok(tables),
            Err(e) => Err(e.clone()),
        }
    }
}

/// The Triton analytical provider: closed form, no data files.
pub struct TritonSource {
    window: (JulianDate, JulianDate),
    theory: TritonEphemeris,
}

impl TritonSource {
    pub fn new(window: (JulianDate, JulianDate)) -> Self {
        Self {
            window,
            theory: TritonEphemeris,
        }
    }
}

/// The Keplerian approximation over the embedded JPL mean elements.
#[derive(Default)]
pub struct ApproximateSource;

/// A provider is one alternative way of producing a state, with its own body list and
/// validity window; the dispatcher matches on the variant.
pub enum Provider {
    Spk(SpkSource),
    SaturnMoons(TassSource),
    Triton(TritonSource),
    Approximate(ApproximateSource),
}

impl Provider {
    pub fn serves(&self, name: &str) -> bool {
        match self {
            Self::Spk(source) => source.bodies.iter().any(|(n, _)| *n == name),
            // Hyperion is claimed so the dispatcher reports UnsupportedBody instead of
            // falling through to UnknownBody.
            Self::SaturnMoons(_) => SaturnMoon::from_name(name).is_some() || name == "Hyperion",
            Self::Triton(_) => name == "Triton",
            Self::Approximate(_) => approximate_elements_of(name).is_some(),
        }
    }

    pub fn body_names(&self) -> Vec<&'static str> {
        match self {
            Self::Spk(source) => source.bodies.iter().map(|(n, _)| *n).collect(),
            Self::SaturnMoons(_) => vec![
                "Mimas",
                "Enceladus",
                "Tethys",
                "Dione",
                "Rhea",
                "Titan",
                "Iapetus",
            ],
            Self::Triton(_) => vec!["Triton"],
            Self::Approximate(_) => APPROXIMATE_PLANETS.iter().map(|p| p.name).collect(),
        }
    }

    pub fn window(&self) -> (JulianDate, JulianDate) {
        match self {
            Self::Spk(source) => source.window,
            Self::SaturnMoons(source) => source.window,
            Self::Triton(source) => source.window,
            Self::Approximate(_) => (APPROXIMATE_WINDOW_START, APPROXIMATE_WINDOW_END),
        }
    }

    /// Evaluates the body at the date. The caller guarantees `serves` and the window;
    /// everything else is this provider's responsibility.
    pub fn state(&self, name: &str, jd: JulianDate) -> Result<ProviderState, EphemerisError> {
        match self {
            Self::Spk(source) => {
                let (_, id) = source
                    .bodies
                    .iter()
                    .find(|(n, _)| *n == name)
                    .ok_or(EphemerisError::UnknownBody {
                        name: name.to_string(),
                    })?;
                let (pos_km, vel_km_s) = source.state_km(*id, jd.et_seconds())?;
                // SPK kernels carry km and km/s in an equatorial frame.
                let origin = match source.origin {
                    SpkOrigin::Sun => StateOrigin::Sun,
                    SpkOrigin::Primary { body, .. } => StateOrigin::Body(body),
                };
                Ok(ProviderState {
                    pos_m: equatorial_to_ecliptic(&(pos_km * 1e3)),
                    vel_m_s: equatorial_to_ecliptic(&(vel_km_s * 1e3)),
                    origin,
                })
            }
            Self::SaturnMoons(source) => {
                let moon = SaturnMoon::from_name(name).ok_or_else(|| {
                    if name == "Hyperion" {
                        EphemerisError::UnsupportedBody {
                            name: name.to_string(),
                        }
                    } else {
                        EphemerisError::UnknownBody {
                            name: name.to_string(),
                        }
                    }
                })?;
                let (pos_m, vel_m_s) = source
                    .tables()?
                    .state_of(moon, jd)
                    .map_err(|source| match source {
                        SeriesError::UnsupportedMoon { .. } => EphemerisError::UnsupportedBody {
                            name: name.to_string(),
                        },
                        other => EphemerisError::Series { source: other },
                    })?;
                Ok(ProviderState {
                    pos_m,
                    vel_m_s,
                    origin: StateOrigin::Body("Saturn"),
                })
            }
            Self::Triton(source) => {
                let (pos_m, vel_m_s) = source.theory.state_at(jd);
                Ok(ProviderState {
                    pos_m,
                    vel_m_s,
                    origin: StateOrigin::Body("Neptune"),
                })
            }
            Self::Approximate(_) => {
                let planet =
                    approximate_elements_of(name).ok_or(EphemerisError::UnknownBody {
                        name: name.to_string(),
                    })?;
                let (pos_m, vel_m_s) = planet.state_at(jd);
                Ok(ProviderState {
                    pos_m,
                    vel_m_s,
                    origin: StateOrigin::Sun,
                })
            }
        }
    }
}
