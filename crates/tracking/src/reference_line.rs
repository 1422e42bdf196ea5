//! # Reference Line Management
//!
//! A reference line is the ordered list of waypoints the tracked body should
//! visit, one per step. The manager keeps the line exactly as supplied and a
//! padded working copy from which ego-frame observation windows are cut.

use crate::error::TrackingError;
use kinematics::{geometry, BicycleState, BodyState, BoxSpace};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default number of segments used by [`ReferenceLineManager::estimate_initial_state`].
pub const ESTIMATION_WINDOW: usize = 5;

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
}

impl Waypoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLine {
    pub waypoints: Vec<Waypoint>,
}

impl ReferenceLine {
    #[must_use]
    pub fn from_points(points: &[[f64; 2]]) -> Self {
        points.iter().map(|p| Waypoint::new(p[0], p[1])).collect()
    }

    #[must_use]
    pub fn to_points(&self) -> Vec<[f64; 2]> {
        self.waypoints.iter().map(|w| [w.x, w.y]).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn push(&mut self, waypoint: Waypoint) {
        self.waypoints.push(waypoint);
    }
}

impl FromIterator<Waypoint> for ReferenceLine {
    fn from_iter<I: IntoIterator<Item = Waypoint>>(iter: I) -> Self {
        Self {
            waypoints: iter.into_iter().collect(),
        }
    }
}

/// How the working copy is extended past the tracked part of the line.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PadMode {
    /// Use the line as supplied.
    #[default]
    None,
    /// Truncate to the tracking length and repeat the final waypoint once per
    /// observation step.
    Repeat,
}

impl FromStr for PadMode {
    type Err = TrackingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "repeat" => Ok(Self::Repeat),
            other => Err(TrackingError::Configuration(format!(
                "unknown reference line pad mode `{other}`"
            ))),
        }
    }
}

impl fmt::Display for PadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Repeat => write!(f, "repeat"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ReferenceLineManager {
    n_observation_steps: usize,
    pad_mode: PadMode,
    raw: ReferenceLine,
    padded: ReferenceLine,
    tracking_length: usize,
}

impl ReferenceLineManager {
    #[must_use]
    pub fn new(n_observation_steps: usize, pad_mode: PadMode) -> Self {
        Self {
            n_observation_steps,
            pad_mode,
            raw: ReferenceLine::default(),
            padded: ReferenceLine::default(),
            tracking_length: 0,
        }
    }

    /// Install a new line. A `tracking_length` of zero tracks the whole line.
    ///
    /// # Errors
    ///
    /// Fails for an empty line or a tracking length longer than the line.
    pub fn set(&mut self, line: &ReferenceLine, tracking_length: usize) -> Result<(), TrackingError> {
        if line.is_empty() {
            return Err(TrackingError::Configuration(
                "reference line needs at least one waypoint".into(),
            ));
        }
        let tracking_length = if tracking_length == 0 {
            line.len()
        } else {
            tracking_length
        };
        if tracking_length > line.len() {
            return Err(TrackingError::Configuration(format!(
                "tracking length {tracking_length} exceeds the {} waypoints of the reference line",
                line.len()
            )));
        }

        let mut padded = line.clone();
        match self.pad_mode {
            PadMode::None => {}
            PadMode::Repeat => {
                padded.waypoints.truncate(tracking_length);
                let last = padded.waypoints[tracking_length - 1];
                padded
                    .waypoints
                    .extend(std::iter::repeat(last).take(self.n_observation_steps));
            }
        }

        self.raw = line.clone();
        self.padded = padded;
        self.tracking_length = tracking_length;
        Ok(())
    }

    /// The line exactly as supplied.
    #[must_use]
    pub fn raw(&self) -> &ReferenceLine {
        &self.raw
    }

    /// The padded working copy.
    #[must_use]
    pub fn padded(&self) -> &ReferenceLine {
        &self.padded
    }

    #[must_use]
    pub fn tracking_length(&self) -> usize {
        self.tracking_length
    }

    #[must_use]
    pub fn n_observation_steps(&self) -> usize {
        self.n_observation_steps
    }

    #[must_use]
    pub fn pad_mode(&self) -> PadMode {
        self.pad_mode
    }

    /// Waypoint `index` of the working copy.
    ///
    /// # Errors
    ///
    /// Fails past the end of the working copy.
    pub fn waypoint(&self, index: usize) -> Result<[f64; 2], TrackingError> {
        self.padded
            .waypoints
            .get(index)
            .map(|w| [w.x, w.y])
            .ok_or(TrackingError::WaypointOutOfBounds {
                index,
                available: self.padded.len(),
            })
    }

    /// Size of the vector returned by [`Self::window`].
    #[must_use]
    pub fn observation_size(&self) -> usize {
        2 * self.n_observation_steps + 1
    }

    #[must_use]
    pub fn observation_space(&self) -> BoxSpace {
        BoxSpace::unbounded(self.observation_size())
    }

    /// Ego-frame look-ahead window starting at `step_index`: the next
    /// `n_observation_steps` waypoints in the frame of `body`, flattened as
    /// `(x, y)` pairs, followed by the number of steps remaining.
    ///
    /// # Errors
    ///
    /// Fails when the window runs past the working copy; no clamping.
    pub fn window(&self, step_index: usize, body: &BodyState) -> Result<Vec<f64>, TrackingError> {
        let n = self.n_observation_steps;
        if step_index + n > self.padded.len() {
            return Err(TrackingError::WindowOutOfBounds {
                index: step_index,
                window: n,
                available: self.padded.len(),
            });
        }

        let points: Vec<[f64; 2]> = self.padded.waypoints[step_index..step_index + n]
            .iter()
            .map(|w| [w.x, w.y])
            .collect();
        let mut observation: Vec<f64> = geometry::world_to_body(&points, body)
            .into_iter()
            .flatten()
            .collect();
        observation.push(self.tracking_length as f64 - step_index as f64);
        Ok(observation)
    }

    /// Estimate `(x, y, r, v)` at the start of a line sampled every `delta_t`
    /// seconds.
    ///
    /// Segment displacements over the first `window` waypoints are averaged
    /// with weights `e^-i`; the heading is the direction of the mean
    /// displacement and the speed its mean length divided by `delta_t`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::NumericDegeneracy`] when fewer than one
    /// segment is available or `delta_t` is not positive.
    pub fn estimate_initial_state(
        line: &ReferenceLine,
        delta_t: f64,
        window: usize,
    ) -> Result<BicycleState, TrackingError> {
        let real_window = window.min(line.len());
        if real_window < 2 {
            return Err(TrackingError::NumericDegeneracy(format!(
                "estimating an initial state needs at least one segment, got {} waypoint(s) and window {window}",
                line.len()
            )));
        }
        if !(delta_t.is_finite() && delta_t > 0.0) {
            return Err(TrackingError::NumericDegeneracy(format!(
                "step interval must be positive, got {delta_t}"
            )));
        }

        let discount = (-1.0_f64).exp();
        let mut weight = 1.0;
        let (mut total_weight, mut total_length, mut total_dx, mut total_dy) = (0.0, 0.0, 0.0, 0.0);
        for pair in line.waypoints[..real_window].windows(2) {
            let dx = pair[1].x - pair[0].x;
            let dy = pair[1].y - pair[0].y;
            total_length += dx.hypot(dy) * weight;
            total_dx += dx * weight;
            total_dy += dy * weight;
            total_weight += weight;
            weight *= discount;
        }

        let start = line.waypoints[0];
        Ok(BicycleState {
            x: start.x,
            y: start.y,
            r: kinematics::normalize_angle((total_dy / total_weight).atan2(total_dx / total_weight)),
            v: total_length / total_weight / delta_t,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight(n: usize) -> ReferenceLine {
        (0..n).map(|i| Waypoint::new(i as f64, 0.0)).collect()
    }

    #[test]
    fn test_pad_mode_parsing() {
        assert_eq!("repeat".parse::<PadMode>().unwrap(), PadMode::Repeat);
        assert_eq!("none".parse::<PadMode>().unwrap(), PadMode::None);
        assert!(matches!(
            "mirror".parse::<PadMode>(),
            Err(TrackingError::Configuration(_))
        ));
    }

    #[test]
    fn test_zero_tracking_length_tracks_whole_line() {
        let mut manager = ReferenceLineManager::new(3, PadMode::None);
        manager.set(&straight(8), 0).unwrap();
        assert_eq!(manager.tracking_length(), 8);
        assert_eq!(manager.padded().len(), 8);
    }

    #[test]
    fn test_empty_line_is_rejected() {
        let mut manager = ReferenceLineManager::new(3, PadMode::Repeat);
        assert!(manager.set(&ReferenceLine::default(), 0).is_err());
        assert!(manager.set(&straight(4), 5).is_err());
    }

    #[test]
    fn test_remaining_steps_feature() {
        let mut manager = ReferenceLineManager::new(2, PadMode::Repeat);
        manager.set(&straight(10), 0).unwrap();
        let body = BodyState::new(0.0, 0.0, 0.0);
        let window = manager.window(3, &body).unwrap();
        assert_eq!(window, vec![3.0, 0.0, 4.0, 0.0, 7.0]);
    }
}
