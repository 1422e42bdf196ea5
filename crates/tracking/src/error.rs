use kinematics::KinematicsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackingError {
    #[error("invalid configuration: {0}")]
    Configuration(String),
    #[error(
        "observation window of {window} waypoints from index {index} exceeds the {available} available waypoints"
    )]
    WindowOutOfBounds {
        index: usize,
        window: usize,
        available: usize,
    },
    #[error("waypoint {index} requested from a reference line of {available} waypoints")]
    WaypointOutOfBounds { index: usize, available: usize },
    #[error("numerically degenerate input: {0}")]
    NumericDegeneracy(String),
    #[error("no active episode, call reset first")]
    EpisodeNotActive,
    #[error(transparent)]
    Kinematics(#[from] KinematicsError),
    #[error("trace serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("trace i/o failed: {0}")]
    Io(#[from] std::io::Error),
}
