use geo_types::Point;
use serde::{Deserialize, Serialize};

/// The derived report for one goal-to-localization cycle. Values are a pure
/// snapshot of tracker state at the localization event that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripSummary {
    /// First pose ever observed. None when a goal and a localization both
    /// arrived before any odometry did.
    pub start_position: Option<Point>,
    pub goal_position: Point,
    pub final_position: Point,
    /// Path length integrated from odometry since process start, meters.
    pub total_distance: f64,
    /// Wall-clock time between the goal command and this localization,
    /// seconds. Negative when the publisher clocks disagree.
    pub elapsed_seconds: f64,
    /// total_distance / elapsed_seconds, m/s. Zero when no time has passed.
    pub average_speed: f64,
    /// Straight-line distance between goal and final position, centimeters.
    pub error_cm: f64,
}
