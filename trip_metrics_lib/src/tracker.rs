use chrono::{DateTime, Utc};
use geo_types::Point;
use tracing::{debug, info, trace};

use crate::events::TrackerEvent;
use crate::summary::TripSummary;

/// Positioning error is reported in centimeters, everything else in meters.
const M_TO_CM: f64 = 100.0;

/// Where the tracker is in the current goal cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripPhase {
    /// No goal has ever been commanded.
    Idle,
    /// A goal is set and no localization has reported against it yet.
    Armed,
    /// At least one summary went out for the current goal. Further
    /// localizations keep reporting; only a new goal re-arms the cycle.
    Reporting,
}

/// Everything the tracker accumulates over its lifetime. Created empty at
/// process start, never persisted.
#[derive(Debug, Clone, Default)]
pub struct TripState {
    /// First pose ever observed, latched once.
    pub start_position: Option<Point>,
    /// Last pose observed, the reference for the next segment length.
    pub previous_position: Option<Point>,
    /// Running sum of Euclidean segment lengths, meters. Grows for the
    /// whole process lifetime; a new goal does not reset it.
    pub cumulative_distance: f64,
    /// Most recent commanded goal. Overwritten, never cleared.
    pub goal_position: Option<Point>,
    /// Wall-clock time the most recent goal came in. Overwritten, never
    /// cleared.
    pub goal_issued_at: Option<DateTime<Utc>>,
    /// Most recent localized pose, goal or no goal.
    pub final_position: Option<Point>,
    /// Summaries emitted since the most recent goal. Drives the phase view.
    pub summaries_since_goal: u64,
}

/// Correlates three event streams into per-goal trip statistics: odometry
/// poses accumulate traveled distance, a goal command starts the trip timer,
/// and every localized pose observed while a goal is set yields a
/// [`TripSummary`].
///
/// Distance, goal and timer carry over from one goal to the next: the
/// summary for a second goal includes distance traveled before that goal
/// was commanded, and repeated localizations after a single goal keep
/// reporting with an ever-growing elapsed time. Callers that want per-goal
/// isolation must construct a fresh tracker per goal.
///
/// Coordinates are taken as-is; a NaN or infinite sample poisons
/// `cumulative_distance` for the rest of the process lifetime.
pub struct TripTracker {
    state: TripState,
}

impl TripTracker {
    pub fn new() -> Self {
        Self {
            state: TripState::default(),
        }
    }

    pub fn state(&self) -> &TripState {
        &self.state
    }

    pub fn phase(&self) -> TripPhase {
        if self.state.goal_position.is_none() {
            TripPhase::Idle
        } else if self.state.summaries_since_goal == 0 {
            TripPhase::Armed
        } else {
            TripPhase::Reporting
        }
    }

    /// Routes one stream event to its handler. `timestamp` is when the
    /// event was dispatched, read from the node's clock.
    pub fn handle(&mut self, event: TrackerEvent, timestamp: DateTime<Utc>) -> Option<TripSummary> {
        match event {
            TrackerEvent::Pose { position } => {
                self.on_pose(position, timestamp);
                None
            }
            TrackerEvent::Goal { position } => {
                self.on_goal(position, timestamp);
                None
            }
            TrackerEvent::Localization { position, .. } => self.on_localize(position, timestamp),
        }
    }

    /// Odometry sample. The first sample latches the start position and
    /// contributes no distance; each later sample adds the straight-line
    /// length from the previous one.
    pub fn on_pose(&mut self, position: Point, timestamp: DateTime<Utc>) {
        trace!(
            "pose sample: x={:.2}, y={:.2} at {}",
            position.x(),
            position.y(),
            timestamp
        );

        if self.state.start_position.is_none() {
            self.state.start_position = Some(position);
            info!(
                "start position latched: x={:.2}, y={:.2}",
                position.x(),
                position.y()
            );
        }

        let Some(previous) = self.state.previous_position else {
            self.state.previous_position = Some(position);
            return;
        };

        let delta = position - previous;
        self.state.cumulative_distance += delta.x().hypot(delta.y());
        self.state.previous_position = Some(position);
    }

    /// Goal command. Overwrites any earlier goal and restarts the trip
    /// timer, so the next localization reports against this goal.
    pub fn on_goal(&mut self, position: Point, issued_at: DateTime<Utc>) {
        info!(
            "navigation goal received: x={:.2}, y={:.2}",
            position.x(),
            position.y()
        );
        self.state.goal_position = Some(position);
        self.state.goal_issued_at = Some(issued_at);
        self.state.summaries_since_goal = 0;
    }

    /// Localized pose. Always records the position; produces a summary only
    /// once a goal has been commanded at least once.
    pub fn on_localize(
        &mut self,
        position: Point,
        observed_at: DateTime<Utc>,
    ) -> Option<TripSummary> {
        self.state.final_position = Some(position);

        let (Some(goal), Some(issued_at)) = (self.state.goal_position, self.state.goal_issued_at)
        else {
            debug!("localization before any goal, nothing to report");
            return None;
        };

        let error_x = (goal.x() - position.x()).abs() * M_TO_CM;
        let error_y = (goal.y() - position.y()).abs() * M_TO_CM;
        let error_cm = error_x.hypot(error_y);

        // num_microseconds overflows only past ~292k years.
        let elapsed = observed_at - issued_at;
        let elapsed_seconds = match elapsed.num_microseconds() {
            Some(us) => us as f64 / 1_000_000.0,
            None => elapsed.num_milliseconds() as f64 / 1000.0,
        };
        let average_speed = if elapsed_seconds > 0.0 {
            self.state.cumulative_distance / elapsed_seconds
        } else {
            0.0
        };

        self.state.summaries_since_goal += 1;

        Some(TripSummary {
            start_position: self.state.start_position,
            goal_position: goal,
            final_position: position,
            total_distance: self.state.cumulative_distance,
            elapsed_seconds,
            average_speed,
            error_cm,
        })
    }
}

impl Default for TripTracker {
    fn default() -> Self {
        Self::new()
    }
}
