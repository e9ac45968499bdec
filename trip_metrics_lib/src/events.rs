use geo_types::Point;
use serde::{Deserialize, Serialize};

/// Upper bound on one encoded event, covariance included. A corrupt length
/// prefix must never turn into an unbounded allocation.
pub const MAX_FRAME_LEN: u32 = 1024;

/// One record from any of the three streams feeding the tracker.
///
/// Events carry no timestamps on purpose: goal and localization times are
/// taken from the node's clock when the event is dispatched, same as the
/// wall-clock capture the summary math is defined against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrackerEvent {
    /// Continuous odometry pose sample, meters.
    Pose { position: Point },
    /// Commanded navigation target, meters.
    Goal { position: Point },
    /// Localized pose estimate. The estimator sends its covariance along
    /// (row-major, empty when unavailable); the tracker ignores it.
    Localization { position: Point, covariance: Vec<f64> },
}

impl TrackerEvent {
    pub fn to_bytes(&self) -> Vec<u8> {
        bincode::serialize(self).unwrap()
    }
}

impl TryFrom<&[u8]> for TrackerEvent {
    type Error = &'static str;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        bincode::deserialize_from(value).map_err(|_| "Failed to deserialize TrackerEvent")
    }
}

/// Builds one frame for the stream endpoint: big-endian u32 byte count,
/// then the bincode body.
pub fn encode_frame(event: &TrackerEvent) -> Vec<u8> {
    let body = event.to_bytes();
    let mut frame = Vec::with_capacity(4 + body.len());
    frame.extend_from_slice(&(body.len() as u32).to_be_bytes());
    frame.extend_from_slice(&body);
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_decodes_back_to_the_event() {
        let event = TrackerEvent::Goal {
            position: Point::new(2.0, -1.5),
        };

        let frame = encode_frame(&event);
        let len = u32::from_be_bytes(frame[..4].try_into().unwrap()) as usize;
        assert_eq!(len, frame.len() - 4);

        let decoded = TrackerEvent::try_from(&frame[4..]).unwrap();
        assert_eq!(decoded, event);
    }

    #[test]
    fn garbage_does_not_decode() {
        let bytes = [0xffu8; 16];
        assert!(TrackerEvent::try_from(&bytes[..]).is_err());
    }

    #[test]
    fn full_covariance_fits_in_a_frame() {
        // 6x6 pose covariance, the largest payload a publisher sends.
        let event = TrackerEvent::Localization {
            position: Point::new(0.0, 0.0),
            covariance: vec![0.0; 36],
        };
        assert!(encode_frame(&event).len() <= MAX_FRAME_LEN as usize);
    }
}
