//! Wire schema for recorded perception messages.
//!
//! Hand-written prost messages, no build-time codegen. The replay core
//! treats encoded payloads as opaque byte strings; only the trace readers
//! touch this module, to classify payloads and extract the nested object
//! count, and tests use it to build fixtures.

use prost::Message;

use crate::source::MessageKind;

/// One perceived object within a frame
#[derive(Clone, PartialEq, Message)]
pub struct DetectedObject {
    #[prost(uint64, tag = "1")]
    pub id: u64,
    #[prost(double, tag = "2")]
    pub x: f64,
    #[prost(double, tag = "3")]
    pub y: f64,
    #[prost(double, tag = "4")]
    pub heading: f64,
}

/// Raw sensor frame as seen by the simulated sensor
#[derive(Clone, PartialEq, Message)]
pub struct SensorView {
    #[prost(uint64, tag = "1")]
    pub frame_id: u64,
    #[prost(uint64, tag = "2")]
    pub timestamp_ns: u64,
    #[prost(message, repeated, tag = "3")]
    pub objects: Vec<DetectedObject>,
}

/// Post-processing output derived from a sensor frame
#[derive(Clone, PartialEq, Message)]
pub struct SensorData {
    #[prost(uint64, tag = "1")]
    pub frame_id: u64,
    #[prost(uint64, tag = "2")]
    pub timestamp_ns: u64,
    #[prost(message, repeated, tag = "3")]
    pub objects: Vec<DetectedObject>,
}

/// Simulation-side truth; recorded in some traces but never played back
#[derive(Clone, PartialEq, Message)]
pub struct GroundTruth {
    #[prost(uint64, tag = "1")]
    pub frame_id: u64,
    #[prost(uint64, tag = "2")]
    pub timestamp_ns: u64,
    #[prost(message, repeated, tag = "3")]
    pub objects: Vec<DetectedObject>,
}

/// Extract the nested object count from an encoded payload.
///
/// Only `SensorView` and `SensorData` carry a count the host cares about;
/// other kinds yield `None` without touching the payload.
pub fn encoded_object_count(
    kind: MessageKind,
    payload: &[u8],
) -> Result<Option<usize>, prost::DecodeError> {
    match kind {
        MessageKind::SensorView => Ok(Some(SensorView::decode(payload)?.objects.len())),
        MessageKind::SensorData => Ok(Some(SensorData::decode(payload)?.objects.len())),
        MessageKind::GroundTruth | MessageKind::Unknown => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_count_round_trips_through_encoding() {
        let view = SensorView {
            frame_id: 7,
            timestamp_ns: 1_000,
            objects: vec![DetectedObject::default(); 3],
        };
        let payload = view.encode_to_vec();
        let count = encoded_object_count(MessageKind::SensorView, &payload).unwrap();
        assert_eq!(count, Some(3));
    }

    #[test]
    fn ground_truth_payload_is_not_decoded() {
        // Arbitrary bytes: kinds without a count never hit the decoder
        let count = encoded_object_count(MessageKind::GroundTruth, &[0xff, 0x01]).unwrap();
        assert_eq!(count, None);
    }
}
