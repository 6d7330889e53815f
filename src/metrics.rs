//! Metric helpers for `blinkframe`.
//!
//! Thin wrappers over the [`metrics`](https://docs.rs/metrics) facade.
//! Frame counters are labelled by direction and carry a byte total
//! alongside the frame count; error counters are labelled with the
//! categorical code from [`CodecError::error_type`](crate::error::CodecError::error_type),
//! so dashboards can split framing violations from payload faults.

use metrics::{counter, gauge};

/// Name of the gauge tracking registered pipelines.
pub const PIPELINES_ACTIVE: &str = "blinkframe_pipelines_active";
/// Name of the counter tracking emitted and encoded frames.
pub const FRAMES_PROCESSED: &str = "blinkframe_frames_processed_total";
/// Name of the counter tracking bytes carried by those frames.
pub const FRAME_BYTES: &str = "blinkframe_frame_bytes_total";
/// Name of the counter tracking terminal errors by category.
pub const ERRORS_TOTAL: &str = "blinkframe_errors_total";

/// Direction of frame processing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Frames reassembled from received bytes.
    Inbound,
    /// Frames flattened for transmission.
    Outbound,
}

impl Direction {
    /// Label value recorded for this direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }
}

/// Record a pipeline registration.
pub fn inc_pipelines() { gauge!(PIPELINES_ACTIVE).increment(1.0); }

/// Record a pipeline teardown.
pub fn dec_pipelines() { gauge!(PIPELINES_ACTIVE).decrement(1.0); }

/// Record one processed frame of `bytes` total length for `direction`.
pub fn inc_frames(direction: Direction, bytes: u64) {
    let direction = direction.as_str();
    counter!(FRAMES_PROCESSED, "direction" => direction).increment(1);
    counter!(FRAME_BYTES, "direction" => direction).increment(bytes);
}

/// Record a terminal error under its categorical code.
pub fn inc_errors(category: &'static str) {
    counter!(ERRORS_TOTAL, "category" => category).increment(1);
}
