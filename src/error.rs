//! Typed error enum for this crate, in the style of
//! `eisenzopf-rvoip/crates/codec-core/src/error.rs` and
//! `bass-webrtc-ndi/src/sender.rs::NdiError`.

use thiserror::Error;

/// Errors this crate's public entry points can return. Per-packet
/// callbacks (`tx`/`rx`/`rx_lost`) keep the boolean/enum shapes §6
/// specifies and don't return this type; it's reserved for construction
/// and configuration failures.
#[derive(Error, Debug)]
pub enum AafError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("redundant offset {offset_usec}us is not a whole number of packets at {frames_per_packet} frames/packet")]
    RedundantOffsetNotWholePackets {
        offset_usec: u32,
        frames_per_packet: u32,
    },

    #[error("sparse mode packing factor {0} must be 1, 2, 4, a power of two below 8, or a multiple of 8")]
    InvalidSparsePackingFactor(u32),

    #[error("nominal sample rate or tx interval is zero, can't derive packet sizes")]
    DegenerateSizing,

    #[error("session not initialized: {0}")]
    NotInitialized(&'static str),
}

pub type Result<T> = std::result::Result<T, AafError>;
