//! Derives per-packet and per-queue sizes from a session's public
//! configuration (§4.C), mirroring `x_calculateSizes()`.

use crate::format::SampleFormat;

/// Inputs the size calculator needs; a subset of [`crate::config::SessionConfig`].
#[derive(Debug, Clone, Copy)]
pub struct SizingInputs {
    pub rate_hz: u32,
    /// Talker packet rate in Hz, not a microsecond period.
    pub tx_interval_hz: u32,
    pub channels: u16,
    pub format: SampleFormat,
    pub packing_factor: u32,
    pub redundant: bool,
    pub redundant_offset_usec: u32,
}

/// Sizes derived once at `gen_init` time and held for the life of the
/// session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedSizes {
    /// Audio frames (one sample per channel) carried by one packet.
    pub frames_per_packet: u32,
    /// Wire payload size a talker writes per packet, before redundancy
    /// doubling.
    pub payload_size: usize,
    /// Worst-case payload size a listener must be prepared to read,
    /// doubled when redundancy is enabled (a redundant AAF payload may
    /// legally be shorter, but never longer, than this bound).
    pub payload_size_max_listener: usize,
    /// Worst-case payload size a talker allocates, doubled when redundant.
    pub payload_size_max_talker: usize,
    /// One media-queue item's frame payload size, at this session's own
    /// configured sample format (un-doubled).
    pub item_size: usize,
    /// Redundancy queue's per-frame size — one un-doubled payload's worth.
    pub redundant_queue_frame_size: usize,
    /// Redundancy delay expressed in whole packets.
    pub redundant_offset_packets: u32,
}

/// Mirrors `x_calculateSizes`: derive every packet/queue size from the
/// public configuration. Returns `None` if `rate_hz`/`tx_interval_hz` are
/// zero (nothing to divide by) — callers treat this as a fatal
/// configuration error at `gen_init` time.
pub fn calculate(inputs: SizingInputs) -> Option<DerivedSizes> {
    if inputs.rate_hz == 0 || inputs.tx_interval_hz == 0 {
        return None;
    }

    // txInterval is a packet rate in Hz (4000 = AVB Class B, 8000 = Class
    // A), not a microsecond period: framesPerPacket = rate / txInterval.
    let exact = inputs.rate_hz % inputs.tx_interval_hz == 0;
    let mut frames_per_packet = inputs.rate_hz / inputs.tx_interval_hz;
    if frames_per_packet == 0 {
        return None;
    }
    if !exact {
        // The original logs a warning here (txInterval doesn't evenly
        // divide the sample rate) and rounds up so no sample is dropped.
        frames_per_packet += 1;
    }
    frames_per_packet = frames_per_packet.saturating_mul(inputs.packing_factor.max(1));

    let bytes_per_sample = inputs.format.bytes_per_sample().unwrap_or(0) as usize;
    let channels = inputs.channels as usize;
    let payload_size = frames_per_packet as usize * channels * bytes_per_sample;

    let item_size = payload_size;
    let redundant_queue_frame_size = payload_size;

    // A listener's receive bound must tolerate a talker on a wider
    // integer format than its own; the original sizes that bound off the
    // 4-byte (Int32) width regardless of the locally configured format,
    // separately from `item_size` (which is sized at this session's own
    // format width, for its own media-queue items).
    let recv_bound = frames_per_packet as usize * channels * 4;

    let redundant_offset_samples = if inputs.redundant {
        ((inputs.redundant_offset_usec as u64 * inputs.rate_hz as u64) / 1_000_000) as u32
    } else {
        0
    };
    let redundant_offset_packets = if frames_per_packet == 0 {
        0
    } else {
        redundant_offset_samples / frames_per_packet
    };

    let payload_size_max_listener = if inputs.redundant { recv_bound * 2 } else { recv_bound };
    let payload_size_max_talker = if inputs.redundant { payload_size * 2 } else { payload_size };

    Some(DerivedSizes {
        frames_per_packet,
        payload_size,
        payload_size_max_listener,
        payload_size_max_talker,
        item_size,
        redundant_queue_frame_size,
        redundant_offset_packets,
    })
}

/// True iff `redundant_offset_usec` corresponds to a whole number of
/// packets at the derived packet rate — a fatal configuration error if not
/// (§4.C, §6 edge cases).
pub fn is_whole_packet_offset(inputs: SizingInputs, sizes: &DerivedSizes) -> bool {
    if !inputs.redundant || sizes.frames_per_packet == 0 {
        return true;
    }
    let redundant_offset_samples =
        (inputs.redundant_offset_usec as u64 * inputs.rate_hz as u64) / 1_000_000;
    redundant_offset_samples % sizes.frames_per_packet as u64 == 0
}
