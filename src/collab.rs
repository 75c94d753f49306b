//! Collaborator traits (§10): the only seams through which this crate
//! touches the outside world. No networking, threading, or FFI happens
//! behind these traits' implementors from inside this crate — wiring them
//! to a real AVTP transport, media clock, and sample queue is the
//! embedder's job, the same division `bass-aes67`'s `src/input/mod.rs` and
//! `src/output/mod.rs` draw between the plugin core and the BASS/socket
//! FFI layers it calls through.

/// One queued unit of PCM audio: a fixed-capacity byte buffer plus the
/// bookkeeping the talker/listener pipelines need (byte count actually
/// used, and an optional AVTP presentation time to stamp or read back).
pub trait MediaQueueItem {
    /// Mutable access to the item's sample storage.
    fn data_mut(&mut self) -> &mut [u8];

    /// Read-only access to the item's sample storage.
    fn data(&self) -> &[u8];

    /// Bytes of `data()` actually populated with samples.
    fn data_len(&self) -> usize;

    fn set_data_len(&mut self, len: usize);

    /// Talker-side read cursor into `data()[..data_len()]`, persisted
    /// across partial drains so a multi-packet item picks up where the
    /// previous `tx` call left off.
    fn read_idx(&self) -> usize;

    fn set_read_idx(&mut self, idx: usize);

    /// The item's AVTP presentation timestamp, if one has been set.
    fn avtp_timestamp(&self) -> Option<u32>;

    fn set_avtp_timestamp(&mut self, timestamp: Option<u32>);
}

/// The media sample queue sitting between this mapping and the audio
/// device. Talker pulls from the tail, listener pushes to the head;
/// lock/unlock calls must be balanced on every exit path exactly as
/// `openavbMapAVTPAudioTxCB`/`RxCB` pair them around every early return.
pub trait MediaQueue {
    type Item: MediaQueueItem;

    /// Configure the fixed item size this queue must allocate, in bytes.
    fn set_item_size(&mut self, size: usize);

    /// Configure how many items the queue should hold.
    fn set_depth(&mut self, depth: usize);

    /// Lock and return the head item a listener is about to fill, or
    /// `None` if no item is currently available.
    fn head_lock(&mut self) -> Option<&mut Self::Item>;

    /// Commit the head item (push it toward the audio device) and unlock.
    fn head_push(&mut self);

    /// Release the head lock without committing (used on a validation
    /// failure).
    fn head_unlock(&mut self);

    /// Lock and return the tail item a talker is about to drain, or
    /// `None` if no item is available yet.
    fn tail_lock(&mut self) -> Option<&mut Self::Item>;

    /// Release the tail item back to the queue after it has been fully
    /// drained.
    fn tail_pull(&mut self);

    /// Release the tail lock without consuming (used when a partially
    /// drained item still has bytes left for the next packet).
    fn tail_unlock(&mut self);
}

/// AVTP presentation time attached to a packet or media-queue item,
/// abstracting over the host transport's representation (§10).
pub trait AvtpTime {
    fn is_valid(&self) -> bool;
    fn is_uncertain(&self) -> bool;
    fn set_valid(&mut self, valid: bool);
    fn set_uncertain(&mut self, uncertain: bool);

    /// Add `usec` microseconds to the time, as the talker does when
    /// computing a redundant copy's offset presentation time.
    fn add_usec(&mut self, usec: i64);

    /// The 32-bit AVTP timestamp field this time corresponds to.
    fn avtp_timestamp(&self) -> u32;

    fn set_from_timestamp(&mut self, avtp_timestamp: u32);
}

/// A monotonic clock, used only for the periodic redundancy-stats report
/// interval (§4.G); never consulted for presentation-time math, which is
/// entirely [`AvtpTime`]'s job.
pub trait MonotonicClock {
    fn now_nsec(&self) -> u64;
}
