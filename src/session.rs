//! Session state and lifecycle: mirrors `pvt_data_t` plus
//! `openavbMapAVTPAudioGenInitCB`/`GenEndCB`/`Initialize`.

use log::{debug, error, info};

use crate::config::{Role, SessionConfig};
use crate::error::{AafError, Result};
use crate::ring::CircularByteQueue;
use crate::sizing::{self, DerivedSizes, SizingInputs};

/// Redundancy/loss-concealment counters reported every `report_seconds`,
/// mirroring the original's `trStatsTotalFrames`/`LostFrames`/
/// `NeededAvailable`/`NeededNotAvailable`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RedundancyStats {
    pub total_frames: u64,
    pub lost_frames: u64,
    pub needed_available: u64,
    pub needed_not_available: u64,
}

/// A marker byte pushed onto the per-packet stats ring alongside each
/// redundant frame, recording what format (if any) that frame carries.
/// `Unspec` stands in for "no frame queued yet" (the original's prefilled
/// zero bytes, `AAF_FORMAT_UNSPEC == 0`).
pub use crate::format::SampleFormat as StatsTag;

/// All per-session state this mapping core owns between `gen_init` and
/// `gen_end`. Talker/listener/loss-concealer pipelines borrow this
/// mutably per callback; nothing here is shared across sessions.
pub struct Session {
    pub config: SessionConfig,
    pub sizes: DerivedSizes,
    pub data_valid: bool,
    /// Talker: delays the redundant copy. Listener: recovery source for
    /// the loss concealer. `None` when redundancy is disabled.
    pub redundant_queue: Option<CircularByteQueue>,
    /// Listener only: one tag byte per queued redundant frame, parallel
    /// to `redundant_queue`.
    pub stats_tag_queue: Option<CircularByteQueue>,
    pub stats: RedundancyStats,
    pub next_report_nsec: u64,
    pub media_q_item_sync_ts: bool,
}

impl Session {
    /// Mirrors `openavbMapAVTPAudioGenInitCB`: derive sizes, validate the
    /// redundant offset is a whole number of packets, and allocate the
    /// redundancy/stats rings prefilled as the original does.
    pub fn gen_init(config: SessionConfig) -> Result<Self> {
        let inputs = SizingInputs {
            rate_hz: config.rate_hz,
            tx_interval_hz: config.tx_interval_hz,
            channels: config.channels,
            format: config.format,
            packing_factor: config.packing_factor,
            redundant: config.is_redundant(),
            redundant_offset_usec: config.redundant_offset_usec,
        };

        let sizes = sizing::calculate(inputs).ok_or(AafError::DegenerateSizing)?;

        if !sizing::is_whole_packet_offset(inputs, &sizes) {
            error!(
                "redundant offset {}us is not a whole number of packets at {} frames/packet",
                config.redundant_offset_usec, sizes.frames_per_packet
            );
            return Err(AafError::RedundantOffsetNotWholePackets {
                offset_usec: config.redundant_offset_usec,
                frames_per_packet: sizes.frames_per_packet,
            });
        }

        if config.role == Role::Listener && config.sparse_mode.is_enabled() {
            validate_sparse_packing_factor(config.packing_factor)?;
        }

        let offset_packets = sizes.redundant_offset_packets as usize;

        let (redundant_queue, stats_tag_queue) = if config.is_redundant() {
            let frame_size = sizes.redundant_queue_frame_size;
            let mut rq = CircularByteQueue::allocate(frame_size * (offset_packets + 2));
            rq.push_zeros(frame_size * offset_packets);

            let stats = match config.role {
                Role::Listener => {
                    let mut sq = CircularByteQueue::allocate(offset_packets + 10);
                    sq.push_zeros(offset_packets);
                    Some(sq)
                }
                Role::Talker => None,
            };
            (Some(rq), stats)
        } else {
            (None, None)
        };

        info!(
            "AAF mapping initialized: role={:?} rate={}Hz channels={} format={:?} frames/packet={} redundant={}",
            config.role, config.rate_hz, config.channels, config.format, sizes.frames_per_packet, config.is_redundant()
        );

        Ok(Session {
            config,
            sizes,
            data_valid: true,
            redundant_queue,
            stats_tag_queue,
            stats: RedundancyStats::default(),
            next_report_nsec: 0,
            // Runtime-only: set once the listener has seen its first
            // valid timestamp (§4.F step 2), never part of configuration.
            media_q_item_sync_ts: false,
        })
    }

    /// Mirrors `openavbMapAVTPAudioGenEndCB`: drop the rings and mark the
    /// session no longer valid for packet processing.
    pub fn gen_end(&mut self) {
        debug!("tearing down AAF mapping session");
        self.redundant_queue = None;
        self.stats_tag_queue = None;
        self.data_valid = false;
        self.media_q_item_sync_ts = false;
    }
}

/// Mirrors the original's sparse-mode packing-factor validation in
/// `openavbMapAVTPAudioRxInitCB`: the factor must be 1, 2, 4, another
/// power of two below 8, or a multiple of 8.
fn validate_sparse_packing_factor(factor: u32) -> Result<()> {
    let ok = match factor {
        0 => false,
        1..=7 => factor.is_power_of_two(),
        f => f % 8 == 0,
    };
    if ok {
        Ok(())
    } else {
        Err(AafError::InvalidSparsePackingFactor(factor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::SparseMode;

    fn base_config(role: Role) -> SessionConfig {
        let mut cfg = SessionConfig::new(role);
        cfg.rate_hz = 48_000;
        cfg.tx_interval_hz = 4_000;
        cfg
    }

    #[test]
    fn gen_init_allocates_nothing_when_not_redundant() {
        let session = Session::gen_init(base_config(Role::Talker)).unwrap();
        assert!(session.redundant_queue.is_none());
        assert!(session.stats_tag_queue.is_none());
        assert!(session.data_valid);
    }

    #[test]
    fn gen_init_prefills_redundant_queue_with_offset_packets_of_zeros() {
        let mut cfg = base_config(Role::Talker);
        cfg.redundant_offset_usec = 500; // two packets at 250us
        let session = Session::gen_init(cfg).unwrap();
        let rq = session.redundant_queue.as_ref().unwrap();
        assert_eq!(rq.bytes_queued(), session.sizes.redundant_queue_frame_size * 2);
    }

    #[test]
    fn gen_init_rejects_non_whole_packet_offset() {
        let mut cfg = base_config(Role::Talker);
        cfg.redundant_offset_usec = 100; // less than one packet interval (250us)
        assert!(matches!(
            Session::gen_init(cfg),
            Err(AafError::RedundantOffsetNotWholePackets { .. })
        ));
    }

    #[test]
    fn listener_gets_a_stats_tag_queue_when_redundant() {
        let mut cfg = base_config(Role::Listener);
        cfg.redundant_offset_usec = 4_000;
        let session = Session::gen_init(cfg).unwrap();
        assert!(session.stats_tag_queue.is_some());
    }

    #[test]
    fn sparse_packing_factor_validation() {
        assert!(validate_sparse_packing_factor(1).is_ok());
        assert!(validate_sparse_packing_factor(4).is_ok());
        assert!(validate_sparse_packing_factor(8).is_ok());
        assert!(validate_sparse_packing_factor(24).is_ok());
        assert!(validate_sparse_packing_factor(3).is_err());
        assert!(validate_sparse_packing_factor(0).is_err());
    }

    #[test]
    fn gen_end_clears_rings_and_validity() {
        let mut cfg = base_config(Role::Talker);
        cfg.redundant_offset_usec = 4_000;
        let mut session = Session::gen_init(cfg).unwrap();
        session.gen_end();
        assert!(session.redundant_queue.is_none());
        assert!(!session.data_valid);
    }

    #[test]
    fn sparse_mode_is_carried_through_config() {
        let mut cfg = base_config(Role::Listener);
        cfg.sparse_mode = SparseMode::Enabled;
        cfg.packing_factor = 1;
        assert!(Session::gen_init(cfg).is_ok());
    }
}
