//! Session configuration: the public knobs `openavbMapAVTPAudioCfgCB`
//! parsed from `map_nv_*` key/value pairs, plus a parser in the same
//! parse-and-warn-on-malformed style as `bass-aes67/src/input/url.rs`'s
//! `Aes67Url::parse`.

use crate::format::{SampleFormat, SparseMode};
use log::warn;

/// Whether the session is acting as a talker or listener; the original
/// sets this from which init callback (`TxInit`/`RxInit`) ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Talker,
    Listener,
}

/// Mirrors `pvt_data_t`'s publicly configurable fields (the subset not
/// derived by the size calculator).
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub role: Role,
    pub item_count: u32,
    /// Talker packet rate in Hz (e.g. 4000 for AVB Class B, 8000 for Class
    /// A) — `framesPerPacket = ceil(rate_hz / tx_interval_hz)`, not a
    /// microsecond period.
    pub tx_interval_hz: u32,
    pub packing_factor: u32,
    pub sparse_mode: SparseMode,
    pub format: SampleFormat,
    pub rate_hz: u32,
    pub channels: u16,
    pub redundant_offset_usec: u32,
    pub report_seconds: u32,
    /// Talker only: added to the AVTP time before every timestamped
    /// packet, ahead of `redundant_offset_usec` when redundancy is on.
    pub max_transit_usec: u32,
    /// Listener only: subtracted from an incoming packet's AVTP timestamp
    /// before it's stamped onto a media-queue item (§6 external interface).
    pub presentation_latency_usec: u32,
}

impl SessionConfig {
    /// Defaults from `openavbMapAVTPAudioInitialize`.
    pub fn new(role: Role) -> Self {
        SessionConfig {
            role,
            item_count: 20,
            tx_interval_hz: 4_000,
            packing_factor: 1,
            sparse_mode: SparseMode::Disabled,
            format: SampleFormat::Int16,
            rate_hz: 48_000,
            channels: 2,
            redundant_offset_usec: 0,
            report_seconds: 0,
            max_transit_usec: 0,
            presentation_latency_usec: 0,
        }
    }

    pub fn is_redundant(&self) -> bool {
        self.redundant_offset_usec > 0
    }

    /// Apply one `name = value` configuration pair, mirroring
    /// `openavbMapAVTPAudioCfgCB`'s key dispatch. Unknown keys and
    /// unparsable values are logged and otherwise ignored, matching the
    /// original's "warn and keep the default" behavior rather than
    /// failing the whole session over one bad line.
    pub fn apply(&mut self, name: &str, value: &str) {
        match name {
            "map_nv_item_count" => self.set_u32(name, value, |cfg, v| cfg.item_count = v),
            "map_nv_packing_factor" => self.set_u32(name, value, |cfg, v| cfg.packing_factor = v),
            "map_nv_tx_rate" | "map_nv_tx_interval" => {
                self.set_u32(name, value, |cfg, v| cfg.tx_interval_hz = v)
            }
            "map_nv_sparse_mode" => self.set_bool(name, value, |cfg, v| {
                cfg.sparse_mode = if v { SparseMode::Enabled } else { SparseMode::Disabled }
            }),
            "map_nv_report_seconds" => self.set_u32(name, value, |cfg, v| cfg.report_seconds = v),
            "map_nv_temporal_redundant_offset" | "map_nv_max_allowed_dropout_time" => {
                self.set_u32(name, value, |cfg, v| cfg.redundant_offset_usec = v)
            }
            _ => warn!("ignoring unrecognized AAF mapping config key {name:?}"),
        }
    }

    fn set_u32(&mut self, name: &str, value: &str, apply: impl FnOnce(&mut Self, u32)) {
        match value.trim().parse::<u32>() {
            Ok(v) => apply(self, v),
            Err(_) => warn!("ignoring unparsable value {value:?} for {name}"),
        }
    }

    fn set_bool(&mut self, name: &str, value: &str, apply: impl FnOnce(&mut Self, bool)) {
        match value.trim().parse::<u32>() {
            Ok(v) => apply(self, v != 0),
            Err(_) => warn!("ignoring unparsable value {value:?} for {name}"),
        }
    }
}

/// Parse a whole `name=value[,name=value...]` configuration string,
/// applying each pair in order onto `config`. Malformed pairs (no `=`)
/// are logged and skipped rather than aborting the whole parse.
pub fn parse_into(config: &mut SessionConfig, cfg_string: &str) {
    for pair in cfg_string.split(',') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }
        match pair.split_once('=') {
            Some((name, value)) => config.apply(name.trim(), value.trim()),
            None => warn!("ignoring malformed config pair {pair:?} (expected name=value)"),
        }
    }
}
