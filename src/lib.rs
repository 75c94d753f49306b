//! AVTP Audio Format (AAF) packetizer/depacketizer and temporal
//! redundancy engine, implementing IEEE 1722-2016 Clause 7.
//!
//! This crate maps raw PCM audio in a [`collab::MediaQueue`] onto the
//! wire format of AAF AVTPDUs (and back), including the optional
//! temporal-redundancy scheme that conceals a single dropped packet by
//! carrying a second, time-shifted copy of every frame. It owns none of
//! the surrounding AVTP transport, media clock, or sample storage —
//! those are supplied by the host through the traits in [`collab`].

pub mod collab;
pub mod config;
pub mod convert;
pub mod error;
pub mod format;
pub mod header;
pub mod listener;
pub mod loss;
pub mod ring;
pub mod session;
pub mod sizing;
pub mod talker;

pub use collab::{AvtpTime, MediaQueue, MediaQueueItem, MonotonicClock};
pub use config::{Role, SessionConfig};
pub use error::{AafError, Result};
pub use format::{AudioRate, ChannelLayout, SampleFormat, SparseMode};
pub use listener::{rx, RxOutcome};
pub use loss::{conceal, ConcealOutcome};
pub use session::{RedundancyStats, Session};
pub use talker::{tx, TxOutcome};
