//! Talker pipeline (§4.E): drains the media queue, writes the AAF header,
//! and — when redundancy is enabled — interleaves a delayed copy of an
//! earlier frame ahead of the live one via the redundancy ring.
//!
//! Mirrors `openavbMapAVTPAudioTxCB`; the per-item tail-lock loop follows
//! the same lock/unlock-on-every-exit-path shape as
//! `bass-aes67/src/output/stream.rs`'s transmitter loop, minus the thread.

use log::{trace, warn};

use crate::collab::{AvtpTime, MediaQueue, MediaQueueItem};
use crate::header::HeaderWriter;
use crate::session::Session;

/// Result of one `tx` call: whether a packet was produced and how many
/// payload bytes it carries. Mirrors the original's `dataLen` output
/// parameter plus its boolean return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxOutcome {
    /// A packet was written; `payload_len` bytes of `buf` past the header
    /// are valid.
    Packet { payload_len: usize },
    /// No packet this call — the media queue had nothing ready.
    NoData,
}

/// Fill `buf`'s AAF header and payload from `session`'s media queue.
/// `buf` must be at least `HEADER_LEN + sizes.payload_size_max_talker`
/// bytes. Returns `TxOutcome::NoData` if the queue can't supply a full
/// frame this call, matching the original's "return false, nothing to
/// send" path.
pub fn tx<Q, T>(session: &mut Session, queue: &mut Q, time: &mut T, buf: &mut [u8]) -> TxOutcome
where
    Q: MediaQueue,
    T: AvtpTime,
{
    let frame_size = session.sizes.redundant_queue_frame_size;
    let payload_size = session.sizes.payload_size;

    let mut live_frame = vec![0u8; payload_size];
    let mut filled = 0usize;
    let mut item_timestamp = None;

    while filled < payload_size {
        let Some(item) = queue.tail_lock() else {
            trace!("tx: media queue empty, nothing to send");
            return TxOutcome::NoData;
        };

        let remaining = item.data_len().saturating_sub(item.read_idx());
        if remaining == 0 {
            warn!("tx: media queue item fully drained with nothing left for this packet");
            queue.tail_pull();
            return TxOutcome::NoData;
        }

        let take = remaining.min(payload_size - filled);
        let start = item.read_idx();
        live_frame[filled..filled + take].copy_from_slice(&item.data()[start..start + take]);
        filled += take;

        // The last item touched this call supplies the packet's
        // timestamp; it's consumed here regardless of whether the item
        // itself is pulled or left partially drained.
        item_timestamp = item.avtp_timestamp();
        item.set_avtp_timestamp(None);

        let new_idx = start + take;
        if new_idx >= item.data_len() {
            item.set_read_idx(0);
            item.set_data_len(0);
            queue.tail_pull();
        } else {
            item.set_read_idx(new_idx);
            queue.tail_unlock();
        }
    }

    let mut header = HeaderWriter::new(buf);
    let seq = header.sequence();
    header.set_subtype(crate::header::AVTP_SUBTYPE_AAF);
    header.set_format_info(session.config.format, header_rate(session), session.config.channels, session.config.format.bit_depth());

    let carries_ts = session.config.sparse_mode.carries_timestamp(seq);
    match (carries_ts, item_timestamp) {
        (true, Some(ts)) => {
            time.set_from_timestamp(ts);
            time.add_usec(session.config.max_transit_usec as i64);
            if session.config.is_redundant() {
                time.add_usec(session.config.redundant_offset_usec as i64);
            }
            header.set_timestamp(time.avtp_timestamp(), time.is_uncertain());
        }
        _ => header.clear_timestamp(),
    }
    header.set_sparse(session.config.sparse_mode.is_enabled());

    let payload = &mut buf[crate::header::HEADER_LEN..];

    let written = if let Some(rq) = session.redundant_queue.as_mut() {
        // Push the just-written live payload first, then pull the oldest
        // queued frame into the first slot — the redundancy ring is the
        // only thing that separates "what goes out now" from "what's
        // live now".
        rq.push(&live_frame);
        let mut delayed = vec![0u8; frame_size];
        rq.pull(&mut delayed);

        payload[..frame_size].copy_from_slice(&delayed);
        payload[frame_size..frame_size + payload_size].copy_from_slice(&live_frame);
        frame_size + payload_size
    } else {
        payload[..payload_size].copy_from_slice(&live_frame);
        payload_size
    };

    header.set_packet_info(written as u16, crate::format::ChannelLayout::Static);
    header.set_stream_data_length(written as u16);

    TxOutcome::Packet { payload_len: written }
}

fn header_rate(session: &Session) -> crate::format::AudioRate {
    crate::format::AudioRate::from_hz(session.config.rate_hz)
}
