//! Listener pipeline (§4.F): validates an incoming AAF AVTPDU, converts
//! its payload into the media queue's configured format if needed, and
//! maintains the redundancy ring and per-frame stats tags the loss
//! concealer later reads from.
//!
//! Mirrors `openavbMapAVTPAudioRxCB`; the validate-then-accept-or-reject
//! shape echoes the packet-acceptance logic in
//! `bass-aes67/src/input/jitter.rs`.

use log::warn;

use crate::collab::{MediaQueue, MediaQueueItem};
use crate::convert;
use crate::header::{self, DecodedHeader};
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxOutcome {
    Accepted { payload_len: usize },
    Rejected(&'static str),
}

/// Validate and accept one incoming packet, filling the media queue's
/// head item and (when redundancy is enabled) maintaining the recovery
/// ring. `packet` is the full AVTPDU, header included.
pub fn rx<Q: MediaQueue>(session: &mut Session, queue: &mut Q, packet: &[u8]) -> RxOutcome {
    let Some(decoded) = header::decode(packet) else {
        return RxOutcome::Rejected("packet shorter than the AAF header");
    };

    if decoded.subtype != header::AVTP_SUBTYPE_AAF {
        return RxOutcome::Rejected("not an AAF subtype packet");
    }

    if let Some(reason) = validate_stream_format(session, &decoded, packet.len()) {
        if session.data_valid {
            log::error!("AAF stream format became invalid ({reason}); muting until it recovers");
            session.data_valid = false;
        }
        return RxOutcome::Rejected(reason);
    }
    if !session.data_valid {
        log::info!("AAF stream format valid again; un-muting");
        session.data_valid = true;
    }

    // Event-field mismatches are logged, never muted: a wrong channel
    // layout tag doesn't invalidate otherwise-good audio (resolved open
    // question: receive doesn't mute on event mismatch).
    let expected_event = crate::format::ChannelLayout::Static;
    if decoded.event != expected_event {
        warn!("AAF event field {:?} doesn't match expected {:?}; accepting anyway", decoded.event, expected_event);
    }

    // Sparse-mode disagreement: adopt what the stream actually carries,
    // in place, without purging whatever media-queue item is in flight
    // (resolved open question).
    if decoded.sparse != session.config.sparse_mode.is_enabled() {
        warn!("AAF sparse-mode flag changed mid-stream; adopting stream value");
        session.config.sparse_mode = if decoded.sparse {
            crate::format::SparseMode::Enabled
        } else {
            crate::format::SparseMode::Disabled
        };
    }

    let payload = &packet[header::HEADER_LEN..];
    if decoded.stream_data_length as usize > payload.len() {
        return RxOutcome::Rejected("stream data length exceeds the frame actually received");
    }
    let available = decoded.stream_data_length as usize;

    let (played, cached) = match extract_frames(session, payload, available) {
        Some(frames) => frames,
        None => return RxOutcome::Rejected("payload shorter than one frame"),
    };

    if let Some(rq) = session.redundant_queue.as_mut() {
        // The ring holds each packet's second ("live") half: a lost
        // future packet's own first-slot content is exactly what this
        // packet just carried as its live half, cached here until that
        // future packet's delayed slot either arrives naturally or is
        // reported lost.
        let frame_size = session.sizes.redundant_queue_frame_size;
        rq.discard(frame_size);
        match cached.as_deref() {
            Some(cached) => rq.push(cached),
            None => rq.push_zeros(frame_size),
        }

        if let Some(sq) = session.stats_tag_queue.as_mut() {
            let mut old_tag = [0u8];
            sq.pull(&mut old_tag);
            sq.push(&[decoded.format.wire_code()]);
        }
    }

    let converted = if decoded.format == session.config.format {
        played
    } else if decoded.format.is_integer() && session.config.format.is_integer() {
        convert::convert_buffer(&played, decoded.format, session.config.format)
    } else {
        return RxOutcome::Rejected("incompatible, non-convertible sample format");
    };

    let Some(item) = queue.head_lock() else {
        return RxOutcome::Rejected("media queue has no free item");
    };

    if item.data_len() == 0 {
        if decoded.timestamp_valid {
            let presented_ts = decoded
                .avtp_timestamp
                .wrapping_sub(session.config.presentation_latency_usec);
            item.set_avtp_timestamp(Some(presented_ts));
            session.media_q_item_sync_ts = true;
        } else if !session.media_q_item_sync_ts {
            queue.head_unlock();
            return RxOutcome::Rejected("no timestamp yet and item not synced");
        }
    }

    let start = item.data_len();
    let cap = item.data_mut().len();
    let write_len = converted.len().min(cap.saturating_sub(start));
    item.data_mut()[start..start + write_len].copy_from_slice(&converted[..write_len]);
    let new_len = start + write_len;
    item.set_data_len(new_len);

    if new_len >= session.sizes.item_size {
        queue.head_push();
    } else {
        queue.head_unlock();
    }

    session.stats.total_frames += 1;

    RxOutcome::Accepted { payload_len: write_len }
}

fn validate_stream_format(session: &Session, decoded: &DecodedHeader, frame_len: usize) -> Option<&'static str> {
    if decoded.rate.hz() != session.config.rate_hz {
        return Some("sample rate mismatch");
    }
    if decoded.channels != session.config.channels {
        return Some("channel count mismatch");
    }
    if decoded.format != session.config.format
        && !(decoded.format.is_integer() && session.config.format.is_integer())
    {
        return Some("sample format mismatch and not convertible");
    }
    if decoded.stream_data_length as usize > frame_len.saturating_sub(header::HEADER_LEN) {
        return Some("stream data length exceeds frame capacity");
    }
    if let Some(decoded_bytes) = decoded.format.bytes_per_sample() {
        let copies = if session.redundant_queue.is_some() { 2 } else { 1 };
        let expected = session.sizes.frames_per_packet as usize
            * session.config.channels as usize
            * decoded_bytes as usize
            * copies;
        if decoded.stream_data_length as usize != expected {
            return Some("payload size doesn't match the expected frame count");
        }
    }
    None
}

/// Split `payload` into what goes to the media queue now (the first
/// slot of a redundant packet's doubled payload, or the whole payload
/// when redundancy is disabled) and what goes into the recovery ring
/// (the second slot), mirroring the original's `pPayload`/`pPayload +
/// payloadLen` split. Returns `None` when the packet is too short to
/// carry even one frame.
///
/// A redundant frame too short to carry two copies disables redundancy
/// for the rest of the session (§4.F step 1, §7): this is not a
/// per-packet fallback, so once tripped `session.redundant_queue` stays
/// `None` for every later packet too.
fn extract_frames(session: &mut Session, payload: &[u8], available: usize) -> Option<(Vec<u8>, Option<Vec<u8>>)> {
    if available == 0 {
        return None;
    }
    let payload = &payload[..available];

    if session.redundant_queue.is_some() {
        let frame_size = session.sizes.redundant_queue_frame_size;
        if available >= frame_size * 2 {
            let played = payload[..frame_size].to_vec();
            let cached = payload[frame_size..frame_size * 2].to_vec();
            return Some((played, Some(cached)));
        }
        warn!("redundant stream frame too short to carry two copies; disabling redundancy for the rest of the session");
        session.redundant_queue = None;
        session.stats_tag_queue = None;
    }
    Some((payload.to_vec(), None))
}
