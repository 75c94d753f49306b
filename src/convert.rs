//! Integer PCM sample-format conversion between the three AAF integer
//! widths (§4.D). Conversion is always byte padding or truncation at the
//! low-order end — never a numeric rescale — matching the pad/truncate
//! loops in `openavbMapAVTPAudioRxCB`/`openavbMapAVTPAudioRxLostCB`.
//!
//! Float and AES3 formats are out of scope (§1 non-goals); callers never
//! ask this module to convert them.

use crate::format::SampleFormat;

/// Convert one sample from `from` to `to`, both integer formats, widening
/// by appending low-order zero bytes or narrowing by dropping them.
/// `src.len()` must equal `from.bytes_per_sample()`; the returned vector's
/// length equals `to.bytes_per_sample()`.
///
/// Panics if either format isn't an integer format or `src` is the wrong
/// length — both are programmer errors the caller (the listener/loss
/// pipelines) is responsible for avoiding via the size calculator's
/// output.
pub fn convert_sample(src: &[u8], from: SampleFormat, to: SampleFormat) -> Vec<u8> {
    let from_width = from.bytes_per_sample().expect("from must be an integer format") as usize;
    let to_width = to.bytes_per_sample().expect("to must be an integer format") as usize;
    assert_eq!(src.len(), from_width, "sample length doesn't match `from` format");

    if from_width == to_width {
        return src.to_vec();
    }
    if to_width > from_width {
        let mut out = src.to_vec();
        out.resize(to_width, 0);
        out
    } else {
        src[..to_width].to_vec()
    }
}

/// Convert a contiguous buffer of `channels`-interleaved integer samples.
/// `src.len()` must be a multiple of `from`'s sample width.
pub fn convert_buffer(src: &[u8], from: SampleFormat, to: SampleFormat) -> Vec<u8> {
    let from_width = from.bytes_per_sample().expect("from must be an integer format") as usize;
    assert_eq!(src.len() % from_width, 0, "buffer length isn't a whole number of samples");

    let to_width = to.bytes_per_sample().expect("to must be an integer format") as usize;
    let sample_count = src.len() / from_width;
    let mut out = Vec::with_capacity(sample_count * to_width);
    for chunk in src.chunks_exact(from_width) {
        out.extend_from_slice(&convert_sample(chunk, from, to));
    }
    out
}
