//! AAF data model: nominal sample rate, sample format, channel layout and
//! sparse-mode tags (IEEE 1722-2016 Clause 7).

/// Nominal audio sample rate, as carried in the AAF format-info word.
///
/// Wire encoding is the enum's declaration order (0..=10), matching the
/// on-wire `nominal_sample_rate` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AudioRate {
    Unspec = 0,
    Rate8k,
    Rate16k,
    Rate32k,
    Rate44k1,
    Rate48k,
    Rate88k2,
    Rate96k,
    Rate176k4,
    Rate192k,
    Rate24k,
}

impl AudioRate {
    /// Build the rate tag from a sample rate in Hz. Returns `Unspec` for
    /// anything not in the fixed AAF rate table.
    pub fn from_hz(hz: u32) -> Self {
        match hz {
            8_000 => AudioRate::Rate8k,
            16_000 => AudioRate::Rate16k,
            24_000 => AudioRate::Rate24k,
            32_000 => AudioRate::Rate32k,
            44_100 => AudioRate::Rate44k1,
            48_000 => AudioRate::Rate48k,
            88_200 => AudioRate::Rate88k2,
            96_000 => AudioRate::Rate96k,
            176_400 => AudioRate::Rate176k4,
            192_000 => AudioRate::Rate192k,
            _ => AudioRate::Unspec,
        }
    }

    /// The sample rate in Hz this tag denotes, or 0 for `Unspec`.
    pub fn hz(self) -> u32 {
        match self {
            AudioRate::Unspec => 0,
            AudioRate::Rate8k => 8_000,
            AudioRate::Rate16k => 16_000,
            AudioRate::Rate24k => 24_000,
            AudioRate::Rate32k => 32_000,
            AudioRate::Rate44k1 => 44_100,
            AudioRate::Rate48k => 48_000,
            AudioRate::Rate88k2 => 88_200,
            AudioRate::Rate96k => 96_000,
            AudioRate::Rate176k4 => 176_400,
            AudioRate::Rate192k => 192_000,
        }
    }

    /// 4-bit wire encoding used in the format-info word (bits [23:20]).
    pub fn wire_code(self) -> u8 {
        self as u8
    }

    /// Decode the 4-bit wire encoding. Out-of-range codes map to `Unspec`.
    pub fn from_wire_code(code: u8) -> Self {
        match code {
            0 => AudioRate::Unspec,
            1 => AudioRate::Rate8k,
            2 => AudioRate::Rate16k,
            3 => AudioRate::Rate32k,
            4 => AudioRate::Rate44k1,
            5 => AudioRate::Rate48k,
            6 => AudioRate::Rate88k2,
            7 => AudioRate::Rate96k,
            8 => AudioRate::Rate176k4,
            9 => AudioRate::Rate192k,
            10 => AudioRate::Rate24k,
            _ => AudioRate::Unspec,
        }
    }
}

/// AAF sample format tag.
///
/// Integer formats satisfy `bytes_per_sample() == 6 - wire_code()`; this is
/// how the sample converter (§4.D) derives per-sample widths without a
/// lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SampleFormat {
    Unspec = 0,
    Float32 = 1,
    Int32 = 2,
    Int24 = 3,
    Int16 = 4,
    /// Reserved by IEEE 1722-2016; this core never produces or accepts it.
    Aes3_32 = 5,
}

impl SampleFormat {
    pub fn wire_code(self) -> u8 {
        self as u8
    }

    pub fn from_wire_code(code: u8) -> Self {
        match code {
            0 => SampleFormat::Unspec,
            1 => SampleFormat::Float32,
            2 => SampleFormat::Int32,
            3 => SampleFormat::Int24,
            4 => SampleFormat::Int16,
            5 => SampleFormat::Aes3_32,
            _ => SampleFormat::Unspec,
        }
    }

    /// True for the three integer PCM formats this core can convert between.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            SampleFormat::Int32 | SampleFormat::Int24 | SampleFormat::Int16
        )
    }

    /// Bytes occupied by one sample on the wire, for integer formats.
    /// Returns `None` for `Unspec`/`Float32`/`Aes3_32`, which this core
    /// does not convert (§1 non-goals).
    pub fn bytes_per_sample(self) -> Option<u8> {
        if self.is_integer() {
            Some(6 - self.wire_code())
        } else {
            None
        }
    }

    pub fn bit_depth(self) -> u8 {
        match self {
            SampleFormat::Unspec | SampleFormat::Aes3_32 => 0,
            SampleFormat::Float32 | SampleFormat::Int32 => 32,
            SampleFormat::Int24 => 24,
            SampleFormat::Int16 => 16,
        }
    }
}

/// Channel layout / "event" field, a 4-bit tag in the low nibble of byte 23.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ChannelLayout {
    Static = 0,
    Mono = 1,
    Stereo = 2,
    Surround5_1 = 3,
    Surround7_1 = 4,
    Max = 15,
}

impl ChannelLayout {
    pub fn wire_code(self) -> u8 {
        self as u8
    }

    pub fn from_wire_code(code: u8) -> Self {
        match code & 0x0F {
            1 => ChannelLayout::Mono,
            2 => ChannelLayout::Stereo,
            3 => ChannelLayout::Surround5_1,
            4 => ChannelLayout::Surround7_1,
            15 => ChannelLayout::Max,
            _ => ChannelLayout::Static,
        }
    }
}

/// Timestamp sparse-mode tag: when enabled, only every 8th packet (low 3
/// bits of the AVTP sequence number == 0) carries a valid timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SparseMode {
    Disabled,
    Enabled,
}

impl SparseMode {
    pub fn is_enabled(self) -> bool {
        matches!(self, SparseMode::Enabled)
    }

    /// True if `seq` falls on a packet that must carry the timestamp in
    /// this mode (always true when sparse mode is disabled).
    pub fn carries_timestamp(self, seq: u8) -> bool {
        match self {
            SparseMode::Disabled => true,
            SparseMode::Enabled => seq & 0x07 == 0,
        }
    }
}
