//! Audio format definitions

/// Sample format of the PCM handed to the encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleFormat {
    /// 8-bit unsigned integer
    U8,
    /// 16-bit signed integer (canonical)
    I16,
    /// 24-bit signed integer (packed)
    I24,
    /// 24-bit signed integer in the low bits of a 32-bit container
    I24Lsb,
    /// 32-bit signed integer
    I32,
    /// 32-bit float
    F32,
    /// Unrecognized format tag
    Unknown,
}

impl SampleFormat {
    /// The format all input is normalized to before buffering
    pub const CANONICAL: Self = Self::I16;

    /// Get bytes per sample
    ///
    /// Returns 0 for [`SampleFormat::Unknown`].
    #[must_use]
    pub fn bytes_per_sample(self) -> usize {
        match self {
            SampleFormat::U8 => 1,
            SampleFormat::I16 => 2,
            SampleFormat::I24 => 3,
            SampleFormat::I24Lsb | SampleFormat::I32 | SampleFormat::F32 => 4,
            SampleFormat::Unknown => 0,
        }
    }

    /// Get bits per sample
    #[must_use]
    pub fn bits_per_sample(self) -> u8 {
        match self {
            SampleFormat::U8 => 8,
            SampleFormat::I16 => 16,
            SampleFormat::I24 | SampleFormat::I24Lsb => 24,
            SampleFormat::I32 | SampleFormat::F32 => 32,
            SampleFormat::Unknown => 0,
        }
    }

    /// Map a raw pipeline format tag
    ///
    /// Tags follow the bit depth (`8`, `16`, `24`, `32`), with `20` for 24 bits
    /// in a 32-bit container and `33` for float. Anything else is `Unknown`.
    #[must_use]
    pub fn from_tag(tag: u8) -> Self {
        match tag {
            8 => SampleFormat::U8,
            16 => SampleFormat::I16,
            20 => SampleFormat::I24Lsb,
            24 => SampleFormat::I24,
            32 => SampleFormat::I32,
            33 => SampleFormat::F32,
            _ => SampleFormat::Unknown,
        }
    }

    /// Check if the format has a known sample size
    #[must_use]
    pub fn is_known(self) -> bool {
        self.bytes_per_sample() > 0
    }

    /// Check if the format is floating point
    #[must_use]
    pub fn is_float(self) -> bool {
        self == SampleFormat::F32
    }
}

/// Default speaker layout for a channel count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelLayout {
    /// 1 channel
    Mono,
    /// 2 channels
    Stereo,
    /// 2.1 (3 channels)
    Surround21,
    /// Quad (4 channels)
    Quad,
    /// 5.0 (5 channels)
    Surround50,
    /// 5.1 (6 channels)
    Surround51,
    /// 6.1 (7 channels)
    Surround61,
    /// 7.1 (8 channels)
    Surround71,
}

impl ChannelLayout {
    /// Pick the default layout for a channel count
    #[must_use]
    pub fn default_for(channels: u16) -> Option<Self> {
        match channels {
            1 => Some(ChannelLayout::Mono),
            2 => Some(ChannelLayout::Stereo),
            3 => Some(ChannelLayout::Surround21),
            4 => Some(ChannelLayout::Quad),
            5 => Some(ChannelLayout::Surround50),
            6 => Some(ChannelLayout::Surround51),
            7 => Some(ChannelLayout::Surround61),
            8 => Some(ChannelLayout::Surround71),
            _ => None,
        }
    }

    /// Get number of channels
    #[must_use]
    pub fn channels(self) -> u16 {
        match self {
            ChannelLayout::Mono => 1,
            ChannelLayout::Stereo => 2,
            ChannelLayout::Surround21 => 3,
            ChannelLayout::Quad => 4,
            ChannelLayout::Surround50 => 5,
            ChannelLayout::Surround51 => 6,
            ChannelLayout::Surround61 => 7,
            ChannelLayout::Surround71 => 8,
        }
    }

    /// Check if the layout carries a low-frequency effects channel
    #[must_use]
    pub fn has_lfe(self) -> bool {
        matches!(
            self,
            ChannelLayout::Surround21
                | ChannelLayout::Surround51
                | ChannelLayout::Surround61
                | ChannelLayout::Surround71
        )
    }
}
