use serde::{Deserialize, Serialize};

use crate::audio::DEFAULT_CHUNK_SIZE;
use crate::spdif::SpdifByteOrder;

/// Codec parameters supplied once at `init`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderSettings {
    /// Codec name as registered (default: `aac`)
    pub codec: String,

    /// Target bitrate in bits per second (default: `192_000`)
    pub bitrate: u32,

    /// Sample rate in Hz (default: 48000)
    pub sample_rate: u32,

    /// Number of channels (default: 2)
    pub channels: u16,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            codec: "aac".to_string(),
            bitrate: 192_000,
            sample_rate: 48_000,
            channels: 2,
        }
    }
}

/// Source of encoder settings, typically the application's settings store
pub trait SettingsProvider {
    /// Current encoder settings
    fn encoder_settings(&self) -> EncoderSettings;
}

impl SettingsProvider for EncoderSettings {
    fn encoder_settings(&self) -> EncoderSettings {
        self.clone()
    }
}

/// Configuration for a `DigitalEncoder`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Codec parameters
    #[serde(flatten)]
    pub settings: EncoderSettings,

    /// Input buffer growth increment in bytes (default: 131072)
    pub input_chunk_bytes: usize,

    /// Output buffer growth increment in bytes (default: 131072)
    pub output_chunk_bytes: usize,

    /// Ceiling on either staging buffer (None = limited by the allocator)
    pub max_buffer_bytes: Option<usize>,

    /// Planar scratch capacity in samples across all channels (default: 65536)
    pub scratch_samples: usize,

    /// Word order of the S/PDIF output (default: little-endian)
    pub byte_order: SpdifByteOrder,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            settings: EncoderSettings::default(),
            input_chunk_bytes: DEFAULT_CHUNK_SIZE,
            output_chunk_bytes: DEFAULT_CHUNK_SIZE,
            max_buffer_bytes: None,
            scratch_samples: DEFAULT_CHUNK_SIZE / 2,
            byte_order: SpdifByteOrder::Little,
        }
    }
}

impl EncoderConfig {
    /// Create a new config builder
    #[must_use]
    pub fn builder() -> EncoderConfigBuilder {
        EncoderConfigBuilder::default()
    }

    /// Load a config from JSON; missing fields take their defaults
    ///
    /// # Errors
    ///
    /// Returns the parse error if `json` is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl SettingsProvider for EncoderConfig {
    fn encoder_settings(&self) -> EncoderSettings {
        self.settings.clone()
    }
}

/// Builder for `EncoderConfig`
#[derive(Debug, Clone, Default)]
pub struct EncoderConfigBuilder {
    config: EncoderConfig,
}

impl EncoderConfigBuilder {
    /// Set codec name
    #[must_use]
    pub fn codec(mut self, codec: impl Into<String>) -> Self {
        self.config.settings.codec = codec.into();
        self
    }

    /// Set bitrate in bits per second
    #[must_use]
    pub fn bitrate(mut self, bitrate: u32) -> Self {
        self.config.settings.bitrate = bitrate;
        self
    }

    /// Set sample rate in Hz
    #[must_use]
    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.config.settings.sample_rate = sample_rate;
        self
    }

    /// Set channel count
    #[must_use]
    pub fn channels(mut self, channels: u16) -> Self {
        self.config.settings.channels = channels;
        self
    }

    /// Set growth increment for both staging buffers
    #[must_use]
    pub fn chunk_bytes(mut self, bytes: usize) -> Self {
        self.config.input_chunk_bytes = bytes;
        self.config.output_chunk_bytes = bytes;
        self
    }

    /// Cap staging buffer size
    #[must_use]
    pub fn max_buffer_bytes(mut self, bytes: usize) -> Self {
        self.config.max_buffer_bytes = Some(bytes);
        self
    }

    /// Set planar scratch capacity in samples
    #[must_use]
    pub fn scratch_samples(mut self, samples: usize) -> Self {
        self.config.scratch_samples = samples;
        self
    }

    /// Set S/PDIF word order
    #[must_use]
    pub fn byte_order(mut self, order: SpdifByteOrder) -> Self {
        self.config.byte_order = order;
        self
    }

    /// Build the config
    #[must_use]
    pub fn build(self) -> EncoderConfig {
        self.config
    }
}
