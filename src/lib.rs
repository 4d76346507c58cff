//! # spdif-encoder
//!
//! Real-time re-encoder turning interleaved PCM into IEC 61937 bursts for
//! S/PDIF or HDMI passthrough to an external decoder.
//!
//! ## Features
//!
//! - Sample format normalization to 16-bit PCM
//! - Frame-at-a-time compression through a pluggable codec registry
//! - AC-3 and AAC (ADTS) burst framing, little- or big-endian
//! - Chunked staging buffers that absorb arbitrary input splits
//!
//! ## Example
//!
//! ```rust
//! use spdif_encoder::{DigitalEncoder, EncoderConfig, SampleFormat};
//!
//! let config = EncoderConfig::builder()
//!     .codec("passthrough-test")
//!     .bitrate(448_000)
//!     .sample_rate(48_000)
//!     .channels(6)
//!     .build();
//!
//! let mut encoder = DigitalEncoder::new(&config);
//! encoder.init_from(&config)?;
//!
//! // Half a frame: nothing to send yet
//! let pcm = vec![0u8; 1536 * 6];
//! assert_eq!(encoder.encode(&pcm, SampleFormat::I16), 0);
//!
//! // Second half completes the frame
//! let available = encoder.encode(&pcm, SampleFormat::I16);
//! let mut out = vec![0u8; available];
//! encoder.get_frames(&mut out);
//! # Ok::<(), spdif_encoder::EncoderError>(())
//! ```
//!
//! # Architecture
//!
//! - **Facade**: `DigitalEncoder` - init, encode, drain, reset
//! - **Driver**: `FrameEncoder` - codec session and per-frame submit/receive
//! - **Low-level**: `audio`, `codec` and `spdif` modules

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Public modules
/// Error types
pub mod error;
/// Core types
pub mod types;

/// Testing utilities
pub mod testing;

/// PCM formats, conversion and staging buffers
pub mod audio;
/// Compressor interface and codecs
pub mod codec;
/// Encode pipeline
pub mod encoder;
/// IEC 61937 framing
pub mod spdif;

// Re-exports
pub use audio::{ChannelLayout, SampleFormat};
pub use codec::{Bitstream, CodecParams, CodecRegistry, Compressor, CompressorError, Packet};
pub use encoder::{DigitalEncoder, EncoderState, FrameEncoder};
pub use error::EncoderError;
pub use spdif::SpdifByteOrder;
pub use types::{EncoderConfig, EncoderSettings, SettingsProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::audio::SampleFormat;
    pub use crate::encoder::DigitalEncoder;
    pub use crate::error::EncoderError;
    pub use crate::types::{EncoderConfig, EncoderSettings};
}
