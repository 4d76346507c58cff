use thiserror::Error;

use crate::audio::SampleFormat;
use crate::codec::CompressorError;

/// Errors that can occur while encoding to a digital passthrough stream
#[derive(Debug, Error)]
pub enum EncoderError {
    // ===== Buffer Errors =====
    /// A staging buffer could not grow to the requested size
    #[error("allocation failed: requested {requested} bytes (capacity {capacity})")]
    Allocation {
        /// Total size the buffer needed to hold
        requested: usize,
        /// Capacity before the failed growth
        capacity: usize,
    },

    /// Planar scratch space cannot hold one codec frame
    #[error("frame of {required} samples exceeds scratch capacity of {capacity}")]
    FrameTooLarge {
        /// Samples required for one frame across all channels
        required: usize,
        /// Samples the scratch buffer was sized for
        capacity: usize,
    },

    // ===== Init Errors =====
    /// No codec is registered under the requested name
    #[error("codec not found: {name}")]
    CodecNotFound {
        /// The requested codec name
        name: String,
    },

    /// The codec rejected the session parameters
    #[error("could not open codec {codec}: invalid bitrate or samplerate")]
    CodecOpen {
        /// The codec name
        codec: String,
        /// The underlying source of the error
        #[source]
        source: CompressorError,
    },

    /// The burst framer cannot carry the codec's bitstream
    #[error("could not create spdif packetizer for {codec}: {message}")]
    PacketizerInit {
        /// The codec name
        codec: String,
        /// Description of the failure
        message: String,
    },

    // ===== Encode Errors =====
    /// The compressor failed on a frame
    #[error("audio encode error on frame {frame}: {source}")]
    Compression {
        /// Index of the failing frame within the encode call
        frame: usize,
        /// Whether a packet had already been received for this frame
        got_packet: bool,
        /// The underlying source of the error
        #[source]
        source: CompressorError,
    },

    /// A compressed packet could not be framed
    #[error("packetize error: {message}")]
    Packetize {
        /// Description of the failure
        message: String,
    },

    /// The input sample format has no known sample size
    #[error("unsupported sample format: {format:?}")]
    UnsupportedFormat {
        /// The rejected format
        format: SampleFormat,
    },

    /// Encode was called without a successful init
    #[error("encoder not initialized")]
    NotInitialized,
}

impl EncoderError {
    /// Check if the encoder stays usable after this error
    ///
    /// Only the errors raised by `init` leave the encoder without a session.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::CodecNotFound { .. }
                | Self::CodecOpen { .. }
                | Self::PacketizerInit { .. }
                | Self::FrameTooLarge { .. }
        )
    }
}

/// Result type alias for encoder operations
pub type Result<T> = std::result::Result<T, EncoderError>;
