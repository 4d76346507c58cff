//! Compressor capability and codec registry

#[cfg(feature = "aac")]
pub mod aac_encoder;
pub mod passthrough;
pub mod registry;


use bytes::Bytes;
use thiserror::Error;

use crate::audio::ChannelLayout;

pub use registry::{CodecFactory, CodecRegistry};

/// Compressor error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompressorError {
    /// Not ready: drain pending output before submitting more input
    #[error("try again")]
    Again,
    /// Session parameters were rejected
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    /// Submitted frame does not match the negotiated shape
    #[error("invalid frame: expected {expected} samples, got {actual}")]
    InvalidFrame {
        /// Samples expected across all planes
        expected: usize,
        /// Samples received
        actual: usize,
    },
    /// Compression failed
    #[error("compression failed: {0}")]
    Failed(String),
}

/// Bitstream a compressor emits, which decides how bursts are framed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bitstream {
    /// Dolby AC-3 frames
    Ac3,
    /// MPEG-2 AAC in ADTS transport
    AacAdts,
    /// Unframed output with no passthrough mapping
    Raw,
}

/// Session parameters handed to a codec factory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecParams {
    /// Target bitrate in bits per second
    pub bitrate: u32,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Default layout for `channels`, if one exists
    pub layout: Option<ChannelLayout>,
}

impl CodecParams {
    /// Create parameters with the default layout for `channels`
    #[must_use]
    pub fn new(bitrate: u32, sample_rate: u32, channels: u16) -> Self {
        Self {
            bitrate,
            sample_rate,
            channels,
            layout: ChannelLayout::default_for(channels),
        }
    }
}

/// One compressed unit of output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Compressed bytes
    pub data: Bytes,
}

impl Packet {
    /// Wrap compressed bytes
    #[must_use]
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    /// Get packet length in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the packet is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// One frame of 16-bit samples laid out as contiguous per-channel planes
#[derive(Debug, Clone, Copy)]
pub struct PlanarFrame<'a> {
    samples: &'a [i16],
    channels: usize,
    frame_size: usize,
}

impl<'a> PlanarFrame<'a> {
    /// View `samples` as `channels` planes of `frame_size` samples
    ///
    /// # Errors
    ///
    /// Returns `CompressorError::InvalidFrame` if the slice length does not
    /// match `channels * frame_size`.
    pub fn new(
        samples: &'a [i16],
        channels: usize,
        frame_size: usize,
    ) -> Result<Self, CompressorError> {
        let expected = channels * frame_size;
        if samples.len() != expected {
            return Err(CompressorError::InvalidFrame {
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self {
            samples,
            channels,
            frame_size,
        })
    }

    /// Get number of channels
    #[must_use]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Get samples per channel
    #[must_use]
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Get one channel's plane
    #[must_use]
    pub fn plane(&self, channel: usize) -> &'a [i16] {
        let start = channel * self.frame_size;
        &self.samples[start..start + self.frame_size]
    }

    /// Get all planes back to back
    #[must_use]
    pub fn samples(&self) -> &'a [i16] {
        self.samples
    }
}

/// Stateful compressor driven through a submit/receive protocol
///
/// A compressor may hold frames back, so one submitted frame does not
/// necessarily yield one packet on the next receive.
pub trait Compressor: Send {
    /// Codec name (for logging)
    fn name(&self) -> &'static str;

    /// Samples per channel consumed by one submit
    fn frame_size(&self) -> usize;

    /// Bitstream the packets belong to
    fn bitstream(&self) -> Bitstream;

    /// Submit one planar frame
    ///
    /// # Errors
    ///
    /// `CompressorError::Again` if output must be drained first; any other
    /// error if the frame could not be compressed.
    fn submit(&mut self, frame: &PlanarFrame<'_>) -> Result<(), CompressorError>;

    /// Take the next queued packet
    ///
    /// `Ok(None)` means nothing is ready yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the compressor is in a failed state.
    fn receive(&mut self) -> Result<Option<Packet>, CompressorError>;
}
