//! Digital encoder facade

use super::driver::{EncoderState, FrameEncoder};
use crate::audio::{SampleFormat, StagingBuffer, canonical_len, normalize_into};
use crate::codec::{CodecParams, CodecRegistry};
use crate::error::{EncoderError, Result};
use crate::types::{EncoderConfig, SettingsProvider};

/// Re-encodes PCM into IEC 61937 bursts for digital passthrough
///
/// Push PCM with [`encode`](Self::encode), pull framed bytes with
/// [`get_frames`](Self::get_frames). Partial frames stay buffered between
/// calls, so splitting the input differently yields the same output.
///
/// Calls must be serialized by the owner; nothing in here locks.
///
/// ```rust
/// use spdif_encoder::{DigitalEncoder, EncoderConfig, SampleFormat};
///
/// let mut encoder = DigitalEncoder::new(&EncoderConfig::default());
/// encoder.init("passthrough-test", 448_000, 48_000, 6)?;
///
/// let silence = vec![0u8; 1536 * 6 * 2];
/// let available = encoder.encode(&silence, SampleFormat::I16);
///
/// let mut burst = vec![0u8; available];
/// assert_eq!(encoder.get_frames(&mut burst), available);
/// # Ok::<(), spdif_encoder::EncoderError>(())
/// ```
#[derive(Debug)]
pub struct DigitalEncoder {
    registry: CodecRegistry,
    driver: FrameEncoder,
    /// Canonical PCM awaiting a whole frame
    input: StagingBuffer,
    /// Trailing bytes of an incomplete source sample, and their format
    partial: Vec<u8>,
    partial_format: SampleFormat,
    /// Framed bursts awaiting retrieval
    output: StagingBuffer,
    last_error: Option<EncoderError>,
}

impl DigitalEncoder {
    /// Create an encoder with the built-in codecs
    #[must_use]
    pub fn new(config: &EncoderConfig) -> Self {
        Self::with_registry(config, CodecRegistry::with_defaults())
    }

    /// Create an encoder resolving codecs from `registry`
    #[must_use]
    pub fn with_registry(config: &EncoderConfig, registry: CodecRegistry) -> Self {
        Self {
            registry,
            driver: FrameEncoder::new(config.scratch_samples, config.byte_order),
            input: StagingBuffer::new(config.input_chunk_bytes, config.max_buffer_bytes),
            partial: Vec::new(),
            partial_format: SampleFormat::CANONICAL,
            output: StagingBuffer::new(config.output_chunk_bytes, config.max_buffer_bytes),
            last_error: None,
        }
    }

    /// Codecs available to `init`
    pub fn registry_mut(&mut self) -> &mut CodecRegistry {
        &mut self.registry
    }

    /// Open a codec session
    ///
    /// Any previous session and all buffered audio are discarded first.
    ///
    /// # Errors
    ///
    /// `Allocation` if the staging buffers could not be allocated at
    /// construction; otherwise the errors of [`FrameEncoder::open`]. The
    /// encoder stays uninitialized on error.
    pub fn init(&mut self, codec: &str, bitrate: u32, sample_rate: u32, channels: u16) -> Result<()> {
        tracing::info!(
            "Init codec={}, br={}, sr={}, ch={}",
            codec,
            bitrate,
            sample_rate,
            channels
        );

        if !self.input.is_allocated() || !self.output.is_allocated() {
            let err = EncoderError::Allocation {
                requested: self.input.chunk_size().max(self.output.chunk_size()),
                capacity: 0,
            };
            tracing::error!("Memory allocation failed: {}", err);
            return Err(err);
        }

        self.reset();

        let params = CodecParams::new(bitrate, sample_rate, channels);
        if let Err(err) = self.driver.open(&self.registry, codec, &params) {
            tracing::error!("{}", err);
            return Err(err);
        }

        tracing::info!(
            "DigitalEncoder::Init fs={}, spf={}",
            self.driver.frame_size().unwrap_or(0),
            self.driver.samples_per_frame().unwrap_or(0)
        );
        Ok(())
    }

    /// Open a codec session from a settings provider
    ///
    /// # Errors
    ///
    /// See [`init`](Self::init).
    pub fn init_from(&mut self, provider: &impl SettingsProvider) -> Result<()> {
        let settings = provider.encoder_settings();
        self.init(
            &settings.codec,
            settings.bitrate,
            settings.sample_rate,
            settings.channels,
        )
    }

    /// Push interleaved PCM and encode every whole frame now buffered
    ///
    /// `buf` may end part way through a sample; the leftover bytes are held
    /// and completed by the next call with the same format.
    ///
    /// Returns the number of framed bytes waiting in the output buffer, or 0
    /// if `format` has no known sample size. Failures never tear the encoder
    /// down: data that could not be buffered is dropped, a failing frame
    /// stops this call, and whatever output already exists stays available.
    /// The failure is logged and kept in [`last_error`](Self::last_error).
    pub fn encode(&mut self, buf: &[u8], format: SampleFormat) -> usize {
        self.last_error = None;

        if !format.is_known() {
            self.record(EncoderError::UnsupportedFormat { format });
            return 0;
        }

        if let Err(err) = self.encode_frames(buf, format) {
            self.record(err);
        }
        self.output.len()
    }

    fn encode_frames(&mut self, buf: &[u8], format: SampleFormat) -> Result<()> {
        let frame_bytes = self.driver.frame_bytes().ok_or(EncoderError::NotInitialized)?;

        if !self.partial.is_empty() && self.partial_format != format {
            tracing::warn!(
                "dropping {} bytes of a partial {:?} sample on switch to {:?}",
                self.partial.len(),
                self.partial_format,
                format
            );
            self.partial.clear();
        }

        let joined;
        let src = if self.partial.is_empty() {
            buf
        } else {
            joined = [self.partial.as_slice(), buf].concat();
            joined.as_slice()
        };
        let whole = src.len() - src.len() % format.bytes_per_sample();

        let required = canonical_len(whole, format);
        if self.input.ensure(required)? {
            tracing::info!(
                "low mem, reallocated in buffer to {}",
                self.input.capacity()
            );
        }
        self.input
            .append_with(required, |dst| normalize_into(&src[..whole], format, dst))?;

        self.partial.clear();
        self.partial.extend_from_slice(&src[whole..]);
        self.partial_format = format;

        let frames = self.input.len() / frame_bytes;
        tracing::trace!(
            "encoding {} frames, {} bytes buffered",
            frames,
            self.input.len()
        );

        let mut consumed = 0;
        let mut result = Ok(());
        for index in 0..frames {
            let start = index * frame_bytes;
            let pcm = &self.input.as_slice()[start..start + frame_bytes];

            let packet = match self.driver.encode_frame(index, pcm) {
                Ok(packet) => packet,
                Err(err) => {
                    result = Err(err);
                    break;
                }
            };
            consumed += 1;

            if let Some(packet) = packet {
                if let Err(err) = self.driver.packetize(&packet, &mut self.output) {
                    result = Err(err);
                    break;
                }
            }
        }

        self.input.consume(consumed * frame_bytes);
        result
    }

    /// Copy framed bytes out, oldest first
    ///
    /// Returns `min(dst.len(), buffered)`; the copied bytes are removed.
    pub fn get_frames(&mut self, dst: &mut [u8]) -> usize {
        let len = self.output.read(dst);
        if len != dst.len() {
            tracing::info!("GetFrames: getting less than requested ({} of {})", len, dst.len());
        }
        len
    }

    /// Close the codec session and discard all buffered audio
    ///
    /// Staging buffers stay allocated at their initial size. Safe to call
    /// repeatedly.
    pub fn reset(&mut self) {
        self.driver.close();
        self.input.reset();
        self.partial.clear();
        self.output.reset();
    }

    /// Discard buffered audio, keeping the codec session
    pub fn clear(&mut self) {
        self.input.clear();
        self.partial.clear();
        self.output.clear();
    }

    /// Get the lifecycle state
    #[must_use]
    pub fn state(&self) -> EncoderState {
        self.driver.state()
    }

    /// Check if a codec session is open
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.state() == EncoderState::Ready
    }

    /// Negotiated samples per channel per frame
    #[must_use]
    pub fn frame_size(&self) -> Option<usize> {
        self.driver.frame_size()
    }

    /// Samples per frame across all channels
    #[must_use]
    pub fn samples_per_frame(&self) -> Option<usize> {
        self.driver.samples_per_frame()
    }

    /// Name of the open codec
    #[must_use]
    pub fn codec_name(&self) -> Option<&str> {
        self.driver.codec_name()
    }

    /// Canonical PCM bytes waiting for a whole frame
    #[must_use]
    pub fn buffered_input_bytes(&self) -> usize {
        self.input.len()
    }

    /// Source bytes of an incomplete sample held for the next `encode`
    #[must_use]
    pub fn partial_sample_bytes(&self) -> usize {
        self.partial.len()
    }

    /// Framed bytes waiting for `get_frames`
    #[must_use]
    pub fn buffered_output_bytes(&self) -> usize {
        self.output.len()
    }

    /// Error raised by the most recent `encode`, if any
    #[must_use]
    pub fn last_error(&self) -> Option<&EncoderError> {
        self.last_error.as_ref()
    }

    fn record(&mut self, err: EncoderError) {
        tracing::error!("digital encode error: {}", err);
        self.last_error = Some(err);
    }
}

impl Drop for DigitalEncoder {
    fn drop(&mut self) {
        self.driver.close();
    }
}
