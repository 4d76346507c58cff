//! Frame encoder driver: codec session lifecycle and per-frame protocol

use byteorder::{ByteOrder, LittleEndian};

use crate::audio::{SampleFormat, StagingBuffer, deinterleave};
use crate::codec::{CodecParams, CodecRegistry, Compressor, CompressorError, Packet, PlanarFrame};
use crate::error::{EncoderError, Result};
use crate::spdif::{SpdifByteOrder, SpdifPacketizer};

/// Driver lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderState {
    /// No codec session
    Uninitialized,
    /// Session open, accepting frames
    Ready,
}

/// Open codec session and the packetizer bound to it
struct Session {
    codec: String,
    compressor: Box<dyn Compressor>,
    packetizer: Option<SpdifPacketizer>,
    frame_size: usize,
    channels: usize,
    samples_per_frame: usize,
}

/// Drives a compressor one whole frame at a time
///
/// Scratch space for one frame is allocated once at construction; a codec
/// whose frame does not fit is rejected at [`open`](Self::open).
pub struct FrameEncoder {
    session: Option<Session>,
    /// Interleaved samples of the frame being encoded
    interleaved: Vec<i16>,
    /// The same frame split into channel planes
    planar: Vec<i16>,
    byte_order: SpdifByteOrder,
}

impl FrameEncoder {
    /// Create a driver with room for `scratch_samples` samples per frame
    #[must_use]
    pub fn new(scratch_samples: usize, byte_order: SpdifByteOrder) -> Self {
        Self {
            session: None,
            interleaved: vec![0; scratch_samples],
            planar: vec![0; scratch_samples],
            byte_order,
        }
    }

    /// Get the lifecycle state
    #[must_use]
    pub fn state(&self) -> EncoderState {
        if self.session.is_some() {
            EncoderState::Ready
        } else {
            EncoderState::Uninitialized
        }
    }

    /// Scratch capacity in samples
    #[must_use]
    pub fn scratch_samples(&self) -> usize {
        self.planar.len()
    }

    /// Negotiated samples per channel per frame
    #[must_use]
    pub fn frame_size(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.frame_size)
    }

    /// Samples per frame across all channels
    #[must_use]
    pub fn samples_per_frame(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.samples_per_frame)
    }

    /// Canonical bytes per frame across all channels
    #[must_use]
    pub fn frame_bytes(&self) -> Option<usize> {
        self.samples_per_frame()
            .map(|n| n * SampleFormat::CANONICAL.bytes_per_sample())
    }

    /// Channel count of the open session
    #[must_use]
    pub fn channels(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.channels)
    }

    /// Name of the open codec
    #[must_use]
    pub fn codec_name(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.codec.as_str())
    }

    /// Open a codec session, closing any previous one first
    ///
    /// # Errors
    ///
    /// `CodecNotFound` if `codec` is not registered, `CodecOpen` if the codec
    /// rejects `params`, `FrameTooLarge` if one frame does not fit the scratch
    /// space and `PacketizerInit` if the bitstream cannot be framed. The driver
    /// is left uninitialized on any error.
    pub fn open(&mut self, registry: &CodecRegistry, codec: &str, params: &CodecParams) -> Result<()> {
        self.close();

        let factory = registry.find(codec).ok_or_else(|| EncoderError::CodecNotFound {
            name: codec.to_string(),
        })?;

        let compressor = factory(params).map_err(|source| EncoderError::CodecOpen {
            codec: codec.to_string(),
            source,
        })?;

        let frame_size = compressor.frame_size();
        if frame_size == 0 {
            return Err(EncoderError::CodecOpen {
                codec: codec.to_string(),
                source: CompressorError::InvalidParameters("zero frame size".to_string()),
            });
        }

        let channels = usize::from(params.channels);
        let samples_per_frame = frame_size * channels;
        if samples_per_frame > self.scratch_samples() {
            return Err(EncoderError::FrameTooLarge {
                required: samples_per_frame,
                capacity: self.scratch_samples(),
            });
        }

        let packetizer = SpdifPacketizer::new(compressor.bitstream(), self.byte_order).map_err(
            |e| EncoderError::PacketizerInit {
                codec: codec.to_string(),
                message: e.to_string(),
            },
        )?;

        self.session = Some(Session {
            codec: codec.to_string(),
            compressor,
            packetizer: Some(packetizer),
            frame_size,
            channels,
            samples_per_frame,
        });
        Ok(())
    }

    /// Drop the codec session and packetizer
    pub fn close(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::debug!("closing {} session", session.codec);
        }
    }

    /// Encode one frame of canonical PCM
    ///
    /// Receives any queued packet, submits the frame, and if nothing was
    /// queued before the submit, receives once more. At most one packet is
    /// returned per frame.
    ///
    /// # Errors
    ///
    /// `NotInitialized` without a session; `Compression` if either phase
    /// fails. A packet received before a failed submit is lost.
    ///
    /// # Panics
    ///
    /// Panics if `pcm` is shorter than one frame.
    pub fn encode_frame(&mut self, index: usize, pcm: &[u8]) -> Result<Option<Packet>> {
        let session = self.session.as_mut().ok_or(EncoderError::NotInitialized)?;
        let n = session.samples_per_frame;
        let failed = |got_packet, source| EncoderError::Compression {
            frame: index,
            got_packet,
            source,
        };

        LittleEndian::read_i16_into(&pcm[..n * 2], &mut self.interleaved[..n]);
        deinterleave(
            &self.interleaved[..n],
            session.channels,
            session.frame_size,
            &mut self.planar[..n],
        );
        let frame = PlanarFrame::new(&self.planar[..n], session.channels, session.frame_size)
            .map_err(|source| failed(false, source))?;

        let mut packet = session
            .compressor
            .receive()
            .map_err(|source| failed(false, source))?;

        if let Err(source) = session.compressor.submit(&frame) {
            if source == CompressorError::Again {
                // TODO: drain every ready packet before resubmitting instead of failing the call
                tracing::warn!(
                    "{} refused frame {} with output pending; queued packets are not drained",
                    session.codec,
                    index
                );
            }
            return Err(failed(packet.is_some(), source));
        }

        if packet.is_none() {
            packet = session
                .compressor
                .receive()
                .map_err(|source| failed(false, source))?;
        }
        Ok(packet)
    }

    /// Frame a packet and append the burst to `out`
    ///
    /// Returns the number of bytes appended. A packetizer dropped after an
    /// earlier failure is recreated here.
    ///
    /// # Errors
    ///
    /// `NotInitialized` without a session, `PacketizerInit` if a dropped
    /// packetizer cannot be recreated, `Packetize` if the packet cannot be
    /// framed (the packetizer is dropped), `Allocation` if `out` cannot grow.
    pub fn packetize(&mut self, packet: &Packet, out: &mut StagingBuffer) -> Result<usize> {
        let byte_order = self.byte_order;
        let session = self.session.as_mut().ok_or(EncoderError::NotInitialized)?;

        let packetizer = match session.packetizer.take() {
            Some(packetizer) => packetizer,
            None => {
                tracing::debug!("recreating spdif packetizer for {}", session.codec);
                SpdifPacketizer::new(session.compressor.bitstream(), byte_order).map_err(|e| {
                    EncoderError::PacketizerInit {
                        codec: session.codec.clone(),
                        message: e.to_string(),
                    }
                })?
            }
        };
        let packetizer = session.packetizer.insert(packetizer);

        if let Err(e) = packetizer.write_frame(&packet.data) {
            session.packetizer = None;
            return Err(EncoderError::Packetize {
                message: e.to_string(),
            });
        }

        let size = packetizer.processed_size();
        if out.ensure(size)? {
            tracing::warn!("low mem, reallocated out buffer to {}", out.capacity());
        }
        out.append_with(size, |dst| packetizer.get_data(dst))
    }
}

impl std::fmt::Debug for FrameEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameEncoder")
            .field("state", &self.state())
            .field("codec", &self.codec_name())
            .field("frame_size", &self.frame_size())
            .field("scratch_samples", &self.scratch_samples())
            .finish()
    }
}
