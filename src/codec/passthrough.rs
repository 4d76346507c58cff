//! Deterministic constant-bitrate compressor
//!
//! Emits AC-3 shaped packets (sync word, sample rate code, bitstream mode)
//! whose body is a fold of the submitted samples. Output depends only on the
//! input, which makes it suitable for exercising the encode path end to end.

use bytes::{BufMut, BytesMut};

use super::{Bitstream, CodecParams, Compressor, CompressorError, Packet, PlanarFrame};
use crate::spdif::{AC3_BURST_BYTES, BURST_HEADER_LEN};

/// Registry name
pub const NAME: &str = "passthrough-test";

/// Samples per channel per frame (same as AC-3)
pub const FRAME_SIZE: usize = 1536;

/// AC-3 sync word
pub const SYNC_WORD: u16 = 0x0B77;

const HEADER_LEN: usize = 6;
const MAX_CHANNELS: u16 = 6;
const BSID: u8 = 8;

/// Compressor producing one fixed-size packet per frame
#[derive(Debug)]
pub struct PassthroughCompressor {
    channels: usize,
    packet_len: usize,
    fscod: u8,
    pending: Option<Packet>,
    frames: u64,
}

impl PassthroughCompressor {
    /// Open a session
    ///
    /// # Errors
    ///
    /// Returns `CompressorError::InvalidParameters` if the channel count is
    /// outside 1..=6 or the bitrate does not give a whole number of bytes per
    /// frame that fits in one AC-3 burst.
    pub fn open(params: &CodecParams) -> Result<Self, CompressorError> {
        if params.channels == 0 || params.channels > MAX_CHANNELS {
            return Err(CompressorError::InvalidParameters(format!(
                "{} channels",
                params.channels
            )));
        }
        if params.bitrate == 0 || params.sample_rate == 0 {
            return Err(CompressorError::InvalidParameters(format!(
                "bitrate {} at {} Hz",
                params.bitrate, params.sample_rate
            )));
        }

        let bits = u64::from(params.bitrate) * FRAME_SIZE as u64;
        let per_frame = u64::from(params.sample_rate) * 8;
        if bits % per_frame != 0 {
            return Err(CompressorError::InvalidParameters(format!(
                "bitrate {} does not divide into whole frames at {} Hz",
                params.bitrate, params.sample_rate
            )));
        }

        let packet_len = usize::try_from(bits / per_frame).unwrap_or(usize::MAX);
        // Header plus at least one body byte
        if packet_len <= HEADER_LEN || packet_len + BURST_HEADER_LEN > AC3_BURST_BYTES {
            return Err(CompressorError::InvalidParameters(format!(
                "{packet_len} byte packets"
            )));
        }

        Ok(Self {
            channels: usize::from(params.channels),
            packet_len,
            fscod: match params.sample_rate {
                48_000 => 0,
                44_100 => 1,
                32_000 => 2,
                _ => 3,
            },
            pending: None,
            frames: 0,
        })
    }

    /// Size of every packet in bytes
    #[must_use]
    pub fn packet_len(&self) -> usize {
        self.packet_len
    }

    /// Frames compressed so far
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    #[allow(clippy::cast_sign_loss)]
    fn compress(&self, frame: &PlanarFrame<'_>) -> Packet {
        let body_len = self.packet_len - HEADER_LEN;
        let mut body = vec![0u8; body_len];
        let mut check: u16 = 0;
        for (i, sample) in frame.samples().iter().enumerate() {
            let [lo, hi] = sample.to_le_bytes();
            body[(2 * i) % body_len] ^= lo;
            body[(2 * i + 1) % body_len] ^= hi;
            check = check.rotate_left(1) ^ (*sample as u16);
        }

        let mut out = BytesMut::with_capacity(self.packet_len);
        out.put_u16(SYNC_WORD);
        out.put_u16(check);
        out.put_u8(self.fscod << 6);
        // bsmod 0: complete main service
        out.put_u8(BSID << 3);
        out.put_slice(&body);
        Packet::new(out.freeze())
    }
}

impl Compressor for PassthroughCompressor {
    fn name(&self) -> &'static str {
        NAME
    }

    fn frame_size(&self) -> usize {
        FRAME_SIZE
    }

    fn bitstream(&self) -> Bitstream {
        Bitstream::Ac3
    }

    fn submit(&mut self, frame: &PlanarFrame<'_>) -> Result<(), CompressorError> {
        if self.pending.is_some() {
            return Err(CompressorError::Again);
        }
        if frame.channels() != self.channels || frame.frame_size() != FRAME_SIZE {
            return Err(CompressorError::InvalidFrame {
                expected: self.channels * FRAME_SIZE,
                actual: frame.samples().len(),
            });
        }

        self.pending = Some(self.compress(frame));
        self.frames += 1;
        Ok(())
    }

    fn receive(&mut self) -> Result<Option<Packet>, CompressorError> {
        Ok(self.pending.take())
    }
}
