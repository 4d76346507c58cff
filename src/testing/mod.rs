//! Test doubles and signal generators for the encode path

#[cfg(test)]
mod tests;

use std::collections::VecDeque;
use std::f32::consts::PI;

use bytes::{BufMut, BytesMut};

use crate::codec::{
    Bitstream, CodecParams, CodecRegistry, Compressor, CompressorError, Packet, PlanarFrame,
};

/// Behaviour of a [`ScriptedCompressor`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressorScript {
    /// Samples per channel per frame
    pub frame_size: usize,
    /// Bitstream reported to the packetizer
    pub bitstream: Bitstream,
    /// Frames held back before the first packet comes out
    pub latency: usize,
    /// Packets produced per submitted frame
    pub packets_per_frame: usize,
    /// Size of every packet in bytes (at least 12)
    pub packet_len: usize,
    /// Submit attempt (0-based) that fails with `Failed`
    pub fail_on_submit: Option<u64>,
    /// Submit attempt (0-based) refused with `Again`
    pub refuse_on_submit: Option<u64>,
    /// Reject `open` with `InvalidParameters`
    pub reject_open: bool,
    /// Report a different bitstream once this many frames were submitted
    pub switch_bitstream: Option<(u32, Bitstream)>,
}

impl Default for CompressorScript {
    fn default() -> Self {
        Self {
            frame_size: 256,
            bitstream: Bitstream::Ac3,
            latency: 0,
            packets_per_frame: 1,
            packet_len: 64,
            fail_on_submit: None,
            refuse_on_submit: None,
            reject_open: false,
            switch_bitstream: None,
        }
    }
}

impl CompressorScript {
    /// Set frame size
    #[must_use]
    pub fn frame_size(mut self, frame_size: usize) -> Self {
        self.frame_size = frame_size;
        self
    }

    /// Set reported bitstream
    #[must_use]
    pub fn bitstream(mut self, bitstream: Bitstream) -> Self {
        self.bitstream = bitstream;
        self
    }

    /// Hold back `frames` frames
    #[must_use]
    pub fn latency(mut self, frames: usize) -> Self {
        self.latency = frames;
        self
    }

    /// Emit `count` packets per frame
    #[must_use]
    pub fn packets_per_frame(mut self, count: usize) -> Self {
        self.packets_per_frame = count;
        self
    }

    /// Set packet size
    #[must_use]
    pub fn packet_len(mut self, len: usize) -> Self {
        self.packet_len = len;
        self
    }

    /// Fail the given submit attempt
    #[must_use]
    pub fn fail_on_submit(mut self, attempt: u64) -> Self {
        self.fail_on_submit = Some(attempt);
        self
    }

    /// Refuse the given submit attempt with `Again`
    #[must_use]
    pub fn refuse_on_submit(mut self, attempt: u64) -> Self {
        self.refuse_on_submit = Some(attempt);
        self
    }

    /// Make `open` fail
    #[must_use]
    pub fn reject_open(mut self) -> Self {
        self.reject_open = true;
        self
    }

    /// Report `bitstream` after `frames` successful submits
    #[must_use]
    pub fn switch_bitstream(mut self, frames: u32, bitstream: Bitstream) -> Self {
        self.switch_bitstream = Some((frames, bitstream));
        self
    }

    /// Register this script under `name`
    pub fn register(self, registry: &mut CodecRegistry, name: &str) {
        registry.register(name, move |params| {
            ScriptedCompressor::open(self.clone(), params)
                .map(|c| Box::new(c) as Box<dyn Compressor>)
        });
    }
}

/// Compressor following a [`CompressorScript`]
///
/// Each packet starts with the 0-based index of the frame it came from (u32,
/// big-endian) and the wrapping sum of that frame's samples (i64, big-endian),
/// then zero padding.
#[derive(Debug)]
pub struct ScriptedCompressor {
    script: CompressorScript,
    channels: usize,
    /// Frames submitted but not yet released
    held: VecDeque<Vec<Packet>>,
    ready: VecDeque<Packet>,
    attempts: u64,
    frames: u32,
}

impl ScriptedCompressor {
    /// Open a session
    ///
    /// # Errors
    ///
    /// Returns `CompressorError::InvalidParameters` if the script says so or
    /// the channel count is zero.
    pub fn open(script: CompressorScript, params: &CodecParams) -> Result<Self, CompressorError> {
        if script.reject_open || params.channels == 0 {
            return Err(CompressorError::InvalidParameters(format!(
                "scripted rejection of {params:?}"
            )));
        }
        Ok(Self {
            script,
            channels: usize::from(params.channels),
            held: VecDeque::new(),
            ready: VecDeque::new(),
            attempts: 0,
            frames: 0,
        })
    }

    fn packets_for(&self, frame: &PlanarFrame<'_>) -> Vec<Packet> {
        let sum = frame
            .samples()
            .iter()
            .fold(0i64, |acc, &s| acc.wrapping_add(i64::from(s)));
        (0..self.script.packets_per_frame)
            .map(|_| {
                let mut out = BytesMut::with_capacity(self.script.packet_len);
                out.put_u32(self.frames);
                out.put_i64(sum);
                out.resize(self.script.packet_len.max(12), 0);
                Packet::new(out.freeze())
            })
            .collect()
    }
}

impl Compressor for ScriptedCompressor {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn frame_size(&self) -> usize {
        self.script.frame_size
    }

    fn bitstream(&self) -> Bitstream {
        match self.script.switch_bitstream {
            Some((after, bitstream)) if self.frames >= after => bitstream,
            _ => self.script.bitstream,
        }
    }

    fn submit(&mut self, frame: &PlanarFrame<'_>) -> Result<(), CompressorError> {
        let attempt = self.attempts;
        self.attempts += 1;

        if self.script.refuse_on_submit == Some(attempt) {
            return Err(CompressorError::Again);
        }
        if self.script.fail_on_submit == Some(attempt) {
            return Err(CompressorError::Failed(format!("scripted failure at {attempt}")));
        }
        if frame.channels() != self.channels || frame.frame_size() != self.script.frame_size {
            return Err(CompressorError::InvalidFrame {
                expected: self.channels * self.script.frame_size,
                actual: frame.samples().len(),
            });
        }

        let packets = self.packets_for(frame);
        self.frames += 1;
        self.held.push_back(packets);
        while self.held.len() > self.script.latency {
            if let Some(packets) = self.held.pop_front() {
                self.ready.extend(packets);
            }
        }
        Ok(())
    }

    fn receive(&mut self) -> Result<Option<Packet>, CompressorError> {
        Ok(self.ready.pop_front())
    }
}

/// Read the frame index a scripted packet came from
#[must_use]
pub fn scripted_frame_index(packet: &[u8]) -> Option<u32> {
    packet
        .get(..4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
}

/// Silent 16-bit PCM, `samples` samples across all channels
#[must_use]
pub fn silence_i16(samples: usize) -> Vec<u8> {
    vec![0u8; samples * 2]
}

/// 16-bit PCM counting up from zero, wrapping
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn ramp_i16(samples: usize) -> Vec<u8> {
    (0..samples)
        .flat_map(|i| (i as u16).to_le_bytes())
        .collect()
}

/// Interleaved float sine, same tone on every channel
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn sine_f32(frames: usize, channels: usize, freq: f32, sample_rate: u32, amplitude: f32) -> Vec<u8> {
    let step = 2.0 * PI * freq / sample_rate as f32;
    (0..frames)
        .flat_map(|i| {
            let value = amplitude * (step * i as f32).sin();
            std::iter::repeat_n(value, channels)
        })
        .flat_map(f32::to_le_bytes)
        .collect()
}

/// Install a tracing subscriber honouring `RUST_LOG`, once per process
#[cfg(test)]
pub(crate) fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
