//! AAC compressor using fdk-aac

use std::collections::VecDeque;

use fdk_aac::enc::{AudioObjectType, BitRate, ChannelMode, Encoder, EncoderParams, Transport};

use super::{Bitstream, CodecParams, Compressor, CompressorError, Packet, PlanarFrame};
use crate::audio::interleave;

/// Registry name
pub const NAME: &str = "aac";

/// AAC-LC encoder emitting ADTS frames
pub struct AacCompressor {
    encoder: Encoder,
    channels: usize,
    frame_size: usize,
    /// Interleaved copy of the submitted frame
    interleaved: Vec<i16>,
    output_buffer: Vec<u8>,
    queue: VecDeque<Packet>,
}

impl AacCompressor {
    /// Open a session
    ///
    /// # Errors
    ///
    /// Returns `CompressorError::InvalidParameters` if the channel count is not
    /// mono or stereo, or fdk-aac rejects the bitrate/sample rate.
    pub fn open(params: &CodecParams) -> Result<Self, CompressorError> {
        let channel_mode = match params.channels {
            1 => ChannelMode::Mono,
            2 => ChannelMode::Stereo,
            n => {
                return Err(CompressorError::InvalidParameters(format!(
                    "{n} channels"
                )));
            }
        };

        let encoder = Encoder::new(EncoderParams {
            bit_rate: BitRate::Cbr(params.bitrate),
            transport: Transport::Adts,
            audio_object_type: AudioObjectType::Mpeg4LowComplexity,
            channels: channel_mode,
            sample_rate: params.sample_rate,
        })
        .map_err(|e| CompressorError::InvalidParameters(format!("{e:?}")))?;

        let frame_size = encoder
            .info()
            .map(|info| info.frameLength as usize)
            .map_err(|e| CompressorError::InvalidParameters(format!("{e:?}")))?;

        let channels = usize::from(params.channels);
        // 6144 bits per channel is max theoretical size for AAC
        let buffer_size = 8192 * channels;

        Ok(Self {
            encoder,
            channels,
            frame_size,
            interleaved: vec![0i16; frame_size * channels],
            output_buffer: vec![0u8; buffer_size],
            queue: VecDeque::new(),
        })
    }
}

impl Compressor for AacCompressor {
    fn name(&self) -> &'static str {
        NAME
    }

    fn frame_size(&self) -> usize {
        self.frame_size
    }

    fn bitstream(&self) -> Bitstream {
        Bitstream::AacAdts
    }

    fn submit(&mut self, frame: &PlanarFrame<'_>) -> Result<(), CompressorError> {
        if frame.channels() != self.channels || frame.frame_size() != self.frame_size {
            return Err(CompressorError::InvalidFrame {
                expected: self.channels * self.frame_size,
                actual: frame.samples().len(),
            });
        }

        interleave(
            frame.samples(),
            self.channels,
            self.frame_size,
            &mut self.interleaved,
        );

        let mut input = &self.interleaved[..];
        while !input.is_empty() {
            let info = self
                .encoder
                .encode(input, &mut self.output_buffer)
                .map_err(|e| CompressorError::Failed(format!("{e:?}")))?;

            if info.output_size > 0 {
                self.queue
                    .push_back(Packet::new(self.output_buffer[..info.output_size].to_vec()));
            }
            if info.input_consumed == 0 {
                break;
            }
            input = &input[info.input_consumed.min(input.len())..];
        }

        Ok(())
    }

    fn receive(&mut self) -> Result<Option<Packet>, CompressorError> {
        Ok(self.queue.pop_front())
    }
}
