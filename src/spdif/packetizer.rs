//! IEC 61937 burst framing for S/PDIF passthrough

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec::Bitstream;

/// Burst preamble sync word Pa
pub const SYNC_WORD_1: u16 = 0xF872;
/// Burst preamble sync word Pb
pub const SYNC_WORD_2: u16 = 0x4E1F;
/// Preamble length (Pa, Pb, Pc, Pd)
pub const BURST_HEADER_LEN: usize = 8;
/// AC-3 burst repetition period: 1536 frames of 2 × 16-bit
pub const AC3_BURST_BYTES: usize = 1536 * 4;
/// MPEG-2 AAC burst repetition period: 1024 frames of 2 × 16-bit
pub const AAC_BURST_BYTES: usize = 1024 * 4;

const DATA_TYPE_AC3: u16 = 0x01;
const DATA_TYPE_MPEG2_AAC: u16 = 0x07;

/// Word order of the emitted S/PDIF stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpdifByteOrder {
    /// Little-endian 16-bit words (payload byte-swapped)
    #[default]
    Little,
    /// Big-endian 16-bit words (payload as-is)
    Big,
}

/// Packetizer errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PacketizerError {
    /// The bitstream has no IEC 61937 mapping
    #[error("no IEC 61937 mapping for {0:?}")]
    UnsupportedBitstream(Bitstream),
    /// The packet does not fit in one burst
    #[error("packet of {size} bytes exceeds {period} byte burst")]
    BurstOverflow {
        /// Packet size in bytes
        size: usize,
        /// Burst repetition period in bytes
        period: usize,
    },
}

/// Wraps compressed packets in IEC 61937 data bursts
///
/// Usage per packet is `write_frame`, then `processed_size`, then `get_data`.
/// The next `write_frame` replaces the previous burst.
#[derive(Debug)]
pub struct SpdifPacketizer {
    bitstream: Bitstream,
    data_type: u16,
    period: usize,
    byte_order: SpdifByteOrder,
    burst: Vec<u8>,
}

impl SpdifPacketizer {
    /// Create a packetizer for a bitstream
    ///
    /// # Errors
    ///
    /// Returns `PacketizerError::UnsupportedBitstream` for bitstreams without
    /// a burst mapping.
    pub fn new(bitstream: Bitstream, byte_order: SpdifByteOrder) -> Result<Self, PacketizerError> {
        let (data_type, period) = match bitstream {
            Bitstream::Ac3 => (DATA_TYPE_AC3, AC3_BURST_BYTES),
            Bitstream::AacAdts => (DATA_TYPE_MPEG2_AAC, AAC_BURST_BYTES),
            Bitstream::Raw => return Err(PacketizerError::UnsupportedBitstream(bitstream)),
        };

        Ok(Self {
            bitstream,
            data_type,
            period,
            byte_order,
            burst: Vec::with_capacity(period),
        })
    }

    /// Bitstream this packetizer frames
    #[must_use]
    pub fn bitstream(&self) -> Bitstream {
        self.bitstream
    }

    /// Burst repetition period in bytes
    #[must_use]
    pub fn burst_period(&self) -> usize {
        self.period
    }

    /// Stage one compressed packet
    ///
    /// # Errors
    ///
    /// Returns `PacketizerError::BurstOverflow` if the preamble plus payload
    /// exceeds the burst period. Nothing is staged in that case.
    pub fn write_frame(&mut self, payload: &[u8]) -> Result<(), PacketizerError> {
        self.burst.clear();

        let padded = payload.len() + payload.len() % 2;
        if BURST_HEADER_LEN + padded > self.period {
            return Err(PacketizerError::BurstOverflow {
                size: payload.len(),
                period: self.period,
            });
        }

        let mut data_type = self.data_type;
        if self.bitstream == Bitstream::Ac3 && payload.len() > 5 {
            // bitstream mode, low 3 bits of byte 5
            data_type |= u16::from(payload[5] & 0x07) << 8;
        }
        let length_code = u16::try_from(padded * 8).unwrap_or(u16::MAX);

        self.burst.resize(self.period, 0);
        match self.byte_order {
            SpdifByteOrder::Little => {
                Self::fill::<LittleEndian>(&mut self.burst, data_type, length_code, payload);
            }
            SpdifByteOrder::Big => {
                Self::fill::<BigEndian>(&mut self.burst, data_type, length_code, payload);
            }
        }
        Ok(())
    }

    /// Size of the staged burst in bytes
    #[must_use]
    pub fn processed_size(&self) -> usize {
        self.burst.len()
    }

    /// Copy the staged burst into `dst`
    ///
    /// Returns the number of bytes written, at most `dst.len()`.
    pub fn get_data(&self, dst: &mut [u8]) -> usize {
        let len = self.burst.len().min(dst.len());
        dst[..len].copy_from_slice(&self.burst[..len]);
        len
    }

    fn fill<B: ByteOrder>(burst: &mut [u8], data_type: u16, length_code: u16, payload: &[u8]) {
        B::write_u16_into(
            &[SYNC_WORD_1, SYNC_WORD_2, data_type, length_code],
            &mut burst[..BURST_HEADER_LEN],
        );

        // Payload is a sequence of big-endian 16-bit words, odd tail padded with zero
        for (chunk, out) in payload
            .chunks(2)
            .zip(burst[BURST_HEADER_LEN..].chunks_exact_mut(2))
        {
            let word = u16::from_be_bytes([chunk[0], chunk.get(1).copied().unwrap_or(0)]);
            B::write_u16(out, word);
        }
    }
}
