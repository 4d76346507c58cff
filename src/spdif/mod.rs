//! S/PDIF passthrough framing

mod packetizer;

#[cfg(test)]
mod tests;

pub use packetizer::{
    AAC_BURST_BYTES, AC3_BURST_BYTES, BURST_HEADER_LEN, PacketizerError, SYNC_WORD_1,
    SYNC_WORD_2, SpdifByteOrder, SpdifPacketizer,
};
