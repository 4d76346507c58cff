use super::*;
use crate::codec::Bitstream;

fn words_le(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .collect()
}

#[test]
fn test_raw_bitstream_rejected() {
    let err = SpdifPacketizer::new(Bitstream::Raw, SpdifByteOrder::Little).unwrap_err();
    assert_eq!(err, PacketizerError::UnsupportedBitstream(Bitstream::Raw));
}

#[test]
fn test_ac3_burst_layout() {
    let mut packetizer = SpdifPacketizer::new(Bitstream::Ac3, SpdifByteOrder::Little).unwrap();
    // sync word, crc, fscod, bsid/bsmod (bsmod = 2), body
    let payload = [0x0B, 0x77, 0x12, 0x34, 0x00, 0x42, 0xAA, 0xBB];

    packetizer.write_frame(&payload).unwrap();
    assert_eq!(packetizer.processed_size(), AC3_BURST_BYTES);

    let mut out = vec![0xFFu8; AC3_BURST_BYTES];
    assert_eq!(packetizer.get_data(&mut out), AC3_BURST_BYTES);

    let words = words_le(&out[..BURST_HEADER_LEN]);
    assert_eq!(words[0], SYNC_WORD_1);
    assert_eq!(words[1], SYNC_WORD_2);
    assert_eq!(words[2], 0x0201);
    assert_eq!(words[3], 64);

    // Byte-swapped payload
    assert_eq!(
        &out[BURST_HEADER_LEN..BURST_HEADER_LEN + 8],
        &[0x77, 0x0B, 0x34, 0x12, 0x42, 0x00, 0xBB, 0xAA]
    );
    assert!(out[BURST_HEADER_LEN + 8..].iter().all(|&b| b == 0));
}

#[test]
fn test_odd_payload_is_padded() {
    let mut packetizer = SpdifPacketizer::new(Bitstream::AacAdts, SpdifByteOrder::Little).unwrap();
    packetizer.write_frame(&[0xFF, 0xF1, 0x50]).unwrap();

    let mut out = vec![0u8; packetizer.processed_size()];
    packetizer.get_data(&mut out);

    let words = words_le(&out[..BURST_HEADER_LEN]);
    assert_eq!(words[2], 0x0007);
    // 3 bytes padded to 4 -> 32 bits
    assert_eq!(words[3], 32);
    assert_eq!(&out[8..12], &[0xF1, 0xFF, 0x00, 0x50]);
    assert_eq!(out.len(), AAC_BURST_BYTES);
}

#[test]
fn test_big_endian_keeps_payload_order() {
    let mut packetizer = SpdifPacketizer::new(Bitstream::Ac3, SpdifByteOrder::Big).unwrap();
    packetizer.write_frame(&[0x0B, 0x77, 0x01, 0x02]).unwrap();

    let mut out = vec![0u8; packetizer.processed_size()];
    packetizer.get_data(&mut out);

    assert_eq!(&out[..4], &[0xF8, 0x72, 0x4E, 0x1F]);
    assert_eq!(&out[8..12], &[0x0B, 0x77, 0x01, 0x02]);
}

#[test]
fn test_oversized_packet_rejected() {
    let mut packetizer = SpdifPacketizer::new(Bitstream::AacAdts, SpdifByteOrder::Little).unwrap();
    let payload = vec![0u8; AAC_BURST_BYTES - BURST_HEADER_LEN + 1];

    let err = packetizer.write_frame(&payload).unwrap_err();
    assert!(matches!(err, PacketizerError::BurstOverflow { .. }));
    assert_eq!(packetizer.processed_size(), 0);

    // Largest payload that fits
    let payload = vec![0u8; AAC_BURST_BYTES - BURST_HEADER_LEN];
    packetizer.write_frame(&payload).unwrap();
    assert_eq!(packetizer.processed_size(), AAC_BURST_BYTES);
}

#[test]
fn test_reuse_without_reset() {
    let mut packetizer = SpdifPacketizer::new(Bitstream::Ac3, SpdifByteOrder::Little).unwrap();
    packetizer.write_frame(&[0xAA; 100]).unwrap();
    packetizer.write_frame(&[0x0B, 0x77]).unwrap();

    let mut out = vec![0u8; packetizer.processed_size()];
    packetizer.get_data(&mut out);

    assert_eq!(words_le(&out[..8])[3], 16);
    assert_eq!(&out[8..10], &[0x77, 0x0B]);
    // Nothing left over from the first packet
    assert!(out[10..].iter().all(|&b| b == 0));
}

#[test]
fn test_get_data_short_destination() {
    let mut packetizer = SpdifPacketizer::new(Bitstream::Ac3, SpdifByteOrder::Little).unwrap();
    packetizer.write_frame(&[0x0B, 0x77]).unwrap();

    let mut out = [0u8; 4];
    assert_eq!(packetizer.get_data(&mut out), 4);
    assert_eq!(out, [0x72, 0xF8, 0x1F, 0x4E]);
}
