
use crate::codec::CodecRegistry;
use crate::spdif::{AC3_BURST_BYTES, BURST_HEADER_LEN};
use crate::testing::{CompressorScript, scripted_frame_index};

/// Registry with the built-ins plus `script` registered as `scripted`
fn registry_with(script: CompressorScript) -> CodecRegistry {
    let mut registry = CodecRegistry::with_defaults();
    script.register(&mut registry, "scripted");
    registry
}

/// Frame index carried by each little-endian AC-3 burst in `stream`
fn burst_frame_indices(stream: &[u8]) -> Vec<u32> {
    stream
        .chunks(AC3_BURST_BYTES)
        .filter_map(|burst| {
            let payload = burst.get(BURST_HEADER_LEN..BURST_HEADER_LEN + 4)?;
            scripted_frame_index(&[payload[1], payload[0], payload[3], payload[2]])
        })
        .collect()
}
