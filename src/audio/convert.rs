//! Sample format normalization and planar conversion

use super::format::SampleFormat;

/// Bytes needed to hold `src_len` bytes of `format` once normalized to 16-bit
///
/// Trailing bytes that do not make up a whole sample are ignored. Returns 0 for
/// [`SampleFormat::Unknown`].
#[must_use]
pub fn canonical_len(src_len: usize, format: SampleFormat) -> usize {
    let sample_size = format.bytes_per_sample();
    if sample_size == 0 {
        return 0;
    }
    src_len / sample_size * SampleFormat::CANONICAL.bytes_per_sample()
}

/// Normalize interleaved samples into 16-bit signed little-endian
///
/// Channel interleaving and channel count are preserved. Canonical input is
/// copied byte for byte. Returns the number of bytes written to `dst`.
///
/// # Panics
///
/// Panics if `dst` is shorter than [`canonical_len`] of the input.
#[must_use]
pub fn normalize_into(src: &[u8], format: SampleFormat, dst: &mut [u8]) -> usize {
    let out_len = canonical_len(src.len(), format);
    assert!(
        dst.len() >= out_len,
        "destination holds {} bytes, {out_len} required",
        dst.len()
    );

    if format == SampleFormat::CANONICAL {
        dst[..out_len].copy_from_slice(&src[..out_len]);
        return out_len;
    }

    let sample_size = format.bytes_per_sample();
    for (bytes, out) in src
        .chunks_exact(sample_size)
        .zip(dst[..out_len].chunks_exact_mut(2))
    {
        out.copy_from_slice(&to_i16(bytes, format).to_le_bytes());
    }

    out_len
}

/// Normalize into a freshly allocated buffer
#[must_use]
pub fn normalize(src: &[u8], format: SampleFormat) -> Vec<u8> {
    let mut out = vec![0u8; canonical_len(src.len(), format)];
    let written = normalize_into(src, format, &mut out);
    out.truncate(written);
    out
}

#[allow(clippy::cast_possible_truncation)]
fn to_i16(bytes: &[u8], format: SampleFormat) -> i16 {
    match format {
        SampleFormat::U8 => (i16::from(bytes[0]) - 128) << 8,
        SampleFormat::I16 => i16::from_le_bytes([bytes[0], bytes[1]]),
        SampleFormat::I24 => i16::from_le_bytes([bytes[1], bytes[2]]),
        // Low 24 bits carry the sample, top byte is sign extension
        SampleFormat::I24Lsb => i16::from_le_bytes([bytes[1], bytes[2]]),
        SampleFormat::I32 => i16::from_le_bytes([bytes[2], bytes[3]]),
        SampleFormat::F32 => {
            let sample = f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
            from_float(sample)
        }
        SampleFormat::Unknown => 0,
    }
}

/// Quantize a float sample to 16-bit, clipping outside `[-1.0, 1.0)`
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn from_float(sample: f32) -> i16 {
    // NaN casts to 0
    (sample * 32_768.0).round().clamp(-32_768.0, 32_767.0) as i16
}

/// Split one frame of interleaved samples into per-channel planes
///
/// `planar` receives `channels` contiguous planes of `frame_size` samples in
/// channel order.
///
/// # Panics
///
/// Panics if either slice is shorter than `channels * frame_size`.
pub fn deinterleave(interleaved: &[i16], channels: usize, frame_size: usize, planar: &mut [i16]) {
    let total = channels * frame_size;
    assert!(interleaved.len() >= total, "interleaved input shorter than one frame");
    assert!(planar.len() >= total, "planar output shorter than one frame");

    for (index, frame) in interleaved[..total].chunks_exact(channels).enumerate() {
        for (channel, &sample) in frame.iter().enumerate() {
            planar[channel * frame_size + index] = sample;
        }
    }
}

/// Merge per-channel planes back into interleaved order
///
/// # Panics
///
/// Panics if either slice is shorter than `channels * frame_size`.
pub fn interleave(planar: &[i16], channels: usize, frame_size: usize, interleaved: &mut [i16]) {
    let total = channels * frame_size;
    assert!(planar.len() >= total, "planar input shorter than one frame");
    assert!(interleaved.len() >= total, "interleaved output shorter than one frame");

    for (channel, plane) in planar[..total].chunks_exact(frame_size).enumerate() {
        for (index, &sample) in plane.iter().enumerate() {
            interleaved[index * channels + channel] = sample;
        }
    }
}
