use crate::audio::convert::*;
use crate::audio::format::SampleFormat;

fn f32_bytes(samples: &[f32]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

fn as_i16(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]))
        .collect()
}

#[test]
fn test_canonical_len() {
    assert_eq!(canonical_len(100, SampleFormat::I16), 100);
    assert_eq!(canonical_len(100, SampleFormat::F32), 50);
    assert_eq!(canonical_len(9, SampleFormat::I24), 6);
    assert_eq!(canonical_len(10, SampleFormat::U8), 20);
    // Partial trailing sample is ignored
    assert_eq!(canonical_len(7, SampleFormat::F32), 2);
    assert_eq!(canonical_len(100, SampleFormat::Unknown), 0);
}

#[test]
fn test_i16_is_byte_copy() {
    let input = vec![0x01, 0x80, 0xFF, 0x7F, 0x00, 0x00];
    assert_eq!(normalize(&input, SampleFormat::I16), input);
}

#[test]
fn test_float_quantization_within_one_lsb() {
    let amplitudes = [0.0f32, 0.5, -0.5, 0.25, -0.999, 0.123_456, 1.0 / 3.0];
    let out = as_i16(&normalize(&f32_bytes(&amplitudes), SampleFormat::F32));

    assert_eq!(out.len(), amplitudes.len());
    for (&a, &s) in amplitudes.iter().zip(out.iter()) {
        let expected = f64::from(a) * 32_768.0;
        assert!(
            (f64::from(s) - expected).abs() <= 1.0,
            "{a} quantized to {s}"
        );
    }
    assert_eq!(out[1], 16_384);
    assert_eq!(out[2], -16_384);
}

#[test]
fn test_float_clips_out_of_range() {
    let out = as_i16(&normalize(
        &f32_bytes(&[1.0, 2.5, -1.0, -7.0, f32::NAN]),
        SampleFormat::F32,
    ));
    assert_eq!(out, vec![i16::MAX, i16::MAX, i16::MIN, i16::MIN, 0]);
}

#[test]
fn test_integer_formats_keep_top_bits() {
    // 24-bit packed: 0x400000 (0.5), 0xC00000 (-0.5)
    let i24 = [0x00, 0x00, 0x40, 0x00, 0x00, 0xC0];
    assert_eq!(as_i16(&normalize(&i24, SampleFormat::I24)), vec![16_384, -16_384]);

    // 24 bits in 32: 0x007FFFFF, 0xFF800000
    let i24_lsb = [0xFF, 0xFF, 0x7F, 0x00, 0x00, 0x00, 0x80, 0xFF];
    assert_eq!(
        as_i16(&normalize(&i24_lsb, SampleFormat::I24Lsb)),
        vec![i16::MAX, i16::MIN]
    );

    let i32_input: Vec<u8> = [i32::MAX, i32::MIN, 0x1234_0000]
        .iter()
        .flat_map(|s| s.to_le_bytes())
        .collect();
    assert_eq!(
        as_i16(&normalize(&i32_input, SampleFormat::I32)),
        vec![i16::MAX, i16::MIN, 0x1234]
    );

    let u8_input = [0u8, 128, 255];
    assert_eq!(
        as_i16(&normalize(&u8_input, SampleFormat::U8)),
        vec![i16::MIN, 0, 127 << 8]
    );
}

#[test]
fn test_normalize_preserves_interleaving() {
    // Stereo: left rising, right falling
    let samples = [0.1f32, -0.1, 0.2, -0.2, 0.3, -0.3];
    let out = as_i16(&normalize(&f32_bytes(&samples), SampleFormat::F32));

    for frame in out.chunks_exact(2) {
        assert!(frame[0] > 0);
        assert_eq!(frame[0], -frame[1]);
    }
}

#[test]
#[should_panic(expected = "required")]
fn test_normalize_into_short_destination_panics() {
    let input = f32_bytes(&[0.0; 4]);
    let mut dst = [0u8; 4];
    let _ = normalize_into(&input, SampleFormat::F32, &mut dst);
}

#[test]
fn test_deinterleave_one_frame() {
    // 3 channels, 4 samples each; value = channel * 10 + index
    let interleaved: Vec<i16> = (0..4)
        .flat_map(|i| (0..3).map(move |c| c * 10 + i))
        .collect();
    let mut planar = vec![0i16; 12];

    deinterleave(&interleaved, 3, 4, &mut planar);

    assert_eq!(planar, vec![0, 1, 2, 3, 10, 11, 12, 13, 20, 21, 22, 23]);
}

#[test]
fn test_deinterleave_ignores_trailing_samples() {
    let interleaved = vec![1i16, 2, 3, 4, 99, 99];
    let mut planar = vec![0i16; 4];

    deinterleave(&interleaved, 2, 2, &mut planar);

    assert_eq!(planar, vec![1, 3, 2, 4]);
}

#[test]
fn test_interleave_inverts_deinterleave() {
    let interleaved: Vec<i16> = (0..12).collect();
    let mut planar = vec![0i16; 12];
    let mut back = vec![0i16; 12];

    deinterleave(&interleaved, 6, 2, &mut planar);
    interleave(&planar, 6, 2, &mut back);

    assert_eq!(back, interleaved);
}
