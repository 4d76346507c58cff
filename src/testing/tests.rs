use super::*;

fn params() -> CodecParams {
    CodecParams::new(192_000, 48_000, 2)
}

fn frame_of(samples: &[i16]) -> PlanarFrame<'_> {
    PlanarFrame::new(samples, 2, samples.len() / 2).unwrap()
}

#[test]
fn test_scripted_latency_holds_frames() {
    let script = CompressorScript::default().frame_size(4).latency(2);
    let mut compressor = ScriptedCompressor::open(script, &params()).unwrap();
    let samples = [1i16; 8];

    compressor.submit(&frame_of(&samples)).unwrap();
    assert!(compressor.receive().unwrap().is_none());
    compressor.submit(&frame_of(&samples)).unwrap();
    assert!(compressor.receive().unwrap().is_none());

    compressor.submit(&frame_of(&samples)).unwrap();
    let packet = compressor.receive().unwrap().unwrap();
    assert_eq!(scripted_frame_index(&packet.data), Some(0));
    assert_eq!(packet.len(), 64);
    assert!(compressor.receive().unwrap().is_none());
}

#[test]
fn test_scripted_failures_count_attempts() {
    let script = CompressorScript::default()
        .frame_size(4)
        .refuse_on_submit(0)
        .fail_on_submit(1);
    let mut compressor = ScriptedCompressor::open(script, &params()).unwrap();
    let samples = [0i16; 8];

    assert_eq!(compressor.submit(&frame_of(&samples)), Err(CompressorError::Again));
    assert!(matches!(
        compressor.submit(&frame_of(&samples)),
        Err(CompressorError::Failed(_))
    ));
    compressor.submit(&frame_of(&samples)).unwrap();

    // Only accepted frames are numbered
    let packet = compressor.receive().unwrap().unwrap();
    assert_eq!(scripted_frame_index(&packet.data), Some(0));
}

#[test]
fn test_scripted_packet_carries_sample_sum() {
    let script = CompressorScript::default().frame_size(2).packets_per_frame(2);
    let mut compressor = ScriptedCompressor::open(script, &params()).unwrap();

    compressor.submit(&frame_of(&[100, -30, 7, 3])).unwrap();
    let first = compressor.receive().unwrap().unwrap();
    let second = compressor.receive().unwrap().unwrap();

    assert_eq!(first, second);
    assert_eq!(&first.data[4..12], &80i64.to_be_bytes());
}

#[test]
fn test_scripted_rejects_open() {
    let script = CompressorScript::default().reject_open();
    assert!(matches!(
        ScriptedCompressor::open(script, &params()),
        Err(CompressorError::InvalidParameters(_))
    ));
}

#[test]
fn test_signal_helpers() {
    assert_eq!(silence_i16(6).len(), 12);
    assert_eq!(&ramp_i16(3), &[0, 0, 1, 0, 2, 0]);

    let sine = sine_f32(48, 2, 1000.0, 48_000, 0.5);
    assert_eq!(sine.len(), 48 * 2 * 4);
    // Channels carry the same value
    assert_eq!(&sine[8..12], &sine[12..16]);
    assert_eq!(scripted_frame_index(&[1, 2]), None);
}
