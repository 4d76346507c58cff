use super::*;
use crate::spdif::SpdifByteOrder;

#[test]
fn test_config_defaults() {
    let config = EncoderConfig::default();

    assert_eq!(config.settings.codec, "aac");
    assert_eq!(config.settings.bitrate, 192_000);
    assert_eq!(config.settings.sample_rate, 48_000);
    assert_eq!(config.settings.channels, 2);
    assert_eq!(config.input_chunk_bytes, 131_072);
    assert_eq!(config.output_chunk_bytes, 131_072);
    assert!(config.max_buffer_bytes.is_none());
    assert_eq!(config.scratch_samples, 65_536);
    assert_eq!(config.byte_order, SpdifByteOrder::Little);
}

#[test]
fn test_config_builder() {
    let config = EncoderConfig::builder()
        .codec("passthrough-test")
        .bitrate(448_000)
        .sample_rate(48_000)
        .channels(6)
        .chunk_bytes(4096)
        .max_buffer_bytes(1 << 20)
        .scratch_samples(9216)
        .byte_order(SpdifByteOrder::Big)
        .build();

    assert_eq!(config.settings.codec, "passthrough-test");
    assert_eq!(config.settings.channels, 6);
    assert_eq!(config.input_chunk_bytes, 4096);
    assert_eq!(config.output_chunk_bytes, 4096);
    assert_eq!(config.max_buffer_bytes, Some(1 << 20));
    assert_eq!(config.scratch_samples, 9216);
    assert_eq!(config.byte_order, SpdifByteOrder::Big);
}

#[test]
fn test_config_from_json_partial() {
    let config = EncoderConfig::from_json(
        r#"{ "codec": "passthrough-test", "bitrate": 448000, "channels": 6, "byte_order": "big" }"#,
    )
    .unwrap();

    assert_eq!(config.settings.codec, "passthrough-test");
    assert_eq!(config.settings.bitrate, 448_000);
    assert_eq!(config.settings.channels, 6);
    // Untouched fields keep defaults
    assert_eq!(config.settings.sample_rate, 48_000);
    assert_eq!(config.input_chunk_bytes, 131_072);
    assert_eq!(config.byte_order, SpdifByteOrder::Big);
}

#[test]
fn test_config_json_roundtrip() {
    let config = EncoderConfig::builder().codec("aac").max_buffer_bytes(65_536).build();
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(EncoderConfig::from_json(&json).unwrap(), config);
}

#[test]
fn test_config_from_json_malformed() {
    assert!(EncoderConfig::from_json("{ \"bitrate\": \"fast\" }").is_err());
}

#[test]
fn test_settings_provider() {
    let config = EncoderConfig::builder().codec("passthrough-test").build();
    assert_eq!(config.encoder_settings(), config.settings);

    let settings = EncoderSettings::default();
    assert_eq!(settings.encoder_settings(), settings);
}
