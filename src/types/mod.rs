//! Configuration types

mod config;

#[cfg(test)]
mod tests;

pub use config::{EncoderConfig, EncoderConfigBuilder, EncoderSettings, SettingsProvider};
