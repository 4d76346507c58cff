//! Encode pipeline: frame driver and public facade

mod digital;
mod driver;

#[cfg(test)]
mod tests;

pub use digital::DigitalEncoder;
pub use driver::{EncoderState, FrameEncoder};
