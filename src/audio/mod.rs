//! PCM handling: formats, normalization and staging buffers

pub mod buffer;
pub mod convert;
pub mod format;

#[cfg(test)]
mod tests;

pub use buffer::{DEFAULT_CHUNK_SIZE, StagingBuffer};
pub use convert::{canonical_len, deinterleave, from_float, interleave, normalize, normalize_into};
pub use format::{ChannelLayout, SampleFormat};
