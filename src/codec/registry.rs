//! Codec lookup by name

use std::collections::HashMap;
use std::fmt;

use super::{CodecParams, Compressor, CompressorError};

/// Builds an open compressor session from parameters
pub type CodecFactory =
    Box<dyn Fn(&CodecParams) -> Result<Box<dyn Compressor>, CompressorError> + Send + Sync>;

/// Named set of available compressors
pub struct CodecRegistry {
    factories: HashMap<String, CodecFactory>,
}

impl CodecRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Create a registry with the built-in codecs
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(super::passthrough::NAME, |params| {
            super::passthrough::PassthroughCompressor::open(params)
                .map(|c| Box::new(c) as Box<dyn Compressor>)
        });
        #[cfg(feature = "aac")]
        registry.register(super::aac_encoder::NAME, |params| {
            super::aac_encoder::AacCompressor::open(params)
                .map(|c| Box::new(c) as Box<dyn Compressor>)
        });
        registry
    }

    /// Register a codec, replacing any previous one with the same name
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&CodecParams) -> Result<Box<dyn Compressor>, CompressorError>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    /// Look up a codec factory
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&CodecFactory> {
        self.factories.get(name)
    }

    /// Check if a codec is registered
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered codec names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("codecs", &self.names())
            .finish()
    }
}
