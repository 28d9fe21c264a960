//! LayoutDB - a layout database for parsed LEF/DEF designs.
//!
//! Takes the flat record dump a LEF/DEF parser produces, links every
//! cross-reference into a navigable graph, and compacts that graph into a
//! tree that serializes to JSON without cycles or duplication.

pub mod config;
pub mod encode;
pub mod files;

mod error;

pub use layoutdb_core as core;
pub use layoutdb_graph as graph;

pub use error::LayoutDbError;

use std::{fs, path::Path};

use log::{debug, info, trace};

use layoutdb_core::design::{Design, RawDesign};
use layoutdb_graph::CompactDesign;

use config::AppConfig;

/// Builder for converting parsed designs.
///
/// This provides an API for taking a design through the resolve, compact
/// and encode stages.
///
/// # Examples
///
/// ```rust,no_run
/// use layoutdb::{DesignBuilder, config::AppConfig};
///
/// let builder = DesignBuilder::new(AppConfig::default());
///
/// // Read a parser dump
/// let raw = builder.read_raw_file("gcd.raw.json")
///     .expect("Failed to read");
///
/// // Resolve and compact it
/// let compacted = builder.convert(&raw)
///     .expect("Failed to convert");
///
/// // Encode the compacted tree
/// let bytes = builder.encode(&compacted)
///     .expect("Failed to encode");
///
/// // Or use default config
/// let builder = DesignBuilder::default();
/// ```
#[derive(Debug, Default)]
pub struct DesignBuilder {
    config: AppConfig,
}

impl DesignBuilder {
    /// Create a new design builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration including resolve and output settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration the builder was created with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a parser dump into a raw design.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutDbError::Input`] if the text is not a raw design.
    pub fn read_raw(&self, source: &str) -> Result<RawDesign, LayoutDbError> {
        self.read_raw_bytes(source.as_bytes())
    }

    /// Parse a parser dump, plain or gzipped, into a raw design.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutDbError::Io`] for a broken gzip stream and
    /// [`LayoutDbError::Input`] if the bytes are not a raw design.
    pub fn read_raw_bytes(&self, bytes: &[u8]) -> Result<RawDesign, LayoutDbError> {
        info!(bytes = bytes.len(); "Reading raw design");
        let raw = encode::decode_raw(bytes)?;
        debug!(
            design:? = raw.name,
            instances = raw.instances.len(),
            nets = raw.nets.len();
            "Raw design read"
        );
        Ok(raw)
    }

    /// Read a parser dump from a file.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutDbError::Io`] if the file cannot be read, otherwise
    /// as [`read_raw_bytes`](Self::read_raw_bytes).
    pub fn read_raw_file(&self, path: impl AsRef<Path>) -> Result<RawDesign, LayoutDbError> {
        let bytes = fs::read(path.as_ref())?;
        self.read_raw_bytes(&bytes)
    }

    /// Link every reference of a raw design into a navigable graph.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutDbError::Graph`] for duplicate identifiers, dangling
    /// references or a raw design without name or regions, as the configured
    /// policies decide.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use layoutdb::DesignBuilder;
    ///
    /// let builder = DesignBuilder::default();
    /// let raw = builder.read_raw_file("gcd.raw.json").expect("Failed to read");
    /// let design = builder.resolve(&raw).expect("Failed to resolve");
    /// assert!(design.nets.iter().all(|net| net.pins.iter().all(|pin| pin.is_full())));
    /// ```
    pub fn resolve(&self, raw: &RawDesign) -> Result<Design, LayoutDbError> {
        let options = self.config.resolve().options();
        info!(
            on_duplicate:% = options.on_duplicate(),
            on_dangling:% = options.on_dangling();
            "Resolving design"
        );

        let design = layoutdb_graph::resolve(raw, options)?;

        debug!(records = design.counts().total(); "Design resolved");
        Ok(design)
    }

    /// Compact a resolved design into a tree without full references.
    pub fn compact(&self, design: &Design) -> CompactDesign {
        layoutdb_graph::compact(design)
    }

    /// Resolve then compact. Never returns a partial design.
    ///
    /// # Errors
    ///
    /// As [`resolve`](Self::resolve).
    pub fn convert(&self, raw: &RawDesign) -> Result<CompactDesign, LayoutDbError> {
        let design = self.resolve(raw)?;
        let compacted = self.compact(&design);
        trace!(counts:? = compacted.design().counts(); "Design converted");
        Ok(compacted)
    }

    /// Encode a compacted design with the configured output options.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutDbError::Encode`] if serialization fails.
    pub fn encode(&self, design: &CompactDesign) -> Result<Vec<u8>, LayoutDbError> {
        encode::encode(design, self.config.output())
    }
}
