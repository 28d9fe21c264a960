//! Configuration types for design conversion.
//!
//! This module provides configuration structures that control how a raw
//! design is resolved and how the compacted result is written. All types
//! implement [`serde::Deserialize`] for loading from external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining resolve and output settings.
//! - [`ResolveConfig`] - Policies for duplicate identifiers and dangling references.
//! - [`OutputConfig`] - Controls compression and pretty-printing of the encoded design.
//!
//! # Example
//!
//! ```
//! # use layoutdb::config::AppConfig;
//! # use layoutdb::graph::{DanglingPolicy, DuplicatePolicy};
//! let config = AppConfig::default();
//! assert_eq!(config.resolve().on_duplicate(), DuplicatePolicy::Reject);
//! assert_eq!(config.resolve().on_dangling(), DanglingPolicy::Abort);
//! assert!(!config.output().compress());
//! ```

use serde::Deserialize;

use layoutdb_graph::{DanglingPolicy, DuplicatePolicy, ResolveOptions};

/// Top-level configuration combining resolve and output settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Resolve configuration section.
    #[serde(default)]
    resolve: ResolveConfig,

    /// Output configuration section.
    #[serde(default)]
    output: OutputConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified sections.
    ///
    /// # Arguments
    ///
    /// * `resolve` - Policies applied while resolving references.
    /// * `output` - Encoding options for the compacted design.
    pub fn new(resolve: ResolveConfig, output: OutputConfig) -> Self {
        Self { resolve, output }
    }

    /// Returns the resolve configuration.
    pub fn resolve(&self) -> &ResolveConfig {
        &self.resolve
    }

    /// Returns the output configuration.
    pub fn output(&self) -> &OutputConfig {
        &self.output
    }

    /// Replaces the output configuration, keeping the resolve section.
    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.output = output;
        self
    }
}

/// Policies for input the parser should never emit.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ResolveConfig {
    /// What to do when two records of one identity space share an identifier.
    #[serde(default)]
    on_duplicate: DuplicatePolicy,

    /// What to do when a reference names no existing record.
    #[serde(default)]
    on_dangling: DanglingPolicy,
}

impl ResolveConfig {
    /// Creates a new [`ResolveConfig`].
    ///
    /// # Arguments
    ///
    /// * `on_duplicate` - Duplicate identifier policy.
    /// * `on_dangling` - Dangling reference policy.
    pub fn new(on_duplicate: DuplicatePolicy, on_dangling: DanglingPolicy) -> Self {
        Self {
            on_duplicate,
            on_dangling,
        }
    }

    pub fn on_duplicate(&self) -> DuplicatePolicy {
        self.on_duplicate
    }

    pub fn on_dangling(&self) -> DanglingPolicy {
        self.on_dangling
    }

    /// Returns the [`ResolveOptions`] these policies describe.
    pub fn options(&self) -> ResolveOptions {
        ResolveOptions::new(self.on_duplicate, self.on_dangling)
    }
}

/// Encoding options for the compacted design.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    /// Gzip the encoded JSON.
    #[serde(default)]
    compress: bool,

    /// Indent the encoded JSON.
    #[serde(default)]
    pretty: bool,
}

impl OutputConfig {
    pub fn new(compress: bool, pretty: bool) -> Self {
        Self { compress, pretty }
    }

    pub fn compress(&self) -> bool {
        self.compress
    }

    pub fn pretty(&self) -> bool {
        self.pretty
    }

    /// Returns a copy with compression switched on if `compress` is set.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress |= compress;
        self
    }

    /// Returns a copy with pretty-printing switched on if `pretty` is set.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty |= pretty;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_follow_policies() {
        let config = ResolveConfig::new(DuplicatePolicy::LastWins, DanglingPolicy::MarkMissing);
        let options = config.options();

        assert_eq!(options.on_duplicate(), DuplicatePolicy::LastWins);
        assert_eq!(options.on_dangling(), DanglingPolicy::MarkMissing);
    }

    #[test]
    fn test_output_overrides_only_switch_on() {
        let output = OutputConfig::new(true, false)
            .with_compress(false)
            .with_pretty(true);

        assert!(output.compress());
        assert!(output.pretty());
    }
}
