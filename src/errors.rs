use thiserror::Error;

/// Errors raised while loading a grouping configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The requested configuration id is not present in the registry.
    ///
    /// When loading a project's stored configuration this is recoverable:
    /// the loader substitutes the default configuration unless the caller
    /// asked for strict mode.
    #[error("unknown grouping config '{0}'")]
    NotFound(String),
    /// The persisted configuration dictionary is structurally broken (for
    /// example, missing the `id` field). Always surfaces; never silently
    /// replaced by a default.
    #[error("malformed configuration dictionary: {0}")]
    Malformed(String),
}

/// A fingerprinting rule source failed to parse.
#[derive(Debug, Error)]
#[error("invalid fingerprinting rule on line {line}: {reason}")]
pub struct InvalidRuleConfig {
    pub line: usize,
    pub reason: String,
}

/// An enhancement rule source or serialized blob failed to parse.
#[derive(Debug, Error)]
#[error("invalid enhancement config on line {line}: {reason}")]
pub struct InvalidEnhancerConfig {
    pub line: usize,
    pub reason: String,
}

impl InvalidEnhancerConfig {
    pub(crate) fn blob(reason: impl Into<String>) -> Self {
        InvalidEnhancerConfig { line: 0, reason: reason.into() }
    }
}
