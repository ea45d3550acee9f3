//! Error types for the diff crate.

/// Errors raised while building comparison settings.
///
/// Comparing values never fails; divergence is reported as data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A path format name other than `structured`, `bracket` or `dot`.
    #[error("unknown path format '{0}': expected 'structured' or 'dot'")]
    UnknownPathFormat(String),

    /// A settings document could not be parsed.
    #[error("invalid compare options: {0}")]
    Parse(String),
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
