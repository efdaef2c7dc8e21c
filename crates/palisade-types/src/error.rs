//! Error types shared across all Palisade crates.

/// Errors that can occur across the Palisade core.
///
/// Each variant corresponds to a different subsystem: configuration
/// loading, permission compilation, or plugin registration. Soft match
/// failures and permission denials are *not* errors and never appear
/// here; they are ordinary negative results in the matcher and engine.
#[derive(Debug, thiserror::Error)]
pub enum PalisadeError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("permission rule error: {0}")]
    Permission(String),

    #[error("plugin registration error: {0}")]
    Registration(String),
}
