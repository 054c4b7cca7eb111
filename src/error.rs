//! Errors raised while generating a pipeline configuration.
//!
//! Every error here is fatal: generation either yields a complete
//! configuration or aborts.
use std::path::PathBuf;

use thiserror::Error;

/// Error generated while resolving the environment or compiling
/// the pipeline configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is absent or empty.
    #[error("environment variable {0} is not set")]
    MissingVariable(&'static str),

    /// The DLL manifest could not be read.
    #[error("unable to read DLL manifest {}", .path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The DLL manifest is not valid JSON.
    #[error("failed to parse JSON in DLL manifest {}", .path.display())]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A development configuration was requested without a manifest.
    #[error("a DLL manifest is required in development mode")]
    ManifestRequired,

    /// A rule matcher could not be compiled.
    #[error(transparent)]
    InvalidPattern(#[from] regex::Error),
}

impl ConfigError {
    /// Determine if this error was caused by the DLL manifest.
    pub fn is_manifest_error(&self) -> bool {
        matches!(
            self,
            ConfigError::ManifestRead { .. }
                | ConfigError::ManifestParse { .. }
                | ConfigError::ManifestRequired
        )
    }
}
