//! Error types for target resolution.
//!
//! This module defines [`TargetError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! Every variant except the I/O and parse wrappers is a fatal resolution
//! condition: configuration halts instead of degrading to a flag set that
//! claims the target has no architecture or no byte order.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for target resolution.
#[derive(Debug, Error)]
pub enum TargetError {
    /// No detection strategy applies and no CPU override was pre-declared.
    #[error(
        "unknown toolchain: no detection strategy applies and no TARGET_CPU_* override is set \
         (declare one, e.g. -D TARGET_CPU_MIPS=1)"
    )]
    UnknownToolchain,

    /// The toolchain reported a byte order that is neither little nor big endian.
    #[error("unrecognized byte order from {toolchain}: {value}")]
    UnrecognizedByteOrder { toolchain: String, value: String },

    /// The toolchain matched but its CPU primitives name no known architecture.
    #[error("unsupported architecture for {toolchain}: {arch}")]
    UnsupportedArchitecture { toolchain: String, arch: String },

    /// Manual overrides contradict each other.
    #[error("conflicting overrides: {message}")]
    ConflictingOverrides { message: String },

    /// A flag name that is not part of the registry.
    #[error("unknown flag: {name}")]
    UnknownFlag { name: String },

    /// A target triple that cannot be split into its components.
    #[error("invalid target triple '{triple}': {message}")]
    InvalidTriple { triple: String, message: String },

    /// Environment description file not found.
    #[error("Environment file not found: {path}")]
    EnvironmentNotFound { path: PathBuf },

    /// Failed to parse an environment description file.
    #[error("Failed to parse environment at {path}: {message}")]
    EnvironmentParseError { path: PathBuf, message: String },

    /// A Cargo build-script variable needed to describe the target is missing.
    #[error("missing Cargo variable {name} (is this running inside a build script?)")]
    MissingCargoVar { name: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TargetError {
    /// Whether this error halts resolution itself (as opposed to failing to
    /// read or parse the input describing the environment).
    pub fn is_resolution_failure(&self) -> bool {
        matches!(
            self,
            Self::UnknownToolchain
                | Self::UnrecognizedByteOrder { .. }
                | Self::UnsupportedArchitecture { .. }
                | Self::ConflictingOverrides { .. }
                | Self::UnknownFlag { .. }
        )
    }
}

/// Result type alias for target resolution.
pub type Result<T> = std::result::Result<T, TargetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_toolchain_mentions_override() {
        let msg = TargetError::UnknownToolchain.to_string();
        assert!(msg.contains("unknown toolchain"));
        assert!(msg.contains("TARGET_CPU_"));
    }

    #[test]
    fn unrecognized_byte_order_displays_value() {
        let err = TargetError::UnrecognizedByteOrder {
            toolchain: "clang".into(),
            value: "__ORDER_PDP_ENDIAN__".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("clang"));
        assert!(msg.contains("__ORDER_PDP_ENDIAN__"));
    }

    #[test]
    fn unsupported_architecture_displays_arch() {
        let err = TargetError::UnsupportedArchitecture {
            toolchain: "metrowerks".into(),
            arch: "none of __POWERPC__, __INTEL__".into(),
        };
        assert!(err.to_string().contains("__POWERPC__"));
    }

    #[test]
    fn unknown_flag_displays_name() {
        let err = TargetError::UnknownFlag {
            name: "TARGET_OS_BEOS".into(),
        };
        assert!(err.to_string().contains("TARGET_OS_BEOS"));
    }

    #[test]
    fn environment_parse_error_displays_path_and_message() {
        let err = TargetError::EnvironmentParseError {
            path: PathBuf::from("/env.yml"),
            message: "invalid syntax".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/env.yml"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn resolution_failures_are_classified() {
        assert!(TargetError::UnknownToolchain.is_resolution_failure());
        assert!(TargetError::ConflictingOverrides {
            message: "x".into()
        }
        .is_resolution_failure());
        assert!(!TargetError::EnvironmentNotFound {
            path: PathBuf::from("/nope.yml")
        }
        .is_resolution_failure());
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: TargetError = io_err.into();
        assert!(matches!(err, TargetError::Io(_)));
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_error() -> Result<()> {
            Err(TargetError::UnknownToolchain)
        }
        assert!(returns_error().is_err());
    }
}
