//! Crate-wide error type.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CfgsError>;

// ---------------------------------------------------------------------------
// CfgsError
// ---------------------------------------------------------------------------

/// Errors produced while resolving paths, (de)serializing files and managing
/// cache directories.
///
/// Only the "file does not exist" case is ever recovered inside the crate
/// (reading a missing file yields empty contents). Every other I/O failure is
/// surfaced through [`CfgsError::Io`].
#[derive(Debug, Error)]
pub enum CfgsError {
    /// The application name contains characters that are unsafe in a path
    /// component.
    #[error("invalid characters in name {name:?}: \"{chars}\"")]
    InvalidName { name: String, chars: String },

    /// The requested format is not one of the supported formats.
    #[error("unknown format: {0:?}")]
    UnknownFormat(String),

    /// A cache entry name that would escape the flat cache namespace.
    #[error("invalid cache filename {0:?}: subdirectories are not allowed in caches")]
    InvalidFilename(String),

    /// The text of a file could not be parsed in its format.
    #[error("failed to parse {format} contents: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    /// The in-memory contents cannot be expressed in the target format.
    #[error("failed to serialize {format} contents: {message}")]
    Serialize {
        format: &'static str,
        message: String,
    },

    /// The library settings file could not be read or written.
    #[error("invalid settings: {message}")]
    Settings { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CfgsError {
    pub(crate) fn parse(format: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Parse {
            format,
            message: err.to_string(),
        }
    }

    pub(crate) fn serialize(format: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Serialize {
            format,
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_convert_with_question_mark() {
        fn fails() -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope"))?;
            Ok(())
        }

        let err = fails().expect_err("should fail");
        assert!(matches!(err, CfgsError::Io(ref e) if e.kind() == std::io::ErrorKind::PermissionDenied));
    }

    #[test]
    fn invalid_name_message_lists_characters() {
        let err = CfgsError::InvalidName {
            name: "a/b".into(),
            chars: "/".into(),
        };
        assert_eq!(err.to_string(), "invalid characters in name \"a/b\": \"/\"");
    }
}
