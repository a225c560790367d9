//! Error types for vocabulary construction, encoding and corpus I/O.

use thiserror::Error;

/// Errors surfaced by the codec and its I/O collaborators.
///
/// A SMILES string that fails to parse is not an error; validity is reported
/// as a plain `bool` by the oracle.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Unsupported corpus extension: {0:?} (expected .smi or .csv)")]
    UnsupportedExtension(String),

    #[error("Missing column {0:?} in corpus header")]
    MissingColumn(String),

    #[error("Unknown character: {0:?}")]
    UnknownChar(char),

    #[error("Unknown code: {0}")]
    UnknownCode(u32),

    #[error("Reserved character {0:?} collides with the vocabulary")]
    ReservedChar(char),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(Error::UnknownChar('Z').to_string(), "Unknown character: 'Z'");
        assert_eq!(Error::UnknownCode(42).to_string(), "Unknown code: 42");
        assert!(Error::UnsupportedExtension("txt".into())
            .to_string()
            .contains("\"txt\""));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
