use std::io;

use thiserror::Error;

/// Errors raised while decoding an index archive.
///
/// Every variant is fatal for the whole resolution: a source that cannot be
/// decoded completely must not contribute a partial answer.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("not a gzip stream (bad compression header)")]
    NotGzip,

    #[error("index archive is truncated")]
    Truncated,

    #[error("index archive is corrupt: {0}")]
    Corrupt(String),

    #[error("archive has no `{member}` member")]
    MemberNotFound { member: String },

    #[error("record exceeds {limit} bytes")]
    RecordTooLarge { limit: usize },

    #[error("record {record}: {source}")]
    Field {
        record: usize,
        #[source]
        source: FieldError,
    },

    #[error("I/O error: {0}")]
    Io(#[source] io::Error),
}

impl IndexError {
    /// Classify an I/O error surfaced by the decompression or tar layers.
    pub(crate) fn from_decode(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => IndexError::Truncated,
            // flate2 uses `InvalidInput` for bad deflate data and checksums,
            // tar uses `Other` for broken headers and framing
            io::ErrorKind::InvalidData | io::ErrorKind::InvalidInput | io::ErrorKind::Other => {
                IndexError::Corrupt(err.to_string())
            }
            _ => IndexError::Io(err),
        }
    }
}

/// Errors raised while mapping one record onto a [`PackageEntry`](super::PackageEntry).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("malformed line {line:?}")]
    MalformedLine { line: String },

    #[error("unknown key: {key}")]
    UnknownKey { key: char },

    #[error("value of `{key}` is not valid UTF-8")]
    InvalidText { key: char },

    #[error("invalid integer {value:?} for `{key}`")]
    InvalidInteger { key: char, value: String },

    #[error("integer {value} would overflow field `{key}`")]
    Overflow { key: char, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_error_kind_only() {
        let eof = io::Error::new(io::ErrorKind::UnexpectedEof, "whatever");
        assert!(matches!(IndexError::from_decode(eof), IndexError::Truncated));

        // Message text mentioning truncation does not change the class.
        let other = io::Error::other("unexpected EOF during header");
        assert!(matches!(IndexError::from_decode(other), IndexError::Corrupt(_)));

        let checksum = io::Error::new(io::ErrorKind::InvalidInput, "corrupt gzip stream");
        assert!(matches!(IndexError::from_decode(checksum), IndexError::Corrupt(_)));

        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "truncated");
        assert!(matches!(IndexError::from_decode(denied), IndexError::Io(_)));
    }
}
