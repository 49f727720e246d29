//! Session pipeline errors.

use std::fmt;

/// Errors that can occur while loading, fixing or rendering a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Invalid session container: {0}")]
    Format(#[from] FormatError),

    #[error("Failed to parse {format} session: {source}")]
    Parse {
        format: &'static str,
        #[source]
        source: ParseError,
    },

    #[error("Failed to serialize {format} session: {source}")]
    Encode {
        format: &'static str,
        #[source]
        source: ParseError,
    },

    #[error("Failed to decompress session block: {0}")]
    Decompress(#[from] lz4_flex::block::DecompressError),

    #[error("Refusing to render an empty session")]
    EmptySession,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SessionError {
    /// Whether this error came from a damaged or foreign container.
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::Format(_))
    }

    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

/// Problems with the `mozLz40` container framing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("wrong header: {found}")]
    BadMagic { found: HeaderBytes },

    #[error("file is {length} bytes, shorter than the {minimum} byte header")]
    Truncated { length: usize, minimum: usize },

    #[error("decompressed {actual} bytes, header promised {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// Leading bytes of a rejected container, shown escaped in messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderBytes(pub Vec<u8>);

impl fmt::Display for HeaderBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0.escape_ascii())
    }
}

/// Underlying decode/encode error of a session payload.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// Friendly result alias for the session pipeline.
pub type Result<T, E = SessionError> = std::result::Result<T, E>;
