use salt2type_model::RegistryError;
use thiserror::Error;

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors that abort an extraction run
///
/// A failed lookup during reconciliation is not an error; resolvers return `None`.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// A source line matched none of the recognized shapes
    #[error("Unsupported line {line}: {text}")]
    UnrecognizedConstruct { line: usize, text: String },

    /// A multi-line construct never reached its terminator
    #[error("Could not find match for '{terminator}' after line {start}")]
    UnterminatedBlock {
        start: usize,
        terminator: &'static str,
    },

    /// The documentation export has a shape the extractor does not know
    #[error("Unsupported documentation shape: {0}")]
    UnrecognizedDocument(String),

    /// The documentation export is not well-formed XML
    #[error("Invalid documentation XML: {0}")]
    InvalidDocument(#[from] roxmltree::Error),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The fused model could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractError {
    /// Unrecognized source line; `index` is 0-based
    pub fn unrecognized(index: usize, text: impl Into<String>) -> Self {
        Self::UnrecognizedConstruct {
            line: index + 1,
            text: text.into(),
        }
    }

    /// Unterminated block opened at 0-based `index`
    pub const fn unterminated(index: usize, terminator: &'static str) -> Self {
        Self::UnterminatedBlock {
            start: index + 1,
            terminator,
        }
    }

    pub fn document(msg: impl Into<String>) -> Self {
        Self::UnrecognizedDocument(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// True for errors caused by the input not matching the fixed grammar
    pub const fn is_grammar_mismatch(&self) -> bool {
        matches!(
            self,
            Self::UnrecognizedConstruct { .. }
                | Self::UnterminatedBlock { .. }
                | Self::UnrecognizedDocument(_)
        )
    }
}
