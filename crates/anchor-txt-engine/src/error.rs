use crate::attributes::DecodeFailure;

/// A fatal error while building a section tree from markdown.
///
/// Parsing is a pure function of its input: retrying with the same text
/// reproduces the same error.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("{document}:{line}: invalid attributes in section `{section}`: {source}")]
    AttributeDecode {
        document: String,
        /// Title path of the section the attributes belonged to.
        section: String,
        line: usize,
        /// The YAML text that failed to decode.
        payload: String,
        source: DecodeFailure,
    },

    #[error("{document}:{line}: header level must be at least 1, found {level}")]
    Structure {
        document: String,
        line: usize,
        level: u8,
    },
}

/// A fatal error while rebuilding a section tree from its plain form.
#[derive(Debug, thiserror::Error)]
pub enum PlainError {
    #[error("expected a `{expected}` node, found `{found}`")]
    DeserializeType {
        expected: &'static str,
        found: String,
    },

    #[error("invalid section structure at `{path}`: {reason}")]
    Structure { path: String, reason: String },

    /// An attribute value JSON cannot hold without changing it.
    #[error("section `{path}` cannot be written as JSON: {reason}")]
    Unrepresentable { path: String, reason: String },

    #[error("plain form JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("plain form YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
