use serde::{Deserialize, Serialize};

use super::kinds::FenceKind;

/// An ATX header line (`# Title`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Number of `#` markers (1 for top-level).
    pub level: u8,
    /// Header text without markers or the optional closing `#` run.
    pub text: String,
}

/// A fenced code block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Code {
    /// Which fence character opened the block.
    #[serde(default)]
    pub fence: FenceKind,
    /// Info string following the opening fence, trimmed.
    #[serde(default)]
    pub info: String,
    /// Lines between the fences, newlines stripped.
    pub lines: Vec<String>,
    /// Whether the info string marks this block as attribute YAML (`yaml ...@`).
    #[serde(default)]
    pub is_attributes: bool,
}

impl Code {
    /// The block body joined back into a single string.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// A run of lines that are neither headers nor fenced code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    /// Source lines, newlines stripped. Blank lines are kept.
    pub raw: Vec<String>,
}

/// One item of the flat token stream produced by [`split`](super::split).
///
/// The serde representation is the token's plain form, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum Token {
    Header(Header),
    Code(Code),
    Text(Text),
}

impl Token {
    /// The `type` tag used in the plain form.
    pub fn kind(&self) -> &'static str {
        match self {
            Token::Header(_) => "HEADER",
            Token::Code(_) => "CODE",
            Token::Text(_) => "TEXT",
        }
    }
}

/// A token together with the 1-based source line it starts on.
///
/// The line is used for error locations only and never takes part in
/// token equality or the plain form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAt {
    pub line: usize,
    pub token: Token,
}

impl TokenAt {
    pub fn new(line: usize, token: impl Into<Token>) -> Self {
        Self {
            line,
            token: token.into(),
        }
    }
}

impl From<Header> for Token {
    fn from(header: Header) -> Self {
        Token::Header(header)
    }
}

impl From<Code> for Token {
    fn from(code: Code) -> Self {
        Token::Code(code)
    }
}

impl From<Text> for Token {
    fn from(text: Text) -> Self {
        Token::Text(text)
    }
}
