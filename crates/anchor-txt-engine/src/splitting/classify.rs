use super::{
    kinds::{AtxHeading, CodeFence, FenceSig},
    lines::LineRef,
    token::Header,
};

/// Classification of a single line containing only local facts.
///
/// This is phase 1 of splitting: each line is classified independently
/// without reference to surrounding context. Whether a header or fence is
/// honoured depends on the builder's state (inside a fence, nothing is).
#[derive(Debug, Clone)]
pub struct LineClass {
    /// 1-based source line number.
    pub number: usize,
    /// Line text with the newline stripped.
    pub text: String,
    /// Whether the line is blank (whitespace only).
    pub is_blank: bool,
    /// If the line is an ATX heading.
    pub header: Option<Header>,
    /// If the line looks like a fence opener/closer.
    pub fence_sig: Option<FenceSig>,
}

/// Classifies individual lines for the splitting phase.
pub struct MarkdownLineClassifier;

impl MarkdownLineClassifier {
    pub fn classify(&self, lr: &LineRef) -> LineClass {
        let trimmed = lr.text.trim_end_matches(['\r', '\n']);

        LineClass {
            number: lr.number,
            text: trimmed.to_string(),
            is_blank: trimmed.trim().is_empty(),
            header: AtxHeading::parse(trimmed),
            fence_sig: CodeFence::sig(trimmed),
        }
    }
}
