//! # Splitting
//!
//! Turns raw markdown into the flat token stream the section builder consumes.
//! Only the structure the section tree needs is recognised; everything else is
//! kept verbatim as text.
//!
//! ## Phases
//!
//! 1. **Line Classification** (`classify`): each line is classified into a
//!    `LineClass` holding local facts (blank, ATX heading, fence signature)
//! 2. **Token Construction** (`builder`): a `TokenBuilder` groups lines into
//!    `Header`, `Code` and `Text` tokens
//!
//! ## Key Invariants
//!
//! - Every source line lands in exactly one token
//! - Fenced code blocks are raw zones: no header or fence detection inside
//! - A code block is an attributes block iff its info string matches `^yaml .*@$`

pub mod builder;
pub mod classify;
pub mod kinds;
pub mod lines;
pub mod token;

use xi_rope::Rope;

pub use builder::TokenBuilder;
pub use classify::{LineClass, MarkdownLineClassifier};
pub use kinds::{CodeFence, FenceKind};
pub use token::{Code, Header, Text, Token, TokenAt};

use lines::lines_with_numbers;

/// Splits markdown text into located tokens.
pub fn split(text: &str) -> Vec<TokenAt> {
    split_rope(&Rope::from(text))
}

pub fn split_rope(rope: &Rope) -> Vec<TokenAt> {
    let classifier = MarkdownLineClassifier;
    let mut builder = TokenBuilder::new();

    for lr in lines_with_numbers(rope) {
        builder.push(classifier.classify(&lr));
    }

    builder.finish()
}
