pub mod attributes;
pub mod error;
pub mod io;
pub mod section;
pub mod splitting;

// Re-export key types for easier usage
pub use attributes::{Attributes, DecodeFailure};
pub use error::{ParseError, PlainError};
pub use io::IoError;
pub use section::{PlainSection, Section, SectionBuilder, SectionId, SectionTree, render_outline};
pub use splitting::{Code, Header, Text, Token, TokenAt};
