pub mod code_fence;
pub mod heading;

pub use code_fence::{CodeFence, FenceKind, FenceSig};
pub use heading::AtxHeading;
