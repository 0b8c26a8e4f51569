use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FenceKind {
    #[default]
    #[serde(rename = "```")]
    Backticks,
    #[serde(rename = "~~~")]
    Tildes,
}

impl FenceKind {
    pub fn marker(self) -> u8 {
        match self {
            FenceKind::Backticks => b'`',
            FenceKind::Tildes => b'~',
        }
    }
}

/// Local facts about a line that looks like a fence opener or closer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceSig {
    pub kind: FenceKind,
    /// Length of the marker run (at least three).
    pub len: usize,
    /// Everything after the marker run, trimmed.
    pub info: String,
}

pub struct CodeFence;

impl CodeFence {
    pub const MIN_LEN: usize = 3;
    pub const MAX_INDENT: usize = 3;

    /// Pattern an info string must match for the block to declare attributes.
    pub const ATTRIBUTES_INFO: &'static str = r"^yaml .*@$";

    pub fn sig(line: &str) -> Option<FenceSig> {
        let t = line.trim_end_matches(['\r', '\n']);
        let rest = t.trim_start_matches(' ');
        if t.len() - rest.len() > Self::MAX_INDENT {
            return None;
        }

        let kind = match rest.as_bytes().first()? {
            b'`' => FenceKind::Backticks,
            b'~' => FenceKind::Tildes,
            _ => return None,
        };
        let len = rest.bytes().take_while(|&b| b == kind.marker()).count();
        if len < Self::MIN_LEN {
            return None;
        }

        let info = rest[len..].trim();
        // An inline code span, not a fence.
        if kind == FenceKind::Backticks && info.contains('`') {
            return None;
        }

        Some(FenceSig {
            kind,
            len,
            info: info.to_string(),
        })
    }

    /// Whether `candidate` closes a block opened by `open`.
    pub fn closes(open: &FenceSig, candidate: Option<&FenceSig>) -> bool {
        matches!(
            candidate,
            Some(c) if c.kind == open.kind && c.len >= open.len && c.info.is_empty()
        )
    }

    /// Whether an info string marks the block as an attributes block.
    pub fn is_attributes_info(info: &str) -> bool {
        static ATTR_INFO: OnceLock<Regex> = OnceLock::new();
        ATTR_INFO
            .get_or_init(|| Regex::new(Self::ATTRIBUTES_INFO).expect("Invalid attributes regex"))
            .is_match(info.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn detect_backtick_fence() {
        let sig = CodeFence::sig("```rust").unwrap();
        assert_eq!(sig.kind, FenceKind::Backticks);
        assert_eq!(sig.len, 3);
        assert_eq!(sig.info, "rust");
    }

    #[test]
    fn detect_tilde_fence() {
        let sig = CodeFence::sig("~~~~").unwrap();
        assert_eq!(sig.kind, FenceKind::Tildes);
        assert_eq!(sig.len, 4);
        assert!(sig.info.is_empty());
    }

    #[test]
    fn no_fence() {
        assert_eq!(CodeFence::sig("hello"), None);
        assert_eq!(CodeFence::sig("``"), None);
        assert_eq!(CodeFence::sig("    ```"), None);
        assert_eq!(CodeFence::sig("``` `inline` ```"), None);
    }

    #[test]
    fn closes_matching_fence() {
        let open = CodeFence::sig("```yaml @").unwrap();
        assert!(CodeFence::closes(&open, CodeFence::sig("```").as_ref()));
        assert!(CodeFence::closes(&open, CodeFence::sig("`````").as_ref()));
    }

    #[test]
    fn does_not_close_mismatched_fence() {
        let open = CodeFence::sig("````").unwrap();
        assert!(!CodeFence::closes(&open, CodeFence::sig("~~~~").as_ref()));
        assert!(!CodeFence::closes(&open, CodeFence::sig("```").as_ref()));
        assert!(!CodeFence::closes(&open, CodeFence::sig("````rust").as_ref()));
        assert!(!CodeFence::closes(&open, None));
    }

    #[rstest]
    #[case("yaml @", true)]
    #[case("yaml config@", true)]
    #[case("yaml config @", true)]
    #[case("  yaml anything goes here@  ", true)]
    #[case("yaml", false)]
    #[case("yaml config", false)]
    #[case("yaml@", false)]
    #[case("json @", false)]
    #[case("yaml @ trailing", false)]
    fn attributes_info_strings(#[case] info: &str, #[case] expected: bool) {
        assert_eq!(CodeFence::is_attributes_info(info), expected);
    }
}
