use crate::splitting::token::Header;

/// ATX heading syntax (`#` through `######`).
pub struct AtxHeading;

impl AtxHeading {
    pub const MARKER: u8 = b'#';
    pub const MAX_LEVEL: usize = 6;
    pub const MAX_INDENT: usize = 3;

    /// Parses a line as an ATX heading.
    ///
    /// The marker run must be followed by a space, a tab or the end of the
    /// line. A closing run of `#` is dropped when separated from the title by
    /// whitespace.
    pub fn parse(line: &str) -> Option<Header> {
        let t = line.trim_end_matches(['\r', '\n']);
        let rest = t.trim_start_matches(' ');
        if t.len() - rest.len() > Self::MAX_INDENT {
            return None;
        }

        let level = rest.bytes().take_while(|&b| b == Self::MARKER).count();
        if level == 0 || level > Self::MAX_LEVEL {
            return None;
        }

        let after = &rest[level..];
        if !after.is_empty() && !after.starts_with([' ', '\t']) {
            return None;
        }

        Some(Header {
            level: u8::try_from(level).ok()?,
            text: Self::strip_closing(after.trim()).to_string(),
        })
    }

    fn strip_closing(title: &str) -> &str {
        let without = title.trim_end_matches('#');
        if without.is_empty() {
            return without;
        }
        if without.ends_with([' ', '\t']) {
            without.trim_end()
        } else {
            title
        }
    }
}
