use tracing::warn;

use super::{
    classify::LineClass,
    kinds::{CodeFence, FenceSig},
    token::{Code, Text, Token, TokenAt},
};

#[derive(Debug)]
enum LeafState {
    None,
    Text {
        start: usize,
        raw: Vec<String>,
    },
    Fence {
        start: usize,
        sig: FenceSig,
        lines: Vec<String>,
    },
}

/// Groups classified lines into the flat `Header | Code | Text` stream.
pub struct TokenBuilder {
    leaf: LeafState,
    out: Vec<TokenAt>,
}

impl TokenBuilder {
    pub fn new() -> Self {
        Self {
            leaf: LeafState::None,
            out: vec![],
        }
    }

    pub fn push(&mut self, c: LineClass) {
        if self.in_fence() {
            self.consume_fence_line(c);
            return;
        }

        if let Some(sig) = c.fence_sig {
            self.flush_text();
            self.leaf = LeafState::Fence {
                start: c.number,
                sig,
                lines: vec![],
            };
            return;
        }

        if let Some(header) = c.header {
            self.flush_text();
            self.out.push(TokenAt::new(c.number, header));
            return;
        }

        self.extend_text(c);
    }

    pub fn finish(mut self) -> Vec<TokenAt> {
        // EOF flush
        self.flush_text();
        if let LeafState::Fence { start, .. } = self.leaf {
            warn!(line = start, "unterminated code fence runs to end of document");
        }
        self.flush_fence();
        self.out
    }

    fn in_fence(&self) -> bool {
        matches!(self.leaf, LeafState::Fence { .. })
    }

    fn consume_fence_line(&mut self, c: LineClass) {
        let LeafState::Fence { sig, lines, .. } = &mut self.leaf else {
            return;
        };

        if CodeFence::closes(sig, c.fence_sig.as_ref()) {
            self.flush_fence();
        } else {
            lines.push(c.text);
        }
    }

    fn extend_text(&mut self, c: LineClass) {
        match &mut self.leaf {
            LeafState::Text { raw, .. } => raw.push(c.text),
            _ => {
                self.leaf = LeafState::Text {
                    start: c.number,
                    raw: vec![c.text],
                };
            }
        }
    }

    fn flush_text(&mut self) {
        let prev = std::mem::replace(&mut self.leaf, LeafState::None);
        if let LeafState::Text { start, raw } = prev {
            self.out.push(TokenAt::new(start, Text { raw }));
        } else {
            self.leaf = prev; // put back non-text leaf (e.g. fence)
        }
    }

    fn flush_fence(&mut self) {
        let prev = std::mem::replace(&mut self.leaf, LeafState::None);
        if let LeafState::Fence { start, sig, lines } = prev {
            self.out.push(TokenAt::new(
                start,
                Code {
                    fence: sig.kind,
                    is_attributes: CodeFence::is_attributes_info(&sig.info),
                    info: sig.info,
                    lines,
                },
            ));
        } else {
            self.leaf = prev;
        }
    }
}

impl Default for TokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}
