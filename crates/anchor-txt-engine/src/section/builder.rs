use tracing::{debug, trace};

use crate::attributes::{Attributes, DecodeFailure, inline_payloads};
use crate::error::ParseError;
use crate::splitting::{Header, Token, TokenAt};

use super::{SectionId, SectionTree, display_path};

/// Single-pass section tree construction.
///
/// Keeps a cursor on the "current section". Headers move the cursor to a
/// freshly created section; code and text tokens attach to the section under
/// the cursor, and any attributes they declare are merged into it.
pub struct SectionBuilder {
    tree: SectionTree,
    current: SectionId,
}

impl SectionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            tree: SectionTree::new(name),
            current: SectionId::ROOT,
        }
    }

    pub fn push(&mut self, at: TokenAt) -> Result<(), ParseError> {
        let TokenAt { line, token } = at;
        match token {
            Token::Header(header) => self.open_section(header, line),
            Token::Code(code) => {
                if code.is_attributes {
                    let text = code.text();
                    let attributes = Attributes::decode_block(&text)
                        .map_err(|source| self.decode_error(line + 1, text, source))?;
                    self.merge(attributes, line);
                }
                self.tree.node_mut(self.current).contents.push(Token::Code(code));
                Ok(())
            }
            Token::Text(text) => {
                for (offset, raw) in text.raw.iter().enumerate() {
                    for payload in inline_payloads(raw) {
                        let attributes = Attributes::decode_inline(payload).map_err(|source| {
                            self.decode_error(line + offset, payload.to_string(), source)
                        })?;
                        self.merge(attributes, line + offset);
                    }
                }
                self.tree.node_mut(self.current).contents.push(Token::Text(text));
                Ok(())
            }
        }
    }

    pub fn finish(self) -> SectionTree {
        debug!(
            document = %self.tree.name(),
            sections = self.tree.section_count() - 1,
            "section tree built"
        );
        self.tree
    }

    fn open_section(&mut self, header: Header, line: usize) -> Result<(), ParseError> {
        if header.level == 0 {
            return Err(ParseError::Structure {
                document: self.tree.name().to_string(),
                line,
                level: header.level,
            });
        }

        let parent = self.resolve_parent(header.level);
        debug!(
            document = %self.tree.name(),
            line,
            level = header.level,
            title = %header.text,
            parent = parent.index(),
            "opening section"
        );
        self.current = self.tree.push_child(parent, header);
        Ok(())
    }

    /// Walks up from the current section to the nearest one a header of
    /// `level` nests under: the root, or a section with a lower level.
    fn resolve_parent(&self, level: u8) -> SectionId {
        let mut candidate = self.current;
        loop {
            let node = self.tree.node(candidate);
            let nests = node.header.as_ref().is_none_or(|h| level > h.level);
            match node.parent {
                Some(parent) if !nests => candidate = parent,
                _ => return candidate,
            }
        }
    }

    fn merge(&mut self, attributes: Attributes, line: usize) {
        if attributes.is_empty() {
            return;
        }
        trace!(
            document = %self.tree.name(),
            line,
            keys = ?attributes.keys().collect::<Vec<_>>(),
            "merging attributes"
        );
        self.tree.node_mut(self.current).attributes.update(attributes);
    }

    fn decode_error(&self, line: usize, payload: String, source: DecodeFailure) -> ParseError {
        ParseError::AttributeDecode {
            document: self.tree.name().to_string(),
            section: display_path(&self.tree.section(self.current).path()),
            line,
            payload,
            source,
        }
    }
}
