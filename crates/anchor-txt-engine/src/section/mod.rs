//! # Sections
//!
//! A document is a tree of sections rooted at a synthetic, header-less root.
//! Each header opens a section nested under the closest preceding section of
//! a lower level; attributes and raw tokens attach to the section active when
//! they were read.
//!
//! ## Representation
//!
//! Sections live in an arena (`SectionTree`) and are addressed by
//! `SectionId`. Parent links are plain ids, so there are no ownership cycles
//! between parents and children. The root is always `SectionId::ROOT`.
//!
//! ## Modules
//!
//! - **`builder`**: `SectionBuilder`, the single-pass tree construction
//! - **`plain`**: conversion to and from the serialisable `PlainSection` form
//! - **`outline`**: human-readable outline rendering

pub mod builder;
pub mod outline;
pub mod plain;

use std::fmt;

use serde_yaml::Value;

use crate::attributes::Attributes;
use crate::error::ParseError;
use crate::splitting::{self, Header, Token, TokenAt};

pub use builder::SectionBuilder;
pub use outline::render_outline;
pub use plain::PlainSection;

/// Index of a section within its `SectionTree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(usize);

impl SectionId {
    pub const ROOT: SectionId = SectionId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SectionNode {
    pub(crate) header: Option<Header>,
    pub(crate) attributes: Attributes,
    pub(crate) sections: Vec<SectionId>,
    pub(crate) contents: Vec<Token>,
    pub(crate) parent: Option<SectionId>,
}

impl SectionNode {
    fn new(parent: Option<SectionId>, header: Option<Header>) -> Self {
        Self {
            header,
            attributes: Attributes::new(),
            sections: vec![],
            contents: vec![],
            parent,
        }
    }
}

/// A parsed document: an arena of sections rooted at `SectionId::ROOT`.
#[derive(Debug, Clone)]
pub struct SectionTree {
    name: String,
    nodes: Vec<SectionNode>,
}

impl SectionTree {
    /// Creates a tree holding only an empty root.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: vec![SectionNode::new(None, None)],
        }
    }

    /// Parses markdown text. `name` only labels log lines and errors.
    pub fn from_md(name: impl Into<String>, text: &str) -> Result<Self, ParseError> {
        Self::from_tokens(name, splitting::split(text))
    }

    /// Builds a tree from an already split token stream.
    pub fn from_tokens(
        name: impl Into<String>,
        tokens: impl IntoIterator<Item = TokenAt>,
    ) -> Result<Self, ParseError> {
        let mut builder = SectionBuilder::new(name);
        for token in tokens {
            builder.push(token)?;
        }
        Ok(builder.finish())
    }

    /// Display name given at construction.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn root(&self) -> Section<'_> {
        self.section(SectionId::ROOT)
    }

    pub fn get(&self, id: SectionId) -> Option<Section<'_>> {
        (id.0 < self.nodes.len()).then(|| self.section(id))
    }

    /// Number of sections, root included.
    pub fn section_count(&self) -> usize {
        self.nodes.len()
    }

    /// All sections in document order (pre-order, root first).
    pub fn iter(&self) -> impl Iterator<Item = Section<'_>> {
        let mut stack = vec![SectionId::ROOT];
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.node(id).sections.iter().rev().copied());
            Some(self.section(id))
        })
    }

    /// First section whose title path equals `path`.
    pub fn find_by_path(&self, path: &[&str]) -> Option<Section<'_>> {
        self.iter()
            .filter(|s| !s.is_root())
            .find(|s| s.path().as_slice() == path)
    }

    /// Compares header, attributes, child sections and contents of both trees.
    ///
    /// Parent links, arena layout and display names are not compared.
    pub fn structurally_eq(&self, other: &SectionTree) -> bool {
        let mut pending = vec![(SectionId::ROOT, SectionId::ROOT)];
        while let Some((a, b)) = pending.pop() {
            let (left, right) = (self.node(a), other.node(b));
            if left.header != right.header
                || left.attributes != right.attributes
                || left.contents != right.contents
                || left.sections.len() != right.sections.len()
            {
                return false;
            }
            pending.extend(left.sections.iter().copied().zip(right.sections.iter().copied()));
        }
        true
    }

    fn section(&self, id: SectionId) -> Section<'_> {
        Section { tree: self, id }
    }

    pub(crate) fn node(&self, id: SectionId) -> &SectionNode {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: SectionId) -> &mut SectionNode {
        &mut self.nodes[id.0]
    }

    /// Appends a new section under `parent` and returns its id.
    pub(crate) fn push_child(&mut self, parent: SectionId, header: Header) -> SectionId {
        let id = SectionId(self.nodes.len());
        self.nodes.push(SectionNode::new(Some(parent), Some(header)));
        self.node_mut(parent).sections.push(id);
        id
    }
}

impl PartialEq for SectionTree {
    fn eq(&self, other: &Self) -> bool {
        self.structurally_eq(other)
    }
}

/// A borrowed view of one section of a `SectionTree`.
#[derive(Clone, Copy)]
pub struct Section<'a> {
    tree: &'a SectionTree,
    id: SectionId,
}

impl<'a> Section<'a> {
    pub fn id(&self) -> SectionId {
        self.id
    }

    pub fn is_root(&self) -> bool {
        self.node().header.is_none()
    }

    /// The header that opened this section; `None` only for the root.
    pub fn header(&self) -> Option<&'a Header> {
        self.node().header.as_ref()
    }

    pub fn title(&self) -> Option<&'a str> {
        self.header().map(|h| h.text.as_str())
    }

    /// Header level, 0 for the root.
    pub fn level(&self) -> u8 {
        self.header().map_or(0, |h| h.level)
    }

    pub fn attributes(&self) -> &'a Attributes {
        &self.node().attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&'a Value> {
        self.attributes().get(key)
    }

    /// Child sections in document order.
    pub fn sections(&self) -> impl Iterator<Item = Section<'a>> + use<'a> {
        let tree = self.tree;
        self.node().sections.iter().map(move |&id| tree.section(id))
    }

    /// Text and code tokens directly inside this section.
    pub fn contents(&self) -> &'a [Token] {
        &self.node().contents
    }

    pub fn parent(&self) -> Option<Section<'a>> {
        self.node().parent.map(|id| self.tree.section(id))
    }

    /// Number of ancestors; 0 for the root.
    pub fn depth(&self) -> usize {
        std::iter::successors(self.parent(), |s| s.parent()).count()
    }

    /// Titles from the outermost enclosing header down to this one.
    pub fn path(&self) -> Vec<&'a str> {
        let mut titles: Vec<_> = std::iter::successors(Some(*self), |s| s.parent())
            .filter_map(|s| s.title())
            .collect();
        titles.reverse();
        titles
    }

    fn node(&self) -> &'a SectionNode {
        self.tree.node(self.id)
    }
}

impl fmt::Debug for Section<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Section")
            .field("header", &self.header())
            .field("attributes", self.attributes())
            .field("sections", &self.sections().collect::<Vec<_>>())
            .finish()
    }
}

/// Joins a title path for messages; the root is shown as `<root>`.
pub(crate) fn display_path(path: &[&str]) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.join(" > ")
    }
}
