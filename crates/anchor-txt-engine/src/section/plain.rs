use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::attributes::Attributes;
use crate::error::PlainError;
use crate::splitting::Token;

use super::{Section, SectionId, SectionTree, display_path};

/// Serialisable form of a section: a tree without parent back-edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlainSection {
    #[serde(rename = "type")]
    pub kind: String,
    pub header: Option<Token>,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub sections: Vec<PlainSection>,
    #[serde(default)]
    pub contents: Vec<Token>,
}

impl PlainSection {
    pub const TYPE: &'static str = "SECTION";
    pub const HEADER_TYPE: &'static str = "HEADER";

    fn check_type(&self) -> Result<(), PlainError> {
        if self.kind == Self::TYPE {
            Ok(())
        } else {
            Err(PlainError::DeserializeType {
                expected: Self::TYPE,
                found: self.kind.clone(),
            })
        }
    }
}

impl Section<'_> {
    pub fn to_plain(&self) -> PlainSection {
        PlainSection {
            kind: PlainSection::TYPE.to_string(),
            header: self.header().cloned().map(Token::Header),
            attributes: self.attributes().clone(),
            sections: self.sections().map(|s| s.to_plain()).collect(),
            contents: self.contents().to_vec(),
        }
    }
}

impl SectionTree {
    pub fn to_plain(&self) -> PlainSection {
        self.root().to_plain()
    }

    /// Rebuilds a tree from its plain form, re-linking parents.
    ///
    /// The input is validated rather than trusted: the root must carry no
    /// header, and every other section needs a header whose level is at
    /// least 1 and greater than its parent's.
    pub fn from_plain(plain: PlainSection) -> Result<Self, PlainError> {
        plain.check_type()?;
        if plain.header.is_some() {
            return Err(PlainError::Structure {
                path: display_path(&[]),
                reason: "the root section must not have a header".into(),
            });
        }

        let mut tree = SectionTree::new("<plain>");
        let root = tree.node_mut(SectionId::ROOT);
        root.attributes = plain.attributes;
        root.contents = plain.contents;
        for child in plain.sections {
            attach(&mut tree, SectionId::ROOT, child)?;
        }
        Ok(tree)
    }

    /// Fails with `PlainError::Unrepresentable` rather than silently
    /// rewriting attributes JSON has no form for.
    pub fn to_json(&self) -> Result<String, PlainError> {
        self.check_json_representable()?;
        Ok(serde_json::to_string_pretty(&self.to_plain())?)
    }

    /// Checks that every attribute survives a trip through JSON unchanged.
    ///
    /// JSON has no non-finite numbers, no non-string object keys and no
    /// YAML tags; `serde_json` would turn those into `null`, string keys and
    /// single-entry objects respectively.
    pub fn check_json_representable(&self) -> Result<(), PlainError> {
        for section in self.iter() {
            for (key, value) in section.attributes().iter() {
                if let Some(problem) = json_obstacle(value) {
                    return Err(PlainError::Unrepresentable {
                        path: display_path(&section.path()),
                        reason: format!("attribute `{key}` {problem}"),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn from_json(text: &str) -> Result<Self, PlainError> {
        Self::from_plain(serde_json::from_str(text)?)
    }

    pub fn to_yaml(&self) -> Result<String, PlainError> {
        Ok(serde_yaml::to_string(&self.to_plain())?)
    }

    pub fn from_yaml(text: &str) -> Result<Self, PlainError> {
        Self::from_plain(serde_yaml::from_str(text)?)
    }
}

fn attach(tree: &mut SectionTree, parent: SectionId, plain: PlainSection) -> Result<(), PlainError> {
    plain.check_type()?;
    let parent_level = tree.section(parent).level();

    let header = match plain.header {
        Some(Token::Header(header)) => header,
        Some(other) => {
            return Err(PlainError::DeserializeType {
                expected: PlainSection::HEADER_TYPE,
                found: other.kind().to_string(),
            });
        }
        None => {
            return Err(PlainError::Structure {
                path: display_path(&tree.section(parent).path()),
                reason: "nested section has no header".into(),
            });
        }
    };

    if header.level == 0 || header.level <= parent_level {
        let mut path = tree.section(parent).path();
        path.push(&header.text);
        return Err(PlainError::Structure {
            path: display_path(&path),
            reason: format!(
                "header level {} must be at least 1 and greater than the parent's level {}",
                header.level, parent_level
            ),
        });
    }

    let id = tree.push_child(parent, header);
    let node = tree.node_mut(id);
    node.attributes = plain.attributes;
    node.contents = plain.contents;
    for child in plain.sections {
        attach(tree, id, child)?;
    }
    Ok(())
}

fn json_obstacle(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) if n.is_nan() || n.is_infinite() => {
            Some(format!("holds the non-finite number {n}"))
        }
        Value::Sequence(items) => items.iter().find_map(json_obstacle),
        Value::Mapping(mapping) => mapping.iter().find_map(|(key, value)| match key {
            Value::String(_) => json_obstacle(value),
            _ => Some("has a mapping with a non-string key".to_string()),
        }),
        Value::Tagged(tagged) => Some(format!("holds the tagged value {}", tagged.tag)),
        _ => None,
    }
}
