//! # Attributes
//!
//! Structured metadata declared inside a section, either in a fenced
//! `yaml ...@` block or in an inline code span of the form `` `@{...}` ``.
//! Both forms decode to YAML and are deep-merged into the same mapping.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// Pattern for inline attribute spans. Non-greedy, so several spans may share a line.
pub const INLINE_PATTERN: &str = r"`@\{(.*?)\}`";

/// Why an attribute payload could not be turned into attributes.
#[derive(Debug, thiserror::Error)]
pub enum DecodeFailure {
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("expected a mapping of attributes, found {found}")]
    NotAMapping { found: &'static str },
    #[error("attribute names must be strings, found {found}")]
    NonStringKey { found: &'static str },
}

/// Attribute name to YAML value. Values may be null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, Value>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes the body of a `yaml ...@` block.
    ///
    /// An empty body contributes nothing.
    pub fn decode_block(text: &str) -> Result<Self, DecodeFailure> {
        if text.trim().is_empty() {
            return Ok(Self::new());
        }
        Self::from_value(serde_yaml::from_str(text)?)
    }

    /// Decodes the payload of an inline `` `@{payload}` `` span.
    ///
    /// A bare string `foo` is shorthand for `{foo: null}`.
    pub fn decode_inline(payload: &str) -> Result<Self, DecodeFailure> {
        if payload.trim().is_empty() {
            return Ok(Self::new());
        }
        match serde_yaml::from_str(payload)? {
            Value::String(name) => Ok(Self(BTreeMap::from([(name, Value::Null)]))),
            other => Self::from_value(other),
        }
    }

    fn from_value(value: Value) -> Result<Self, DecodeFailure> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Mapping(mapping) => mapping
                .into_iter()
                .map(|(key, value)| match key {
                    Value::String(key) => Ok((key, value)),
                    other => Err(DecodeFailure::NonStringKey {
                        found: kind_name(&other),
                    }),
                })
                .collect::<Result<BTreeMap<_, _>, _>>()
                .map(Self),
            other => Err(DecodeFailure::NotAMapping {
                found: kind_name(&other),
            }),
        }
    }

    /// Deep-merges `incoming` into `self`.
    ///
    /// Keys present on both sides whose values are both mappings merge
    /// recursively; any other overlap is overwritten by `incoming`.
    pub fn update(&mut self, incoming: Attributes) {
        for (key, value) in incoming.0 {
            match self.0.get_mut(&key) {
                Some(existing) => merge_value(existing, value),
                None => {
                    self.0.insert(key, value);
                }
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Applies the deep-merge rule to a single value.
pub fn merge_value(target: &mut Value, incoming: Value) {
    match (target, incoming) {
        (Value::Mapping(existing), Value::Mapping(incoming)) => merge_mapping(existing, incoming),
        (target, incoming) => *target = incoming,
    }
}

fn merge_mapping(target: &mut Mapping, incoming: Mapping) {
    for (key, value) in incoming {
        match target.get_mut(&key) {
            Some(existing) => merge_value(existing, value),
            None => {
                target.insert(key, value);
            }
        }
    }
}

/// Payloads of every `` `@{...}` `` span on a line, left to right.
pub fn inline_payloads(line: &str) -> impl Iterator<Item = &str> {
    static INLINE: OnceLock<Regex> = OnceLock::new();
    INLINE
        .get_or_init(|| Regex::new(INLINE_PATTERN).expect("Invalid inline attribute regex"))
        .captures_iter(line)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn attrs(yaml: &str) -> Attributes {
        Attributes::decode_block(yaml).unwrap()
    }

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn inline_string_is_promoted_to_null_attribute() {
        let decoded = Attributes::decode_inline("enabled").unwrap();
        assert_eq!(decoded.get("enabled"), Some(&Value::Null));
        assert_eq!(decoded.len(), 1);
    }

    #[test]
    fn inline_mapping_keeps_value() {
        let decoded = Attributes::decode_inline("enabled: true").unwrap();
        assert_eq!(decoded.get("enabled"), Some(&Value::Bool(true)));
    }

    #[test]
    fn inline_flow_mapping() {
        let decoded = Attributes::decode_inline("{a: 1, b: [x, y]}").unwrap();
        assert_eq!(decoded, attrs("a: 1\nb: [x, y]"));
    }

    #[rstest]
    #[case("{unbalanced: [1, 2}")]
    #[case("key: [oops")]
    #[case("a: b: c")]
    fn malformed_yaml_is_rejected(#[case] payload: &str) {
        assert!(matches!(
            Attributes::decode_inline(payload),
            Err(DecodeFailure::Yaml(_))
        ));
        assert!(matches!(
            Attributes::decode_block(payload),
            Err(DecodeFailure::Yaml(_))
        ));
    }

    #[rstest]
    #[case("42", "a number")]
    #[case("true", "a boolean")]
    #[case("[a, b]", "a sequence")]
    fn scalars_and_sequences_are_not_attributes(#[case] payload: &str, #[case] kind: &str) {
        match Attributes::decode_inline(payload) {
            Err(DecodeFailure::NotAMapping { found }) => assert_eq!(found, kind),
            other => panic!("expected NotAMapping, got {other:?}"),
        }
    }

    #[test]
    fn block_string_is_not_promoted() {
        assert!(matches!(
            Attributes::decode_block("just words"),
            Err(DecodeFailure::NotAMapping { found: "a string" })
        ));
    }

    #[test]
    fn non_string_keys_are_rejected() {
        assert!(matches!(
            Attributes::decode_block("1: one"),
            Err(DecodeFailure::NonStringKey { found: "a number" })
        ));
    }

    #[test]
    fn empty_payloads_contribute_nothing() {
        assert!(Attributes::decode_block("").unwrap().is_empty());
        assert!(Attributes::decode_block("  \n").unwrap().is_empty());
        assert!(Attributes::decode_inline("").unwrap().is_empty());
        assert!(Attributes::decode_block("~").unwrap().is_empty());
    }

    #[test]
    fn update_inserts_new_keys() {
        let mut target = attrs("a: 1");
        target.update(attrs("b: 2"));
        assert_eq!(target, attrs("a: 1\nb: 2"));
    }

    #[test]
    fn update_merges_nested_mappings() {
        let mut target = attrs("outer: {keep: 1, inner: {x: 1}}");
        target.update(attrs("outer: {inner: {y: 2}, added: 3}"));
        assert_eq!(
            target,
            attrs("outer: {keep: 1, inner: {x: 1, y: 2}, added: 3}")
        );
    }

    #[test]
    fn update_overwrites_non_mapping_overlap() {
        let mut target = attrs("a: 1\nb: {nested: true}\nc: [1]");
        target.update(attrs("a: 2\nb: replaced\nc: {now: mapping}"));
        assert_eq!(target, attrs("a: 2\nb: replaced\nc: {now: mapping}"));
    }

    #[test]
    fn update_with_null_overwrites() {
        let mut target = attrs("flag: on");
        target.update(Attributes::decode_inline("flag").unwrap());
        assert_eq!(target.get("flag"), Some(&Value::Null));
    }

    #[test]
    fn update_is_idempotent() {
        let base = attrs("a: 1\nm: {x: 1, deep: {k: v}}");
        let incoming = attrs("a: 5\nm: {y: 2, deep: {j: w}}\nn: null");

        let mut once = base.clone();
        once.update(incoming.clone());
        let mut twice = once.clone();
        twice.update(incoming);

        assert_eq!(once, twice);
    }

    #[test]
    fn merge_value_replaces_scalar_with_mapping() {
        let mut target = yaml("scalar");
        merge_value(&mut target, yaml("{k: v}"));
        assert_eq!(target, yaml("{k: v}"));
    }

    #[test]
    fn finds_inline_payloads() {
        let line = "text `@{a}` more `@{b: 2}` and `code` and `@{c: {d: 1}}`";
        let payloads: Vec<_> = inline_payloads(line).collect();
        assert_eq!(payloads, vec!["a", "b: 2", "c: {d: 1}"]);
    }

    #[test]
    fn ignores_near_misses() {
        let line = "`@foo` `{bar}` @{baz} `@{unclosed`";
        assert_eq!(inline_payloads(line).count(), 0);
    }
}
