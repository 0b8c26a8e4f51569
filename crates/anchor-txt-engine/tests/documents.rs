use anchor_txt_engine::io::load_document;
use anchor_txt_engine::{SectionTree, Token, render_outline};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_yaml::Value;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn load(name: &str) -> SectionTree {
    load_document(&fixture(name)).unwrap()
}

#[test]
fn project_outline() {
    let tree = load("project.md");
    insta::assert_snapshot!(render_outline(&tree), @r#"
    <project.md> {"kind":"project"}
      # Goals {"done":null,"owner":"team","priority":2}
        ## Milestones
          ### Alpha `@{not-a-header-attribute}` {"owner":"alpha-team"}
        ## Risks
      # Notes
    "#);
}

#[test]
fn skipped_levels_outline() {
    let tree = load("skipped_levels.md");
    insta::assert_snapshot!(render_outline(&tree), @r"
    <skipped_levels.md>
      ### Deep first
      # Top
        #### Far below
        ## Middle
      # Second top
    ");
}

#[test]
fn fenced_headers_do_not_open_sections() {
    let tree = load("project.md");
    let notes = tree.find_by_path(&["Notes"]).unwrap();
    assert_eq!(notes.sections().count(), 0);
    assert!(notes.attributes().is_empty());
    assert!(matches!(notes.contents().last(), Some(Token::Code(code)) if !code.is_attributes));
}

#[test]
fn attribute_blocks_stay_in_contents() {
    let tree = load("project.md");
    let goals = tree.find_by_path(&["Goals"]).unwrap();
    let blocks: Vec<_> = goals
        .contents()
        .iter()
        .filter_map(|t| match t {
            Token::Code(code) => Some(code),
            _ => None,
        })
        .collect();
    assert_eq!(blocks.len(), 1);
    assert!(blocks[0].is_attributes);
    assert_eq!(blocks[0].text(), "owner: team\npriority: 2");
    let two: Value = serde_yaml::from_str("2").unwrap();
    assert_eq!(goals.attribute("priority"), Some(&two));
}

#[rstest]
#[case::project("project.md")]
#[case::skipped_levels("skipped_levels.md")]
fn plain_forms_reload_to_the_same_tree(#[case] name: &str) {
    let tree = load(name);

    let from_json = SectionTree::from_json(&tree.to_json().unwrap()).unwrap();
    let from_yaml = SectionTree::from_yaml(&tree.to_yaml().unwrap()).unwrap();

    assert!(tree.structurally_eq(&from_json));
    assert!(tree.structurally_eq(&from_yaml));
    assert_eq!(from_json.to_plain(), from_yaml.to_plain());
}

#[rstest]
#[case::project("project.md")]
#[case::skipped_levels("skipped_levels.md")]
fn children_are_deeper_than_parents(#[case] name: &str) {
    let tree = load(name);
    for section in tree.iter().filter(|s| !s.is_root()) {
        assert!(section.level() > section.parent().unwrap().level());
    }
}
