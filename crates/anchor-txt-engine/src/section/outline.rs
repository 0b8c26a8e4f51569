use super::SectionTree;

/// Renders one line per section, indented two spaces per depth.
///
/// The root is shown as `<name>`, other sections as their markdown header.
/// Non-empty attributes follow as compact JSON.
pub fn render_outline(tree: &SectionTree) -> String {
    let mut out = String::new();
    for section in tree.iter() {
        let indent = "  ".repeat(section.depth());
        let label = match section.header() {
            Some(h) => format!("{} {}", "#".repeat(usize::from(h.level)), h.text),
            None => format!("<{}>", tree.name()),
        };
        out.push_str(&indent);
        out.push_str(&label);

        let attributes = section.attributes();
        if !attributes.is_empty() {
            let rendered = match serde_json::to_string(attributes) {
                Ok(json) => json,
                Err(e) => format!("<unprintable attributes: {e}>"),
            };
            out.push(' ');
            out.push_str(&rendered);
        }
        out.push('\n');
    }
    out
}
