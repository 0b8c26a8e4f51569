// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n\nParagraph with `@{status: draft}` inline.\n\n## Section\n\n```yaml meta@\nowner: someone\ntags: [a, b]\n```\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_nested_document(sections: usize, depth: usize) -> String {
    let mut content = String::new();

    for section in 0..sections {
        content.push_str(&format!("# Section {section}\n\n"));
        for level in 2..(2 + depth).min(7) {
            let header_prefix = "#".repeat(level);
            content.push_str(&format!("{header_prefix} Level {level}\n\n"));
            content.push_str(&format!(
                "Some paragraph content. `@{{level: {level}, seen: {{section: {section}}}}}`\n\n"
            ));
        }
    }

    content
}
