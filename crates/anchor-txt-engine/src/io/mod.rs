use crate::error::ParseError;
use crate::section::SectionTree;
use relative_path::RelativePath;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid document root: {0}")]
    InvalidRoot(String),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Read a markdown file and return its content
pub fn read_file(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(IoError::Io)
}

/// Read and parse a markdown file, naming the tree after the file
pub fn load_document(path: &Path) -> Result<SectionTree, IoError> {
    let text = read_file(path)?;
    let name = display_name(path);
    debug!(path = %path.display(), bytes = text.len(), "loading document");
    Ok(SectionTree::from_md(name, &text)?)
}

/// Read and parse a markdown file addressed relative to `root`
pub fn load_relative(relative_path: &RelativePath, root: &Path) -> Result<SectionTree, IoError> {
    load_document(&relative_path.to_path(root))
}

/// Scan for markdown files under `root` with one of `extensions`
pub fn scan_markdown_files(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, IoError> {
    if !root.is_dir() {
        return Err(IoError::InvalidRoot(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    let mut files = Vec::new();
    scan_directory_recursive(root, extensions, &mut files)?;
    files.sort();
    Ok(files)
}

fn scan_directory_recursive(
    dir: &Path,
    extensions: &[String],
    files: &mut Vec<PathBuf>,
) -> Result<(), IoError> {
    let entries = fs::read_dir(dir).map_err(IoError::Io)?;

    for entry in entries {
        let entry = entry.map_err(IoError::Io)?;
        let path = entry.path();

        if path.is_dir() {
            scan_directory_recursive(&path, extensions, files)?;
        } else if let Some(ext) = path.extension()
            && extensions.iter().any(|e| ext == e.as_str())
        {
            files.push(path);
        }
    }

    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    fn md() -> Vec<String> {
        vec!["md".to_string()]
    }

    #[test]
    fn test_load_document_names_tree_after_file() {
        let dir = TempDir::new().unwrap();
        let path = create_test_file(&dir, "notes.md", "# A\n`@{done}`\n");

        let tree = load_document(&path).unwrap();

        assert_eq!(tree.name(), "notes.md");
        let a = tree.find_by_path(&["A"]).unwrap();
        assert!(a.attributes().contains_key("done"));
    }

    #[test]
    fn test_load_relative() {
        let dir = TempDir::new().unwrap();
        create_test_file(&dir, "sub/page.md", "# Page\n");

        let tree = load_relative(RelativePath::new("sub/page.md"), dir.path()).unwrap();

        assert_eq!(tree.name(), "page.md");
        assert!(tree.find_by_path(&["Page"]).is_some());
    }

    #[test]
    fn test_read_file_not_found() {
        let dir = TempDir::new().unwrap();
        let result = read_file(&dir.path().join("missing.md"));
        assert!(matches!(result, Err(IoError::NotFound(_))));
    }

    #[test]
    fn test_parse_errors_surface() {
        let dir = TempDir::new().unwrap();
        let path = create_test_file(&dir, "bad.md", "`@{oops: [}`\n");

        let result = load_document(&path);

        assert!(matches!(
            result,
            Err(IoError::Parse(ParseError::AttributeDecode { .. }))
        ));
        assert!(result.unwrap_err().to_string().starts_with("bad.md:1:"));
    }

    #[test]
    fn test_scan_nested_directories() {
        let dir = TempDir::new().unwrap();
        create_test_file(&dir, "root.md", "# Root file");
        create_test_file(&dir, "subfolder/nested.md", "# Nested file");

        let files = scan_markdown_files(dir.path(), &md()).unwrap();

        assert_eq!(files.len(), 2);
        assert!(files.iter().any(|f| f.file_name().unwrap() == "root.md"));
        assert!(files.iter().any(|f| f.file_name().unwrap() == "nested.md"));
    }

    #[test]
    fn test_scan_respects_extensions() {
        let dir = TempDir::new().unwrap();
        create_test_file(&dir, "document.md", "# Markdown");
        create_test_file(&dir, "other.markdown", "# Markdown too");
        create_test_file(&dir, "config.json", "{}");

        let files = scan_markdown_files(dir.path(), &md()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name().unwrap(), "document.md");

        let both = vec!["md".to_string(), "markdown".to_string()];
        assert_eq!(scan_markdown_files(dir.path(), &both).unwrap().len(), 2);
    }

    #[test]
    fn test_scan_invalid_root() {
        let result = scan_markdown_files(Path::new("/this/path/does/not/exist"), &md());
        assert!(matches!(result, Err(IoError::InvalidRoot(_))));
    }
}
