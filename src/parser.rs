use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Parser for annotated resource source files.
///
/// Files are only parsed with `syn`, never compiled, so the metadata attributes
/// on resources do not need to exist as real macros.
///
/// # Example
///
/// ```no_run
/// use resource_openapi_reader::parser::AstParser;
/// use std::path::Path;
///
/// let parsed = AstParser::parse_file(Path::new("src/resources.rs")).unwrap();
/// println!("Parsed {} items", parsed.syntax_tree.items.len());
/// ```
pub struct AstParser;

/// A parsed source file together with the path it came from.
#[derive(Debug)]
pub struct ParsedFile {
    /// Path to the source file
    pub path: PathBuf,
    /// The parsed syntax tree
    pub syntax_tree: syn::File,
}

impl AstParser {
    /// Read and parse a single source file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid Rust.
    pub fn parse_file(path: &Path) -> Result<ParsedFile> {
        debug!("Parsing file: {}", path.display());

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        Self::parse_source(path, &content)
    }

    /// Parse source text that is already in memory; `path` only labels it.
    pub fn parse_source(path: &Path, content: &str) -> Result<ParsedFile> {
        let syntax_tree = syn::parse_file(content)
            .with_context(|| format!("Failed to parse Rust syntax in file: {}", path.display()))?;

        debug!(
            "Parsed {} items from {}",
            syntax_tree.items.len(),
            path.display()
        );
        Ok(ParsedFile {
            path: path.to_path_buf(),
            syntax_tree,
        })
    }

    /// Parse several files, one result per path in input order.
    ///
    /// A file that fails to parse is logged and reported in its slot; the
    /// remaining files are still parsed.
    pub fn parse_files(paths: &[PathBuf]) -> Vec<Result<ParsedFile>> {
        debug!("Parsing {} files", paths.len());

        let results: Vec<Result<ParsedFile>> = paths
            .iter()
            .map(|path| {
                Self::parse_file(path).inspect_err(|e| {
                    warn!("Failed to parse {}: {:#}", path.display(), e);
                })
            })
            .collect();

        let success_count = results.iter().filter(|r| r.is_ok()).count();
        debug!(
            "Parsing complete: {} succeeded, {} failed",
            success_count,
            results.len() - success_count
        );

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    /// Helper function to create a temporary file with content
    fn create_temp_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let file_path = dir.path().join(name);
        let mut file = fs::File::create(&file_path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file_path
    }

    #[test]
    fn test_parse_resource_file() {
        let temp_dir = TempDir::new().unwrap();
        let code = r#"
            #[path("/pets")]
            pub struct PetResource;

            impl PetResource {
                #[get]
                #[operation(summary = "List pets")]
                pub fn list(&self, #[query_param] limit: Option<u32>) -> Vec<Pet> {
                    vec![]
                }
            }
        "#;

        let file_path = create_temp_file(&temp_dir, "pets.rs", code);
        let parsed = AstParser::parse_file(&file_path).unwrap();

        assert_eq!(parsed.path, file_path);
        assert_eq!(parsed.syntax_tree.items.len(), 2);
    }

    #[test]
    fn test_parse_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = create_temp_file(&temp_dir, "invalid.rs", "impl PetResource { fn broken( }");
        let err = AstParser::parse_file(&file_path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse Rust syntax"));
    }

    #[test]
    fn test_parse_nonexistent_file() {
        let err = AstParser::parse_file(Path::new("/nonexistent/resources.rs")).unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }

    #[test]
    fn test_parse_source() {
        let parsed = AstParser::parse_source(Path::new("inline.rs"), "pub trait Api {}").unwrap();
        assert_eq!(parsed.path, PathBuf::from("inline.rs"));
        assert_eq!(parsed.syntax_tree.items.len(), 1);
    }

    #[test]
    fn test_parse_files_keeps_going() {
        let temp_dir = TempDir::new().unwrap();
        let good = create_temp_file(&temp_dir, "good.rs", "pub struct World;");
        let bad = create_temp_file(&temp_dir, "bad.rs", "pub fn broken( {");
        let also_good = create_temp_file(&temp_dir, "also_good.rs", "pub trait Api {}");

        let results = AstParser::parse_files(&[good.clone(), bad, also_good]);

        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
        assert_eq!(results[0].as_ref().unwrap().path, good);
    }

    #[test]
    fn test_parse_files_empty_list() {
        assert!(AstParser::parse_files(&[]).is_empty());
    }
}
