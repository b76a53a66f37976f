use crate::config::ReaderConfig;
use crate::extractor::ResourceExtractor;
use crate::openapi_builder::Info;
use crate::parser::{AstParser, ParsedFile};
use crate::reader::Reader;
use crate::schema_generator::SchemaGenerator;
use crate::serializer::{serialize_json, serialize_yaml};
use crate::type_resolver::TypeResolver;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use std::path::PathBuf;

/// Resource OpenAPI Reader - assemble an OpenAPI document from annotated Rust resources
#[derive(Parser, Debug)]
#[command(name = "resource-openapi-reader")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Resource source files, scanned in the given order
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// API title written to the document info
    #[arg(long = "title")]
    pub title: Option<String>,

    /// API version written to the document info
    #[arg(long = "api-version")]
    pub api_version: Option<String>,

    /// API description written to the document info
    #[arg(long = "description")]
    pub description: Option<String>,

    /// Exit with an error when any operation failed to assemble
    #[arg(long = "strict")]
    pub strict: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

impl CliArgs {
    /// Reader settings derived from the info flags
    pub fn reader_config(&self) -> ReaderConfig {
        let defaults = Info::default();
        ReaderConfig::default().with_info(Info {
            title: self.title.clone().unwrap_or(defaults.title),
            version: self.api_version.clone().unwrap_or(defaults.version),
            description: self.description.clone().or(defaults.description),
        })
    }
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    for file in &args.files {
        if !file.is_file() {
            anyhow::bail!("Resource file does not exist: {}", file.display());
        }
    }

    info!("Resource files: {}", args.files.len());
    info!("Output format: {:?}", args.output_format);

    Ok(args)
}

/// Run the main workflow and return the serialized document
pub fn generate(args: &CliArgs) -> Result<String> {
    info!("Parsing {} resource files...", args.files.len());
    let parsed_files: Vec<ParsedFile> = AstParser::parse_files(&args.files)
        .into_iter()
        .filter_map(|r| match r {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                debug!("Skipping file due to parse error: {}", e);
                None
            }
        })
        .collect();

    if parsed_files.is_empty() {
        anyhow::bail!("No files could be parsed successfully");
    }

    let catalog = ResourceExtractor::extract(&parsed_files);
    let mut registry = SchemaGenerator::new(TypeResolver::new(&parsed_files));

    info!("Reading resources...");
    let reader = Reader::new(args.reader_config());
    let outcome = reader.read(&catalog, &mut registry);

    for error in &outcome.errors {
        warn!("{}", error);
    }
    if args.strict && !outcome.is_clean() {
        anyhow::bail!(
            "{} operations could not be assembled",
            outcome.errors.len()
        );
    }

    info!("Serializing to {:?} format...", args.output_format);
    match args.output_format {
        OutputFormat::Yaml => serialize_yaml(&outcome.document),
        OutputFormat::Json => serialize_json(&outcome.document),
    }
}

/// Run the main workflow, printing the document on stdout
pub fn run(args: CliArgs) -> Result<()> {
    let content = generate(&args)?;
    println!("{}", content);
    info!("Generation complete!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cli_flags() {
        let args = CliArgs::try_parse_from([
            "resource-openapi-reader",
            "a.rs",
            "b.rs",
            "-f",
            "json",
            "--title",
            "Pets",
            "--strict",
        ])
        .unwrap();
        assert_eq!(args.files, vec![PathBuf::from("a.rs"), PathBuf::from("b.rs")]);
        assert!(matches!(args.output_format, OutputFormat::Json));
        assert!(args.strict);

        let config = args.reader_config();
        assert_eq!(config.info.title, "Pets");
        assert_eq!(config.info.version, "1.0.0");
    }

    #[test]
    fn test_files_are_required() {
        assert!(CliArgs::try_parse_from(["resource-openapi-reader"]).is_err());
    }

    #[test]
    fn test_missing_file_is_rejected() {
        let args =
            CliArgs::try_parse_from(["resource-openapi-reader", "/nonexistent/pets.rs"]).unwrap();
        let err = parse_args_from_parsed(args).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
