//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use docweave_core::config::CONFIG_FILE_NAME;
use docweave_core::{
    parse_tag, Doc, RenderReport, Renderer, Settings, Tag, TagParseError, TemplateData,
};
use docweave_ooxml::Docx;

#[derive(Parser)]
#[command(name = "docweave")]
#[command(author, version, about = "Word documents from outlines and templates", long_about = None)]
struct Cli {
    /// Log debug output (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a DOCX from a JSON or TOML outline
    Build {
        /// Outline file (`components = [...]`)
        outline: PathBuf,

        /// Output DOCX file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Fill a template's {{type:name}} tags from a data file
    Render {
        /// Template DOCX file
        template: PathBuf,

        /// JSON or TOML data file
        #[arg(short, long)]
        data: PathBuf,

        /// Output DOCX file
        #[arg(short, long)]
        output: PathBuf,

        /// Document whose styles, tables and section settings receive the
        /// output (defaults to the template itself)
        #[arg(long)]
        dest: Option<PathBuf>,

        /// Configuration file (defaults to ./docweave.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List the tags found in a template
    Tags {
        /// Template DOCX file
        template: PathBuf,
    },
}

/// Run the CLI application
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Build { outline, output } => {
            build_command(&outline, &output)?;
        }
        Commands::Render {
            template,
            data,
            output,
            dest,
            config,
        } => {
            render_command(&template, &data, &output, dest.as_deref(), config.as_deref())?;
        }
        Commands::Tags { template } => {
            tags_command(&template)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    // RUST_LOG directives are applied on top of the default level
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Execute the build command
pub fn build_command(outline: &Path, output: &Path) -> Result<()> {
    println!("docweave v{}", docweave_core::VERSION);
    println!("Building: {}", outline.display());

    if !outline.exists() {
        anyhow::bail!("Outline file not found: {}", outline.display());
    }

    let doc = Doc::load(outline)
        .with_context(|| format!("Failed to read outline: {}", outline.display()))?;
    doc.to_docx(output)
        .with_context(|| format!("Failed to build document: {}", output.display()))?;

    println!("  Components: {}", doc.len());
    println!("  Created: {}", output.display());
    Ok(())
}

/// Execute the render command
pub fn render_command(
    template: &Path,
    data: &Path,
    output: &Path,
    dest: Option<&Path>,
    config: Option<&Path>,
) -> Result<RenderReport> {
    println!("docweave v{}", docweave_core::VERSION);
    println!("Rendering: {}", template.display());

    if !template.exists() {
        anyhow::bail!("Template file not found: {}", template.display());
    }

    let settings = load_settings(config)?;
    let data = TemplateData::load(data)
        .with_context(|| format!("Failed to read data file: {}", data.display()))?;

    let source = Docx::open(template)
        .with_context(|| format!("Failed to open template: {}", template.display()))?;
    let dest_path = dest.unwrap_or(template);
    let mut dest = Docx::open(dest_path)
        .with_context(|| format!("Failed to open destination: {}", dest_path.display()))?;

    let report = Renderer::new(&data)
        .with_options(settings.render_options())
        .render_to_file(&source, &mut dest, output)
        .with_context(|| format!("Failed to render template: {}", template.display()))?;

    println!(
        "  Tags: {} substituted, {} missing",
        report.substituted(),
        report.missing
    );
    println!("  Copied paragraphs: {}", report.copied);
    println!("  Created: {}", output.display());
    Ok(report)
}

fn load_settings(config: Option<&Path>) -> Result<Settings> {
    let path = match config {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(CONFIG_FILE_NAME);
            if !default.exists() {
                return Ok(Settings::default());
            }
            default
        }
    };
    debug!(path = %path.display(), "Loading settings");
    Settings::load(&path).with_context(|| format!("Failed to load config: {}", path.display()))
}

/// A tagged paragraph of a template
#[derive(Debug)]
pub struct TagLine {
    /// Zero-based index among the template's body paragraphs
    pub paragraph: usize,
    /// The parsed tag, or why it could not be parsed
    pub tag: std::result::Result<Tag, TagParseError>,
}

/// Collect every paragraph that holds a `{{...}}` tag
pub fn find_tags(docx: &Docx) -> Vec<TagLine> {
    docx.paragraphs()
        .enumerate()
        .filter_map(|(paragraph, p)| {
            let tag = parse_tag(&p.text()).transpose()?;
            Some(TagLine { paragraph, tag })
        })
        .collect()
}

/// Execute the tags command
pub fn tags_command(template: &Path) -> Result<Vec<TagLine>> {
    let docx = Docx::open(template)
        .with_context(|| format!("Failed to open template: {}", template.display()))?;
    let tags = find_tags(&docx);

    if tags.is_empty() {
        println!("No tags found in {}", template.display());
    }
    for line in &tags {
        match &line.tag {
            Ok(tag) => println!(
                "{:>4}  {:<10} {}",
                line.paragraph,
                tag.kind.as_str(),
                tag.name
            ),
            Err(err) => println!("{:>4}  malformed  {}", line.paragraph, err),
        }
    }
    Ok(tags)
}
