use crate::markup::{ContainerInfo, ContainerKind, MarkupResourceStream};
use crate::parser::MarkupParser;
use crate::settings::MarkupSettings;
use crate::tokenizer::{TagSource, Tokenizer};
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

/// Command-line interface for weft template inspection
///
/// Provides commands for examining how the markup pipeline sees a
/// template: the raw token stream, the assembled filter chain, and the
/// final filtered element list.
#[derive(Parser)]
#[command(name = "weft-markup")]
#[command(about = "Inspect weft markup templates", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Print the tokenizer's raw element stream, before any filter runs
    Tokens {
        /// Path to the markup template
        file: PathBuf,
    },
    /// Show the filter chain assembled for a resource
    Chain {
        /// Path to the markup template
        file: PathBuf,

        /// Container kind owning the markup; decides which filters activate
        #[arg(long, value_enum, default_value_t = ContainerArg::Page)]
        container: ContainerArg,

        /// Container type name, used for forced head ids
        #[arg(long, default_value = "app::Page")]
        container_type: String,

        /// YAML settings file; defaults to WEFT_* environment variables
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Parse a template and dump the filtered element list
    Dump {
        /// Path to the markup template
        file: PathBuf,

        /// Container kind owning the markup; omit to parse as inline markup
        #[arg(long, value_enum)]
        container: Option<ContainerArg>,

        /// Container type name, used for forced head ids
        #[arg(long, default_value = "app::Page")]
        container_type: String,

        /// YAML settings file; defaults to WEFT_* environment variables
        #[arg(long)]
        config: Option<PathBuf>,

        /// Emit JSON instead of one line per element
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

/// Container kinds accepted on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerArg {
    Page,
    Panel,
    Border,
    Component,
}

impl From<ContainerArg> for ContainerKind {
    fn from(arg: ContainerArg) -> Self {
        match arg {
            ContainerArg::Page => ContainerKind::Page,
            ContainerArg::Panel => ContainerKind::Panel,
            ContainerArg::Border => ContainerKind::Border,
            ContainerArg::Component => ContainerKind::Component,
        }
    }
}

fn load_settings(config: Option<&Path>) -> anyhow::Result<MarkupSettings> {
    match config {
        Some(path) => MarkupSettings::from_yaml_file(path),
        None => Ok(MarkupSettings::from_env()),
    }
}

fn cmd_tokens(file: &Path) -> anyhow::Result<()> {
    let resource = MarkupResourceStream::from_file(file)?;
    let mut tokenizer = Tokenizer::new(resource.source());
    let mut index = 0usize;
    loop {
        let element = tokenizer
            .next_element()
            .with_context(|| format!("Failed to tokenize {}", file.display()))?;
        let Some(element) = element else { break };
        println!("{:>4}  {}", index, element.to_debug_string());
        index += 1;
    }
    println!("-- {} elements", index);
    Ok(())
}

fn cmd_chain(
    file: &Path,
    container: ContainerArg,
    container_type: &str,
    config: Option<&Path>,
) -> anyhow::Result<()> {
    let settings = load_settings(config)?;
    let resource = MarkupResourceStream::from_file(file)?
        .with_container_info(ContainerInfo::new(container.into(), container_type));
    let markup = MarkupParser::new(resource)
        .with_settings(settings)
        .parse()
        .with_context(|| format!("Failed to parse {}", file.display()))?;
    for (index, kind) in markup.filter_trace().iter().enumerate() {
        println!("{:>2}. {}", index + 1, kind);
    }
    Ok(())
}

fn cmd_dump(
    file: &Path,
    container: Option<ContainerArg>,
    container_type: &str,
    config: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let settings = load_settings(config)?;
    let mut resource = MarkupResourceStream::from_file(file)?;
    if let Some(container) = container {
        resource =
            resource.with_container_info(ContainerInfo::new(container.into(), container_type));
    }
    let markup = MarkupParser::new(resource)
        .with_settings(settings)
        .parse()
        .with_context(|| format!("Failed to parse {}", file.display()))?;

    if json {
        let body = serde_json::to_string_pretty(&markup.to_serializable())
            .context("Failed to serialize markup")?;
        println!("{}", body);
        return Ok(());
    }

    for (index, element) in markup.iter().enumerate() {
        println!("{:>4}  {}", index, element.to_debug_string());
    }
    println!("-- {} elements", markup.len());
    if let Some(head) = markup.header_index() {
        let origin = if markup.header_synthesized() {
            "synthesized"
        } else {
            "from source"
        };
        println!("-- header at {} ({})", head, origin);
    }
    Ok(())
}

/// Execute a parsed CLI invocation.
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Tokens { file } => cmd_tokens(&file),
        Commands::Chain {
            file,
            container,
            container_type,
            config,
        } => cmd_chain(&file, container, &container_type, config.as_deref()),
        Commands::Dump {
            file,
            container,
            container_type,
            config,
            json,
        } => cmd_dump(
            &file,
            container,
            &container_type,
            config.as_deref(),
            json,
        ),
    }
}
