use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use confluent_codegen::Generator;
use confluent_spec::{FileSourceLoader, Language, LanguageConfig, Source};

#[derive(Parser)]
#[command(name = "confluent", about = "Confluent – typed configuration for many languages")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate one module per target language from a definition file
    Generate {
        /// Root definition file
        file: PathBuf,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
        /// Target language; repeat to select several (defaults to the
        /// languages listed in the file)
        #[arg(short, long = "language")]
        languages: Vec<String>,
        /// Name the generated files and types derive from (defaults to the
        /// file stem)
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Resolve a definition file and print the resulting values
    Check {
        /// Root definition file
        file: PathBuf,
        /// Print the resolved properties as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the JSON schema of definition files
    Schema,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("CONFLUENT_LOG"))
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Command::Generate {
            file,
            output,
            languages,
            name,
        } => cmd_generate(&file, &output, &languages, name.as_deref()),
        Command::Check { file, json } => cmd_check(&file, json),
        Command::Schema => cmd_schema(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::from(1)
        }
    }
}

fn read_root(loader: &FileSourceLoader, file: &Path) -> Result<Source> {
    loader
        .read_root(file)
        .map_err(|e| anyhow::anyhow!("[{}] {e}", e.code()))
        .with_context(|| format!("Failed to read '{}'", file.display()))
}

/// Resolve `--language` values against the languages listed in the root
/// source, so their options (package, naming, ...) still apply.
fn select_targets(root: &Source, languages: &[String]) -> Result<Vec<LanguageConfig>> {
    languages
        .iter()
        .map(|name| {
            let language: Language = name
                .parse()
                .map_err(|e| anyhow::anyhow!("{e}"))
                .with_context(|| format!("Invalid --language '{name}'"))?;
            Ok(root
                .document
                .languages
                .iter()
                .find(|config| config.language == language)
                .cloned()
                .map(|mut config| {
                    config.ignore = false;
                    config
                })
                .unwrap_or_else(|| LanguageConfig::new(language)))
        })
        .collect()
}

fn cmd_generate(
    file: &Path,
    output: &Path,
    languages: &[String],
    name: Option<&str>,
) -> Result<()> {
    println!(
        "{} {}",
        "Generating from".bold(),
        file.canonicalize()
            .unwrap_or_else(|_| file.to_path_buf())
            .display()
    );

    let loader = FileSourceLoader::new();
    let root = read_root(&loader, file)?;
    let targets = select_targets(&root, languages)?;

    let mut generator = Generator::new();
    if let Some(name) = name {
        generator = generator.with_config_name(name);
    }

    let artifacts = generator
        .generate(std::slice::from_ref(&root), &targets, &loader)
        .map_err(|e| anyhow::anyhow!("[{}] {e}", e.code()))
        .context("Generation failed")?;
    if artifacts.is_empty() {
        anyhow::bail!(
            "No target languages: list some under 'languages' in '{}' or pass --language",
            file.display()
        );
    }

    let written = confluent_codegen::write_artifacts(&artifacts, output)
        .map_err(|e| anyhow::anyhow!("[{}] {e}", e.code()))
        .with_context(|| format!("Failed to write to '{}'", output.display()))?;

    println!(
        "{} Generated {} file(s) → {}",
        "✓".green().bold(),
        written.len(),
        output.display()
    );
    for (artifact, path) in artifacts.iter().zip(&written) {
        println!(
            "  {} {} {}",
            "→".dimmed(),
            path.display(),
            format!("({})", artifact.target_language).dimmed()
        );
    }
    Ok(())
}

fn cmd_check(file: &Path, json: bool) -> Result<()> {
    let loader = FileSourceLoader::new();
    let root = read_root(&loader, file)?;

    let graph = confluent_graph::build(std::slice::from_ref(&root), &loader)
        .map_err(|e| anyhow::anyhow!("[{}] {e}", e.code()))?;
    let resolved =
        confluent_graph::resolve(&graph).map_err(|e| anyhow::anyhow!("[{}] {e}", e.code()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
        return Ok(());
    }

    println!("{}", "Properties".bold().underline());
    let width = resolved.iter().map(|p| p.name.len()).max().unwrap_or(0);
    for property in resolved.iter() {
        let line = format!(
            "  {:<width$}  {:<6}  {}",
            property.name,
            property.value.kind_name(),
            property.value.canonical_text()
        );
        if property.hidden {
            println!("{} {}", line.dimmed(), "(hidden)".dimmed());
        } else {
            println!("{line}");
        }
    }

    let targets: Vec<_> = root.active_languages().map(|l| l.language.name()).collect();
    println!();
    println!(
        "{} {} properties resolved ({} visible), targets: {}",
        "✓".green().bold(),
        resolved.len(),
        resolved.visible().count(),
        if targets.is_empty() {
            "none".to_string()
        } else {
            targets.join(", ")
        }
    );
    Ok(())
}

fn cmd_schema() -> Result<()> {
    let schema = confluent_spec::schema_def::generate_source_schema();
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
