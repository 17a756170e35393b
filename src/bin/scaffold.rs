//! scaffold — generate rails scaffold scripts from a schema
//!
//! # Usage
//!
//! ```bash
//! # Search the current directory for schema*.rb and pick tables interactively
//! scaffold
//!
//! # Tables 2 to 4 of a given schema, with migrations
//! scaffold -p db/schema.rb -s '(2..4)' -m
//!
//! # A single table by name, as factories, copied to the clipboard
//! scaffold -t users -f -c
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use colored::*;
use schema_to_scaffold::prelude::*;
use schema_to_scaffold::{clipboard, discovery, exec};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scaffold")]
#[command(version)]
#[command(about = "Generate rails scaffold scripts from a schema.rb", long_about = None)]
#[command(after_help = "EXAMPLES:
    scaffold -p db/schema.rb
    scaffold -p db/schema.rb -s '(4..6)' -m
    scaffold -p ~/app -t users -f --force -c")]
struct Cli {
    /// Path to a schema file, or a directory to search for schema*.rb
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Generate for one table, by number or name
    #[arg(short, long, conflicts_with = "select")]
    table: Option<String>,

    /// Selection expression instead of the prompt: 4, (4..6), [4,6] or *
    #[arg(short, long)]
    select: Option<String>,

    /// Generate factory_girl:model instead of scaffold
    #[arg(short, long)]
    factory: bool,

    /// Let the generator write migrations
    #[arg(short, long)]
    migration: bool,

    /// Overwrite files that already exist
    #[arg(long)]
    force: bool,

    /// Copy the script to the clipboard
    #[arg(short, long)]
    clipboard: bool,

    /// Execute the script
    #[arg(short = 'x', long)]
    exec: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = Config::load()?;
    let path = schema_path(cli, &config)?;

    if cli.verbose {
        eprintln!("{} {}", "Schema:".dimmed(), path.display().to_string().yellow());
    }

    let text = fs::read_to_string(&path)
        .with_context(|| format!("Unable to open file '{}'", path.display()))?;
    let catalogue = schema_to_scaffold::load(&text)
        .with_context(|| format!("Could not find tables in '{}'", path.display()))?;

    let ids = match (&cli.table, &cli.select) {
        (Some(token), _) => match select_by_name_or_id(&catalogue, token) {
            Some(id) => vec![id],
            None => bail!("Could not find table {}", token),
        },
        (None, Some(expr)) => select(&catalogue, expr)
            .with_context(|| format!("Not a valid input. {}", SELECTION_HELP))?,
        (None, None) => prompt_tables(&catalogue)?,
    };

    let options = script_options(cli, &config);
    let scripts = render_selection(&catalogue, &ids, &options)?;
    let output = scripts.concat();

    print!("{}", stdout_text(cli.format, &catalogue, &ids, &scripts, options.target)?);

    if cli.clipboard {
        clipboard::copy(&output)?;
        eprintln!("{}", "(copied to your clipboard)".dimmed());
    }

    if cli.exec {
        exec::run_scripts(&scripts)?;
        eprintln!("{} executed {} script(s)", "✓".green(), scripts.len());
    }

    Ok(())
}

/// Everything written to stdout. Listings, prompts and status lines go to
/// stderr so JSON output stays parseable.
fn stdout_text(
    format: OutputFormat,
    catalogue: &Catalogue,
    ids: &[TableId],
    scripts: &[String],
    target: Target,
) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(format!(
            "\n{}\n\n{}",
            format!("Script for {}:", target).green().bold(),
            scripts.concat()
        )),
        OutputFormat::Json => {
            let entries: Vec<serde_json::Value> = ids
                .iter()
                .zip(scripts)
                .filter_map(|(id, script)| {
                    catalogue.get(*id).map(|table| {
                        serde_json::json!({
                            "id": id,
                            "table": table.name,
                            "script": script.trim_end(),
                        })
                    })
                })
                .collect();
            Ok(format!("{}\n", serde_json::to_string_pretty(&entries)?))
        }
    }
}

/// Flags override the config file, which overrides the defaults.
fn script_options(cli: &Cli, config: &Config) -> ScriptOptions {
    let mut options = config.generate;
    if cli.factory {
        options.target = Target::Factory;
    }
    options.migration |= cli.migration;
    options.force |= cli.force;
    options
}

fn schema_path(cli: &Cli, config: &Config) -> Result<PathBuf> {
    let root = cli
        .path
        .clone()
        .unwrap_or_else(|| config.schema.search_root.clone());
    if discovery::is_schema_file(&root) {
        return Ok(root);
    }

    let found = discovery::find_schema_files(&root)?;
    if let [only] = found.as_slice() {
        return Ok(only.clone());
    }

    eprintln!();
    for (i, path) in found.iter().enumerate() {
        eprintln!("{:>4}. {}", (i + 1).to_string().cyan(), path.display());
    }
    let input = prompt("Select a path to the target schema: ")?;
    input
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|idx| found.get(idx))
        .cloned()
        .with_context(|| format!("Not a valid path number: '{}'", input))
}

fn prompt_tables(catalogue: &Catalogue) -> Result<Vec<TableId>> {
    eprintln!();
    eprintln!("{}", "Loaded tables:".green().bold());
    for (id, name) in list_names(catalogue) {
        eprintln!("{:>4}. {}", id.to_string().cyan(), name.white());
    }
    eprintln!();
    eprintln!("{}", SELECTION_HELP.dimmed());

    let input = prompt("Select a table: ")?;
    select(catalogue, &input).with_context(|| format!("Not a valid input. {}", SELECTION_HELP))
}

fn prompt(message: &str) -> Result<String> {
    eprintln!();
    eprint!("{}", message.bold());
    io::stderr().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        bail!("No input given");
    }
    Ok(line.trim().to_string())
}
