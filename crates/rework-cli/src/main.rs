//! rework CLI - resolve code-modification tool configurations
//!
//! Commands:
//! - plan: print the files, rules and work items a configuration selects
//! - process: run every work item through the configured engine
//! - sets: list the rule sets of the catalog
//! - rules: list the rules a set expands to, or every rule of a tool

mod config;
mod output;
mod process;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

use config::{load_explicit, Config, Loaded};
use output::{OutputFormat, Reporter};
use process::CommandEngine;
use rework_core::logging;
use rework_core::{
    run_work_items, Catalog, FileListing, KindApplicability, LayeredCatalog, PathPattern, Plan,
    Resolver, RuleId, RuleOverride, RuleSetReference, RunMode, Tool,
};
use rework_sets::{load_catalog_file, BuiltinCatalog};

#[derive(Parser)]
#[command(name = "rework")]
#[command(version)]
#[command(about = "Resolve Rector, Fractor and PHP-CS-Fixer configurations into work items")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to config file: .rework.toml, rector.php, fractor.php or .php-cs-fixer.php
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Ignore config files and process the current directory
    #[arg(long, global = true, conflicts_with = "config")]
    no_config: bool,

    /// Tool to use without a config file, or to list sets for
    #[arg(long, global = true, value_name = "TOOL")]
    tool: Option<String>,

    /// Rule sets to apply (can be specified multiple times). Overrides config file.
    #[arg(long = "set", global = true, value_name = "SET")]
    sets: Vec<String>,

    /// Rules to skip (can be specified multiple times)
    #[arg(long = "skip-rule", global = true, value_name = "RULE")]
    skip_rules: Vec<String>,

    /// Output format: text, json
    #[arg(long, global = true, value_name = "FORMAT")]
    format: Option<String>,

    /// Shorthand for --format json
    #[arg(long, global = true, conflicts_with = "format")]
    json: bool,

    /// Show verbose output
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Write a log file to the temp directory
    #[arg(long, global = true)]
    log: bool,

    /// Write a log file to this path
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Show the resolved files, rules and work items
    Plan,
    /// Run every work item through the configured engine
    Process {
        /// Report what would change without writing
        #[arg(long, short = 'n')]
        dry_run: bool,
    },
    /// List available rule sets
    Sets,
    /// List the rules a set expands to, or every known rule without a set
    Rules {
        /// Set identifier, e.g. LevelSetList::UP_TO_PHP_82
        set: Option<String>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red(), e);
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.log || cli.log_file.is_some() {
        let path = logging::init_logger(cli.log_file.as_deref())
            .context("Failed to create log file")?;
        if cli.verbose {
            eprintln!("{}: {}", "Logging to".bold(), path.display());
        }
    }

    match &cli.command {
        Command::Plan => {
            let loaded = load(&cli)?;
            let format = output_format(&cli, &loaded)?;
            let catalog = build_catalog(&loaded.extra_catalogs)?;
            let plan = resolve(&loaded, &catalog)?;

            let mut reporter = Reporter::new(format, cli.verbose);
            reporter.report_plan(plan, true);
            reporter.finish()?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Process { dry_run } => {
            let loaded = load(&cli)?;
            let format = output_format(&cli, &loaded)?;
            let catalog = build_catalog(&loaded.extra_catalogs)?;
            let tool = loaded.configuration.tool;
            let Some(engine) = CommandEngine::from_config(&loaded.engine, tool, &loaded.base_dir)
            else {
                bail!("No engine configured. Set [engine] command in {}", config::CONFIG_FILE_NAME);
            };
            let plan = resolve(&loaded, &catalog)?;

            let mode = if *dry_run { RunMode::DryRun } else { RunMode::Apply };
            if cli.verbose && format == OutputFormat::Text {
                println!("{}: {}", "Mode".bold(), mode.as_str());
            }

            let report = run_work_items(&plan, &engine, mode);
            let mut reporter = Reporter::new(format, cli.verbose);
            reporter.report_plan(plan, false);
            reporter.report_run(report, mode);

            let summary = reporter.summary().clone();
            reporter.finish()?;

            Ok(if summary.failed > 0 {
                ExitCode::from(1)
            } else if mode == RunMode::DryRun && summary.changed > 0 {
                ExitCode::from(2)
            } else {
                ExitCode::SUCCESS
            })
        }
        Command::Sets => {
            let (tools, extra, format) = listing_context(&cli)?;
            let catalog = build_catalog(&extra)?;
            list_sets(&catalog, &tools, format)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Rules { set } => {
            let (tools, extra, format) = listing_context(&cli)?;
            let catalog = build_catalog(&extra)?;
            match set {
                Some(set) => list_set_rules(&catalog, &tools, set, format),
                None => {
                    list_tool_rules(&catalog, &tools, format)?;
                    Ok(ExitCode::SUCCESS)
                }
            }
        }
    }
}

/// Load the configuration the commands run against, then apply flag
/// overrides
fn load(cli: &Cli) -> Result<Loaded> {
    let cwd = std::env::current_dir()?;

    let mut loaded = if cli.no_config {
        Loaded::bare(cli_tool(cli)?.unwrap_or(Tool::Rector), &cwd)
    } else if let Some(path) = &cli.config {
        let path = cwd.join(path);
        logging::log_config_load(&path);
        load_explicit(&path)?
    } else {
        match Config::load()? {
            Some((config, path)) => {
                logging::log_config_load(&path);
                config.into_loaded(&path)?
            }
            None => bail!(
                "No {} found. Use --config to point at one, or --no-config",
                config::CONFIG_FILE_NAME
            ),
        }
    };

    if cli.verbose {
        if let Some(origin) = &loaded.origin {
            eprintln!("{}: {}", "Using config".bold(), origin.display());
        }
    }

    let configuration = &mut loaded.configuration;
    if !cli.sets.is_empty() {
        configuration.sets = cli.sets.iter().map(RuleSetReference::new).collect();
    }
    for rule in &cli.skip_rules {
        configuration.overrides.push(RuleOverride::skip(rule.as_str()));
    }

    Ok(loaded)
}

fn cli_tool(cli: &Cli) -> Result<Option<Tool>> {
    cli.tool
        .as_deref()
        .map(|name| {
            Tool::from_str(name).ok_or_else(|| {
                anyhow::anyhow!("Unknown tool '{}'. Valid options: rector, fractor, fixer", name)
            })
        })
        .transpose()
}

fn output_format(cli: &Cli, loaded: &Loaded) -> Result<OutputFormat> {
    if cli.json {
        return Ok(OutputFormat::Json);
    }
    let name = cli
        .format
        .as_deref()
        .or(loaded.format.as_deref())
        .unwrap_or("text");
    OutputFormat::from_str(name).ok_or_else(|| {
        anyhow::anyhow!("Invalid output format '{}'. Valid options: text, json", name)
    })
}

/// Extra YAML catalogs first, so they can shadow built-in sets
fn build_catalog(extra: &[PathBuf]) -> Result<LayeredCatalog> {
    let mut catalog = LayeredCatalog::new();
    for path in extra {
        let layer = load_catalog_file(path)
            .with_context(|| format!("Failed to load catalog {}", path.display()))?;
        logging::log(&format!("Loaded catalog layer {}", path.display()));
        catalog.push(Box::new(layer));
    }
    catalog.push(Box::new(BuiltinCatalog::new()));
    Ok(catalog)
}

/// Snapshot the filesystem below every include pattern and resolve
fn resolve(loaded: &Loaded, catalog: &LayeredCatalog) -> Result<Plan> {
    let configuration = &loaded.configuration;

    let mut roots = Vec::new();
    for raw in configuration.include_patterns() {
        let pattern = PathPattern::parse(raw)?;
        let base = pattern.base();
        roots.push(if base.as_os_str().is_empty() {
            loaded.base_dir.clone()
        } else {
            base.to_path_buf()
        });
    }
    let listing = FileListing::scan(&roots).context("Failed to scan include paths")?;

    let predicate = KindApplicability::new(catalog, configuration.tool);
    let plan = Resolver::new(catalog)
        .resolve(configuration, &listing, &predicate)
        .context("Invalid configuration")?;
    Ok(plan)
}

/// Tools, extra catalogs and format for the listing commands. A config
/// file is optional here.
fn listing_context(cli: &Cli) -> Result<(Vec<Tool>, Vec<PathBuf>, OutputFormat)> {
    let loaded = if cli.no_config {
        None
    } else if let Some(path) = &cli.config {
        Some(load_explicit(&std::env::current_dir()?.join(path))?)
    } else {
        match Config::load()? {
            Some((config, path)) => Some(config.into_loaded(&path)?),
            None => None,
        }
    };

    let tools = match (cli_tool(cli)?, &loaded) {
        (Some(tool), _) => vec![tool],
        (None, Some(loaded)) => vec![loaded.configuration.tool],
        (None, None) => Tool::ALL.to_vec(),
    };
    let extra = loaded
        .as_ref()
        .map(|l| l.extra_catalogs.clone())
        .unwrap_or_default();
    let format = match &loaded {
        Some(loaded) => output_format(cli, loaded)?,
        None if cli.json => OutputFormat::Json,
        None => match cli.format.as_deref() {
            Some(name) => OutputFormat::from_str(name).ok_or_else(|| {
                anyhow::anyhow!("Invalid output format '{}'. Valid options: text, json", name)
            })?,
            None => OutputFormat::Text,
        },
    };

    Ok((tools, extra, format))
}

#[derive(Serialize)]
struct SetListing {
    tool: Tool,
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

fn list_sets(catalog: &dyn Catalog, tools: &[Tool], format: OutputFormat) -> Result<()> {
    let listing: Vec<SetListing> = tools
        .iter()
        .flat_map(|&tool| {
            catalog.set_ids(tool).into_iter().map(move |id| SetListing {
                tool,
                description: catalog.set_description(tool, &id),
                id,
            })
        })
        .collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&listing)?),
        OutputFormat::Text => {
            let mut current = None;
            for set in &listing {
                if current != Some(set.tool) {
                    println!("{}", format!("Available {} sets:", set.tool).bold());
                    current = Some(set.tool);
                }
                match &set.description {
                    Some(description) => println!("  {} - {}", set.id.green(), description),
                    None => println!("  {}", set.id.green()),
                }
            }
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct RuleListing {
    tool: Tool,
    id: String,
    description: String,
    risky: bool,
}

fn rule_listing(catalog: &dyn Catalog, tool: Tool, ids: Vec<RuleId>) -> Vec<RuleListing> {
    ids.into_iter()
        .map(|id| {
            let info = catalog.rule_info(tool, &id);
            RuleListing {
                tool,
                description: info.as_ref().map(|i| i.description.clone()).unwrap_or_default(),
                risky: info.is_some_and(|i| i.risky),
                id: id.to_string(),
            }
        })
        .collect()
}

fn print_rules(rules: &[RuleListing]) {
    for rule in rules {
        let marker = if rule.risky {
            " [risky]".yellow().to_string()
        } else {
            String::new()
        };
        if rule.description.is_empty() {
            println!("  {}{}", rule.id.green(), marker);
        } else {
            println!("  {}{} - {}", rule.id.green(), marker, rule.description);
        }
    }
}

fn list_set_rules(
    catalog: &dyn Catalog,
    tools: &[Tool],
    set: &str,
    format: OutputFormat,
) -> Result<ExitCode> {
    let Some(tool) = tools
        .iter()
        .copied()
        .find(|&tool| catalog.set_ids(tool).iter().any(|id| id == set))
    else {
        eprintln!(
            "{}: Unknown rule set '{}'. Use 'rework sets' to see available sets.",
            "Error".red(),
            set
        );
        return Ok(ExitCode::from(1));
    };

    let rules = rule_listing(catalog, tool, catalog.expand_set(tool, set)?);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rules)?),
        OutputFormat::Text => {
            println!("{}", format!("Rules in {} ({}):", set, tool).bold());
            print_rules(&rules);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn list_tool_rules(catalog: &dyn Catalog, tools: &[Tool], format: OutputFormat) -> Result<()> {
    let listing: Vec<Vec<RuleListing>> = tools
        .iter()
        .map(|&tool| rule_listing(catalog, tool, catalog.rule_ids(tool)))
        .collect();

    match format {
        OutputFormat::Json => {
            let flat: Vec<&RuleListing> = listing.iter().flatten().collect();
            println!("{}", serde_json::to_string_pretty(&flat)?);
        }
        OutputFormat::Text => {
            for (tool, rules) in tools.iter().zip(&listing) {
                println!("{}", format!("Available {} rules:", tool).bold());
                print_rules(rules);
            }
        }
    }
    Ok(())
}
