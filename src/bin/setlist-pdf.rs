//! Set-list PDF CLI tool
//!
//! A command-line tool for building gig set-list PDFs from song charts.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use log::LevelFilter;

use setlist_pdf::catalog::{import_csv, Catalog};
use setlist_pdf::date::{format_long, parse_gig_date};
use setlist_pdf::delivery::{deliver, output_path};
use setlist_pdf::pdf::{assemble, AssemblyRequest, ChartInventory};
use setlist_pdf::resolve::{build_system_prompt, resolve_setlist};
use setlist_pdf::Config;

/// Set-list PDF - Merge song charts into one gig-ready PDF
#[derive(Parser)]
#[command(name = "setlist-pdf")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Build from codes
    setlist-pdf build --gig-name \"Friday Night\" --gig-date 2026-03-07 --codes \"004, 008, 025\"

    # Build from a saved model reply, for next Saturday
    setlist-pdf build --gig-name \"The Barn\" --gig-date saturday --response reply.txt

    # Print the prompt to give the set-list translator
    setlist-pdf prompt

    # Replace the catalog from a CSV file
    setlist-pdf catalog import songs.csv --save")]
struct Cli {
    /// Catalog store (JSON) [default: $SETLIST_CATALOG or song_data.json]
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Directory holding {code}.pdf charts [default: $SETLIST_CHARTS or song-bank]
    #[arg(long, global = true)]
    charts: Option<PathBuf>,

    /// More output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the set-list PDF
    #[command(group(ArgGroup::new("source").required(true).args(["codes", "response"])))]
    Build {
        /// Gig name (title page and file name)
        #[arg(long)]
        gig_name: String,

        /// Gig date (e.g., "2026-03-07", "03/07/2026", "today", "saturday", "fri+1")
        #[arg(long)]
        gig_date: String,

        /// Comma-separated catalog codes, e.g. "004, 008, 025"
        #[arg(long)]
        codes: Option<String>,

        /// File holding the translator's reply ("-" reads stdin)
        #[arg(long)]
        response: Option<PathBuf>,

        /// Output PDF file path (default: suggested name in --output-dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory for the suggested file name
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// Open the output file after creation
        #[arg(long)]
        open: bool,
    },

    /// Print the set-list translator prompt for the current catalog
    Prompt,

    /// Inspect or replace the song catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },

    /// Check which catalog songs have a chart
    Charts,
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List every catalog entry
    Show,

    /// Read a CSV with index, title and type columns
    Import {
        csv: PathBuf,

        /// Replace the stored catalog (otherwise only preview)
        #[arg(long)]
        save: bool,
    },

    /// Overwrite the store with the built-in songs
    Reset,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::from_env().with_overrides(cli.catalog, cli.charts);

    let result = match cli.command {
        Commands::Build {
            gig_name, gig_date, codes, response, output, output_dir, open,
        } => {
            cmd_build(&config, gig_name, gig_date, codes, response, output, output_dir, open)
        }
        Commands::Prompt => cmd_prompt(&config),
        Commands::Catalog { action } => match action {
            CatalogAction::Show => cmd_catalog_show(&config),
            CatalogAction::Import { csv, save } => cmd_catalog_import(&config, &csv, save),
            CatalogAction::Reset => cmd_catalog_reset(&config),
        },
        Commands::Charts => cmd_charts(&config),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// `RUST_LOG` wins; otherwise warnings, raised by `-v`
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Load the catalog, reporting when the defaults stand in for the store
fn load_catalog(config: &Config) -> Catalog {
    let load = config.load_catalog();
    if let Some(diagnostic) = load.diagnostic {
        eprintln!("Note: {}", diagnostic);
    }
    load.catalog
}

/// Read the translator's reply from a file or stdin
fn read_response(path: &Path) -> Result<String> {
    let mut text = String::new();
    if path == Path::new("-") {
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read response from stdin")?;
    } else {
        text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read response file {}", path.display()))?;
    }
    Ok(text)
}

/// Open a file with the system default application
fn open_file(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        process::Command::new("open").arg(path).spawn()?;
    }
    #[cfg(target_os = "linux")]
    {
        process::Command::new("xdg-open").arg(path).spawn()?;
    }
    #[cfg(target_os = "windows")]
    {
        process::Command::new("cmd")
            .args(["/C", "start", "", &path.display().to_string()])
            .spawn()?;
    }
    Ok(())
}

/// Resolve codes, assemble, and write the PDF
#[allow(clippy::too_many_arguments)]
fn cmd_build(
    config: &Config,
    gig_name: String,
    gig_date: String,
    codes: Option<String>,
    response: Option<PathBuf>,
    output: Option<PathBuf>,
    output_dir: PathBuf,
    open: bool,
) -> Result<()> {
    if gig_name.trim().is_empty() {
        bail!("Gig name is required");
    }
    let gig_date = parse_gig_date(&gig_date)?;

    let text = match (codes, response) {
        (Some(codes), _) => codes,
        (None, Some(path)) => read_response(&path)?,
        (None, None) => bail!("Either --codes or --response is required"),
    };
    let codes = resolve_setlist(&text)?;

    let catalog = load_catalog(config);

    eprintln!(
        "Building '{}' for {} ({} songs)...",
        gig_name,
        format_long(&gig_date),
        codes.len()
    );

    let request = AssemblyRequest {
        codes,
        gig_name,
        gig_date,
        chart_dir: config.chart_dir.clone(),
    };
    let assembled = assemble(&request, &catalog)?;

    for warning in &assembled.warnings {
        eprintln!("Warning: {}", warning);
    }

    let path = output_path(&request.gig_name, &request.gig_date, output.as_deref(), &output_dir);
    let written = deliver(&assembled, &path)?;

    eprintln!(
        "Output: {} ({} pages, {} songs)",
        written.display(),
        assembled.page_count,
        assembled.toc.len()
    );

    if open {
        open_file(&written)?;
    }

    Ok(())
}

fn cmd_prompt(config: &Config) -> Result<()> {
    let catalog = load_catalog(config);
    println!("{}", build_system_prompt(&catalog)?);
    Ok(())
}

fn cmd_catalog_show(config: &Config) -> Result<()> {
    let catalog = load_catalog(config);
    for (code, entry) in catalog.iter() {
        println!("{}  {:<8} {}", code, entry.kind.to_string(), entry.title);
    }
    eprintln!("{} songs", catalog.len());
    Ok(())
}

fn cmd_catalog_import(config: &Config, csv: &Path, save: bool) -> Result<()> {
    let file = File::open(csv).with_context(|| format!("Failed to open {}", csv.display()))?;
    let catalog = import_csv(file).with_context(|| format!("Failed to import {}", csv.display()))?;

    eprintln!("Loaded {} songs from {}", catalog.len(), csv.display());

    if save {
        catalog.save(&config.catalog_path)?;
        eprintln!("Saved to {}", config.catalog_path.display());
    } else {
        for (code, entry) in catalog.iter() {
            println!("{}  {:<8} {}", code, entry.kind.to_string(), entry.title);
        }
        eprintln!("Preview only; pass --save to replace {}", config.catalog_path.display());
    }
    Ok(())
}

fn cmd_catalog_reset(config: &Config) -> Result<()> {
    let catalog = Catalog::defaults();
    catalog.save(&config.catalog_path)?;
    eprintln!(
        "Reset {} to {} default songs",
        config.catalog_path.display(),
        catalog.len()
    );
    Ok(())
}

fn cmd_charts(config: &Config) -> Result<()> {
    let catalog = load_catalog(config);
    let inventory = ChartInventory::scan(&catalog, &config.chart_dir)?;

    for code in &inventory.present {
        println!("ok       {}  {}", code, catalog.title_for(code));
    }
    for code in &inventory.missing {
        println!("missing  {}  {}", code, catalog.title_for(code));
    }
    for code in &inventory.uncatalogued {
        println!("extra    {}.pdf", code);
    }

    eprintln!(
        "{} of {} catalog songs have charts in {}",
        inventory.present.len(),
        catalog.len(),
        config.chart_dir.display()
    );
    Ok(())
}
