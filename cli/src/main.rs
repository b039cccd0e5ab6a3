mod summary;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wordgrid_core::{
    convert_chapters_to_calendar_years, ChapterCalendar, ChapterRepository, FileChapterRepository,
};

#[derive(Parser)]
#[command(name = "wordgrid")]
#[command(about = "Lays out daily chapter word counts on ISO-week calendar grids", long_about = None)]
struct Cli {
    /// Chapter dataset (.yaml, .yml or .json)
    #[arg(long, global = true, env = "WORDGRID_DATA")]
    data: Option<PathBuf>,

    /// Raise log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Export the year grids and value ranges as JSON
    Grid {
        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print per-year totals
    Summary {
        /// Only show this year
        #[arg(long)]
        year: Option<i32>,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn write_grid(calendar: &ChapterCalendar, pretty: bool, output: Option<PathBuf>) -> Result<()> {
    let mut writer: Box<dyn Write> = match &output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    if pretty {
        serde_json::to_writer_pretty(&mut writer, calendar)?;
    } else {
        serde_json::to_writer(&mut writer, calendar)?;
    }
    writeln!(writer)?;
    writer.flush()?;

    if let Some(path) = output {
        info!(path = %path.display(), years = calendar.data.len(), "wrote grid");
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let repo = FileChapterRepository::new(cli.data)?;
    let chapters = repo
        .list()
        .with_context(|| format!("reading chapters from {}", repo.path().display()))?;
    let calendar = convert_chapters_to_calendar_years(&chapters);

    match cli.command {
        Some(Commands::Grid { pretty, output }) => write_grid(&calendar, pretty, output)?,
        Some(Commands::Summary { year }) => summary::show_summary(&calendar, year),
        None => summary::show_summary(&calendar, None),
    }
    Ok(())
}
