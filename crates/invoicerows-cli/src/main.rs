mod commands;
mod output;

use clap::Parser;
use invoicerows_core::rows::BODY_FONT;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "invoicerows",
    version,
    about = "Print the text rows of a PDF invoice, optionally limited to marker-bounded ranges"
)]
struct Cli {
    /// Path to the PDF invoice
    input_file: PathBuf,

    /// Start printing at the first row containing this text
    #[arg(
        short = 's',
        long = "start",
        visible_alias = "from",
        visible_short_alias = 'f',
        default_value = "",
        hide_default_value = true
    )]
    start: String,

    /// Stop printing after the first row (from the start row on) containing this text
    #[arg(
        short = 'e',
        long = "end",
        visible_alias = "to",
        visible_short_alias = 't',
        default_value = "",
        hide_default_value = true
    )]
    end: String,

    /// JSON file of start/end marker pairs, read only when --start is not given.
    /// Defaults to the program name with a .json extension
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Font id of the body text to keep
    #[arg(long, value_name = "ID", default_value = BODY_FONT)]
    font: String,

    /// Print the converted XML instead of rows
    #[arg(long)]
    dump_xml: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

/// Marker file named after the running program, e.g. `invoicerows.json`.
fn default_config_path(program: &Path) -> PathBuf {
    match program.file_name() {
        Some(name) => PathBuf::from(name).with_extension("json"),
        None => PathBuf::from("invoicerows.json"),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = if cli.dump_xml {
        commands::xml::run(&cli.input_file)
    } else {
        let config_path = cli.config.clone().unwrap_or_else(|| {
            let program = std::env::args_os().next().map(PathBuf::from).unwrap_or_default();
            default_config_path(&program)
        });
        let options = commands::rows::RunOptions {
            start: cli.start,
            end: cli.end,
            config_path,
            body_font: cli.font,
        };
        commands::rows::run(&cli.input_file, &options)
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
