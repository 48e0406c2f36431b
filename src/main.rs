//! Sheetopia - spreadsheet formula engine on the command line

mod config;

use anyhow::{Context, Result, anyhow, bail};
use sheetopia_core::storage::{load_file, markdown_string, save_file, write_markdown};
use sheetopia_core::{CellPos, Document};
use sheetopia_engine::engine::{col_to_letters, display_value, letters_to_col};
use std::env;
use std::fmt;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn print_usage() {
    eprintln!("Usage: sheetopia [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    Snapshot file to open (.json)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --command <FORMULA>   Evaluate a formula and print the result (leading '=' optional)");
    eprintln!("  --at <CELL>               Cell the formula is evaluated at (default: A1)");
    eprintln!("  --set <CELL>=<INPUT>      Set a cell (can be repeated)");
    eprintln!("  --insert-row <N>          Insert a row before row N (can be repeated)");
    eprintln!("  --delete-row <N>          Delete row N (can be repeated)");
    eprintln!("  --insert-col <COL>        Insert a column before column COL (can be repeated)");
    eprintln!("  --delete-col <COL>        Delete column COL (can be repeated)");
    eprintln!("  -o, --output <FILE>       Write the sheet (.md exports markdown, anything else JSON)");
    eprintln!("  --config <FILE>           Settings file (default: user config dir)");
    eprintln!("  -h, --help                Print help");
}

/// An edit requested on the command line, applied in argument order.
#[derive(Debug)]
enum Edit {
    Set(CellPos, String),
    InsertRow(usize),
    DeleteRow(usize),
    InsertColumn(usize),
    DeleteColumn(usize),
}

impl fmt::Display for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edit::Set(pos, input) => write!(f, "--set {}={}", pos, input),
            Edit::InsertRow(at) => write!(f, "--insert-row {}", at + 1),
            Edit::DeleteRow(at) => write!(f, "--delete-row {}", at + 1),
            Edit::InsertColumn(at) => write!(f, "--insert-col {}", col_to_letters(*at)),
            Edit::DeleteColumn(at) => write!(f, "--delete-col {}", col_to_letters(*at)),
        }
    }
}

#[derive(Debug, Default)]
struct Options {
    file_path: Option<PathBuf>,
    command: Option<String>,
    at: Option<CellPos>,
    edits: Vec<Edit>,
    output_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
}

fn parse_cell(name: &str) -> Result<CellPos> {
    CellPos::from_a1(name).ok_or_else(|| anyhow!("Invalid cell: {}", name))
}

/// 1-based row number to a zero-based index.
fn parse_row(arg: &str) -> Result<usize> {
    match arg.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => bail!("Invalid row number: {}", arg),
    }
}

fn parse_column(arg: &str) -> Result<usize> {
    letters_to_col(&arg.trim().to_ascii_uppercase()).ok_or_else(|| anyhow!("Invalid column: {}", arg))
}

fn parse_set(arg: &str) -> Result<Edit> {
    let (cell, input) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("--set expects <CELL>=<INPUT>, got {}", arg))?;
    Ok(Edit::Set(parse_cell(cell)?, input.to_string()))
}

fn next_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("{} requires a value", flag))
}

/// Parse the command line. `Ok(None)` means help was printed.
fn parse_args(args: &[String]) -> Result<Option<Options>> {
    let mut options = Options::default();

    let mut i = 1;
    while i < args.len() {
        let arg = args[i].as_str();
        let mut value = || next_value(args, &mut i, arg);
        match arg {
            "-h" | "--help" => {
                print_usage();
                return Ok(None);
            }
            "-c" | "--command" => options.command = Some(value()?.to_string()),
            "--at" => options.at = Some(parse_cell(value()?)?),
            "--set" => options.edits.push(parse_set(value()?)?),
            "--insert-row" => options.edits.push(Edit::InsertRow(parse_row(value()?)?)),
            "--delete-row" => options.edits.push(Edit::DeleteRow(parse_row(value()?)?)),
            "--insert-col" => options.edits.push(Edit::InsertColumn(parse_column(value()?)?)),
            "--delete-col" => options.edits.push(Edit::DeleteColumn(parse_column(value()?)?)),
            "-o" | "--output" => options.output_file = Some(PathBuf::from(value()?)),
            "--config" => options.config_file = Some(PathBuf::from(value()?)),
            arg if arg.starts_with('-') && arg.len() > 1 => {
                print_usage();
                bail!("Unknown option: {}", arg);
            }
            _ => {
                if options.file_path.is_some() {
                    print_usage();
                    bail!("Unexpected argument: {}", arg);
                }
                options.file_path = Some(PathBuf::from(arg));
            }
        }
        i += 1;
    }
    Ok(Some(options))
}

fn apply_edit(doc: &Document, edit: &Edit) -> sheetopia_core::Result<Document> {
    match edit {
        Edit::Set(pos, input) => doc.set_cell_from_input(*pos, input),
        Edit::InsertRow(at) => doc.add_row(*at),
        Edit::DeleteRow(at) => doc.delete_row(*at),
        Edit::InsertColumn(at) => doc.add_column(*at),
        Edit::DeleteColumn(at) => doc.delete_column(*at),
    }
}

fn run(options: Options) -> Result<()> {
    let config = config::load_config(options.config_file.as_deref())?;

    let mut doc = match &options.file_path {
        Some(path) => load_file(path).with_context(|| format!("failed to open {}", path.display()))?,
        None => Document::from_config(&config),
    };
    for edit in &options.edits {
        tracing::debug!(%edit, "applying edit");
        doc = apply_edit(&doc, edit).with_context(|| format!("failed to apply {}", edit))?;
    }
    let doc = doc.recalculate();

    if let Some(command) = &options.command {
        let formula = if command.starts_with('=') {
            command.clone()
        } else {
            format!("={}", command)
        };
        let anchor = options.at.unwrap_or(CellPos::new(0, 0));
        tracing::debug!(%anchor, %formula, "evaluating command");
        println!("{}", display_value(&doc.evaluate(&formula, anchor)));
    }

    match &options.output_file {
        Some(path) => {
            let is_markdown = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("md"));
            if is_markdown {
                write_markdown(path, &doc)?;
            } else {
                save_file(path, &doc)?;
            }
            tracing::info!(path = %path.display(), markdown = is_markdown, "exported sheet");
            if options.command.is_none() {
                println!("Exported to {}", path.display());
            }
        }
        None if options.command.is_none() => print!("{}", markdown_string(&doc)),
        None => {}
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let options = match parse_args(&args) {
        Ok(Some(options)) => options,
        Ok(None) => return,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(options) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
