//! csvgrid - A terminal CSV grid editor with formulas and filters.

mod error;
mod tui;

use std::env;
use std::path::PathBuf;

use anyhow::Context;

fn print_usage() {
    eprintln!("Usage: csvgrid [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]          CSV file to open (created on first save if missing)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -h, --help      Print help");
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut file_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
            _ => {
                if file_path.is_none() {
                    file_path = Some(PathBuf::from(&args[i]));
                } else {
                    eprintln!("Error: Unexpected argument: {}", args[i]);
                    print_usage();
                    std::process::exit(1);
                }
            }
        }
        i += 1;
    }

    let mut app = tui::App::with_file(file_path).context("failed to open file")?;
    tui::run(&mut app).context("terminal session failed")?;
    Ok(())
}
