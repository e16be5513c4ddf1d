// SPDX-License-Identifier: Unlicense
use bonsai_shift::driver;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shiftc")]
#[command(version)]
#[command(about = "Rewrite multiplication and division by powers of two into shifts")]
struct Cli {
    /// Source file to rewrite
    file: PathBuf,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log every applied rewrite
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let result = driver::optimize_file(&cli.file).and_then(|out| match &cli.output {
        Some(path) => Ok(std::fs::write(path, out)?),
        None => {
            print!("{}", out);
            Ok(())
        }
    });
    if let Err(e) = result {
        eprintln!("failed to optimize:\n{:#}", e);
        std::process::exit(1);
    }
}
