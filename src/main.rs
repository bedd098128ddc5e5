use std::{io, path::PathBuf};

use anyhow::Result;
use clap::Parser;

use reviews::Shell;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Review file in JSON Lines format (prompted for if omitted)
    reviews: Option<PathBuf>,
    /// Directory for exported CSV files (prompted for if omitted)
    #[arg(short, long)]
    export_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let stdin = io::stdin();
    Shell::new(stdin.lock(), io::stdout()).run(args.reviews, args.export_dir)
}
