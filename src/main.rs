use clap::Parser;

use shelfwatch::cli::{self, Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        None => cli::dashboard::run(None),
        Some(Commands::Report { command }) => cli::report::dispatch(command),
        Some(Commands::Status { data }) => cli::status::run(data.as_deref()),
        Some(Commands::Load { path }) => cli::load::run(&path),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
