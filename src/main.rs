use std::process;
use clap::Parser;

use site_feed::cli::Cli;

fn main() {
    let cli = Cli::parse();

    match cli.run() {
        Ok(_) => {
            // Command completed successfully
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
