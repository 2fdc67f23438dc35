mod args;
mod commands;
mod utils;

use std::process::exit;

use clap::Parser;
use colored::Colorize;

use commands::Commands;

fn main() {
    let commands = Commands::parse();

    if let Err(err) = commands.run() {
        print_error(format!("{err:#}"));
        exit(1);
    }
}

fn print_error(msg: impl Into<String>) {
    eprintln!(
        "{} {}\n\nFor more information, try '{}'.",
        "error:".bold().red(),
        msg.into(),
        "--help".white().bold(),
    );
}
