#![allow(clippy::print_stdout)]

use clap::Parser;
use hzn_logger::{LevelFilter, Logger};
use hzn_shell::args::{Cli, ShellCommand};
use hzn_shell::{bootstrap, handlers};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
    let _log = Logger::for_context(env!("CARGO_PKG_NAME"), cli.context(), cli.log_dir.clone())
        .console(true)
        .level(level)
        .init()?;

    let app = bootstrap(&cli)?;

    let output = match &cli.command {
        ShellCommand::Routes {} => handlers::routes(&app),
        ShellCommand::Commands {} => handlers::commands(&app),
        ShellCommand::Events {} => handlers::events(&app),
        ShellCommand::Config { key } => handlers::config(&app, key)?,
        ShellCommand::Publish { tag, force } => handlers::publish(&app, tag.as_deref(), *force)?,
        ShellCommand::Status {} => handlers::status(&app),
    };
    print!("{output}");

    Ok(())
}
