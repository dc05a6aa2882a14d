//! ident CLI binary entrypoint.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ident_cli::cli::{Cli, Commands};
use ident_cli::commands::{SidCommand, SipCommand};
use ident_cli::output::OutputFormat;
use ident_cli::{CliError, Session};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(cli.verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let format = OutputFormat::new(cli.format).with_columns(cli.columns.clone());
    let session = Session::from_cli(&cli);
    let mut stdout = io::stdout().lock();

    match &cli.command {
        Commands::Sid { command } => {
            let cmd = SidCommand::new(&session);
            cmd.execute(&mut stdout, &format, command).await?;
        }
        Commands::Sip { command } => {
            let cmd = SipCommand::new(&session);
            cmd.execute(&mut stdout, &format, command).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ident_cli::SidCommands;

    #[test]
    fn verbosity_levels() {
        assert_eq!(default_level(0), "warn");
        assert_eq!(default_level(1), "info");
        assert_eq!(default_level(2), "debug");
        assert_eq!(default_level(7), "trace");
    }

    #[test]
    fn parses_sid_show() {
        let cli = Cli::parse_from(["ident", "sid", "show", "blue"]);
        assert!(matches!(
            cli.command,
            Commands::Sid { command: SidCommands::Show { ref sid } } if sid == "blue"
        ));
    }
}
