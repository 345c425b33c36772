mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;
mod prompt;

use clap::Parser;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "picfg", &mut std::io::stdout());
            Ok(())
        }

        Command::Extract(args) => {
            // Dropped at the end of this arm, flushing the log before exit.
            let _guard = logging::init(&cli.global.log_file, cli.global.verbose)?;
            tracing::debug!("start tool execution");
            commands::extract::handle(args, &cli.global).await
        }
    }
}
