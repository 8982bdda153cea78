use anyhow::Result;
use msrv::{
    cli,
    config::Config,
    setup_logging,
    utils::{ProcessRunner, output},
};
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    // Parse command line arguments
    let args = cli::parse_args();

    // Setup logging based on debug flag
    setup_logging(args.debug)?;

    let outcome = Config::from_args(&args).and_then(|config| {
        let runner = ProcessRunner::new(config.debug);
        cli::execute_command(&config, &args.command, &runner)
    });

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            output::error(&err.to_string());
            Ok(ExitCode::from(err.exit_status()))
        }
    }
}
