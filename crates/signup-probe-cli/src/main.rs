//! signup-probe: run the SwiftAssess signup suite from the command line
//!
//! Exit codes follow the usual test-runner convention: 0 all cases passed,
//! 1 some case failed, 2 usage or infrastructure error, 5 nothing selected.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use clap::Parser;
use signup_probe_cli::{
    list_cases, render_case_json, render_case_table, run_tests, Cli, CliConfig, CliError,
    CliResult, ColorChoice, Commands, ListArgs, TestArgs, Verbosity,
};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_tracing(config.verbosity);

    let result = match cli.command {
        Commands::Test(ref args) => test(&config, args),
        Commands::List(ref args) => list(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::TestsFailed { .. }) => ExitCode::from(1),
        Err(CliError::NothingSelected) => {
            eprintln!("No cases selected");
            ExitCode::from(5)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(2)
        }
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else {
        match cli.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    };

    let color: ColorChoice = cli.color.into();

    CliConfig::new().with_verbosity(verbosity).with_color(color)
}

fn init_tracing(verbosity: Verbosity) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter())),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn test(config: &CliConfig, args: &TestArgs) -> CliResult<()> {
    let outcome = run_tests(config, args)?;
    println!("{}", outcome.render(args.format)?);
    outcome.ensure_passed()
}

fn list(args: &ListArgs) -> CliResult<()> {
    let cases = list_cases(args);
    if args.json {
        let json = serde_json::to_string_pretty(&render_case_json(&cases))
            .map_err(|e| CliError::report_generation(e.to_string()))?;
        println!("{json}");
    } else {
        print!("{}", render_case_table(&cases));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod build_config_tests {
        use super::*;

        #[test]
        fn test_build_config_default() {
            let cli = Cli::parse_from(["signup-probe", "list"]);
            assert_eq!(build_config(&cli).verbosity, Verbosity::Normal);
        }

        #[test]
        fn test_build_config_verbose() {
            let cli = Cli::parse_from(["signup-probe", "-v", "list"]);
            assert_eq!(build_config(&cli).verbosity, Verbosity::Verbose);
        }

        #[test]
        fn test_build_config_debug() {
            let cli = Cli::parse_from(["signup-probe", "-vvv", "list"]);
            assert_eq!(build_config(&cli).verbosity, Verbosity::Debug);
        }

        #[test]
        fn test_build_config_quiet_wins() {
            let cli = Cli::parse_from(["signup-probe", "-q", "-v", "list"]);
            assert_eq!(build_config(&cli).verbosity, Verbosity::Quiet);
        }

        #[test]
        fn test_build_config_color() {
            let cli = Cli::parse_from(["signup-probe", "--color", "never", "list"]);
            assert_eq!(build_config(&cli).color, ColorChoice::Never);
        }
    }
}
