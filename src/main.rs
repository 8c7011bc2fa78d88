use std::env;
use std::process;

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use kernrig::cli::{execute_command, output, Cli, CliError};
use kernrig::config::Settings;
use kernrig::exitcode;
use kernrig::infrastructure::di::ServiceContainer;

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.debug);

    let code = match run(&cli) {
        Ok(()) => exitcode::OK,
        Err(e) => {
            output::error(&e);
            e.exit_code()
        }
    };
    process::exit(code);
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let project_dir = match &cli.project_dir {
        Some(dir) => dir.clone(),
        None => env::current_dir().map_err(|e| {
            CliError::Usage(format!("cannot determine current directory: {}", e))
        })?,
    };
    let settings = Settings::load(Some(&project_dir))?;
    let container = ServiceContainer::new(settings)?;
    execute_command(cli, &container)
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        3 => LevelFilter::TRACE,
        _ => {
            eprintln!("Don't be crazy, max is -d -d -d");
            LevelFilter::TRACE
        }
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();

    match filter {
        LevelFilter::INFO => tracing::info!("Debug mode: info"),
        LevelFilter::DEBUG => tracing::debug!("Debug mode: debug"),
        LevelFilter::TRACE => tracing::debug!("Debug mode: trace"),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernrig::util::testing;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        testing::init_test_setup();
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn given_repeated_debug_flag_when_parsing_then_counted() {
        let cli = Cli::try_parse_from(["kernrig", "-dd", "config", "show"]).unwrap();
        assert_eq!(cli.debug, 2);
    }
}
