use clap::Parser;
use roadready::app::{commands, App};
use roadready::utils::error::{ErrorSeverity, RoadReadyError};
use roadready::utils::{logger, validation::Validate};
use roadready::CliConfig;

fn exit_with(e: &RoadReadyError) -> ! {
    tracing::error!("❌ {} (Severity: {:?})", e, e.severity());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 1,      // bad input
        ErrorSeverity::Medium => 2,   // server said no, or unreachable
        ErrorSeverity::High => 1,     // auth or unexpected response
        ErrorSeverity::Critical => 3, // configuration or local IO
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            logger::init_cli_logger(cli.verbose);
            exit_with(&e);
        }
    };

    if config.logging.json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("Resolved config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    let app = match App::from_config(&config) {
        Ok(app) => app,
        Err(e) => exit_with(&e),
    };

    if let Err(e) = commands::run(&app, cli.command).await {
        exit_with(&e);
    }
}
