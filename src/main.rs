use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;
use zscaler_iplist_sync::cli::Cli;
use zscaler_iplist_sync::output::print_result;
use zscaler_iplist_sync::processing::EXIT_FAILURE;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    if let Err(e) = zscaler_iplist_sync::logging::init(cli.verbose) {
        eprintln!("{e}");
        return ExitCode::from(EXIT_FAILURE);
    }
    log::info!("#Start main()");

    match zscaler_iplist_sync::run(&cli).await {
        Ok(result) => {
            print_result(&result);
            ExitCode::from(result.exit_code())
        }
        Err(e) => {
            eprintln!("{} [{}] {e}", "Error:".on_red(), e.kind());
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
