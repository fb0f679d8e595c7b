use clap::Parser;
use lansweep::cli::Cli;
use lansweep::error::exit_codes;
use lansweep::logging::init_logging;
use lansweep::output;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.run().await {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            output::print_error(&e.to_string());
            std::process::exit(e.exit_code());
        }
    }
}
