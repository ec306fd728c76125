mod platform;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = platform::cli::Cli::parse();
    platform::logging::initialize(cli.log.into(), cli.level());

    let outcome = platform::app::run_cli(&cli)?;
    if !outcome.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
