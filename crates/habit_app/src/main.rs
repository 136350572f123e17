use clap::Parser;
use habit_app::app::{run, AppConfig, Cli};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = AppConfig::from_env().and_then(|config| run(cli, config));
    if let Err(err) = result {
        tracing::error!(error = %err, "command failed");
        eprintln!("habits: {err:#}");
        std::process::exit(1);
    }
}
