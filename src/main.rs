use clap::Parser;
use medadmin::cli::{Cli, run};
use medadmin::logging::init_tracing;
use medadmin_config::LogConfig;

#[tokio::main]
async fn main() {
    medadmin_config::load_dotenv();

    if let Err(e) = init_tracing(&LogConfig::from_env()) {
        eprintln!("⚠️  Failed to initialize logging: {}. Continuing without it...", e);
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("\n❌ {:#}", e);
        std::process::exit(1);
    }
}
