use clap::Parser;
use hospital_insight::cli::{self, Cli};

fn main() {
    let cli = Cli::parse();
    hospital_insight::init_tracing();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start async runtime: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(cli::run(cli)) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
