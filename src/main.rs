use clap::Parser;
use std::sync::Arc;

use hello_web::cli::Cli;
use hello_web::config::{AppState, Config};
use hello_web::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cfg = Config::load(&cli)?;
    logger::init(&cfg)?;

    // Worker threads from config, CPU count otherwise
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let state = Arc::new(AppState::new(&cfg)?);
    let listener = server::create_reusable_listener(addr)?;

    server::start_signal_handler(Arc::clone(&state.shutdown))?;
    logger::log_server_start(&listener.local_addr()?, &cfg);

    server::run(listener, state).await?;
    Ok(())
}
