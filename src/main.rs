use std::sync::Arc;

use clap::Parser;
use log::{error, info};
use tokio::sync::mpsc;

use rideau::capture::session_log::SessionLogger;
use rideau::configuration::config::Args;
use rideau::configuration::types::RelayConfig;
use rideau::network::listener::Listener;
use rideau::resolver;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .init();

    println!(
        "
██████╗ ██╗██████╗ ███████╗ █████╗ ██╗   ██╗
██╔══██╗██║██╔══██╗██╔════╝██╔══██╗██║   ██║
██████╔╝██║██║  ██║█████╗  ███████║██║   ██║
██╔══██╗██║██║  ██║██╔══╝  ██╔══██║██║   ██║
██║  ██║██║██████╔╝███████╗██║  ██║╚██████╔╝
╚═╝  ╚═╝╚═╝╚═════╝ ╚══════╝╚═╝  ╚═╝ ╚═════╝
============================================
   A transparent capturing TCP relay v0.1.0
============================================
"
    );

    let args = Args::parse();

    let public_ip = match args.public_ip {
        Some(ip) => ip,
        None => {
            info!("resolving public address");
            match resolver::public_ip().await {
                Ok(ip) => ip,
                Err(e) => {
                    error!("Unable to resolve the public address: {}", e);
                    std::process::exit(2);
                }
            }
        }
    };

    let config = match RelayConfig::new(args.port, args.addr, public_ip) {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };
    info!(
        "masking backend {} behind {}",
        config.backend_ip, config.public_ip
    );

    let (report_tx, report_rx) = mpsc::channel(128);
    let logger = SessionLogger::new(report_rx, tokio::io::stdout());
    let logger_handle = tokio::spawn(logger.run());

    let dispatcher = Listener::new(Arc::new(config), report_tx);
    let bound = match dispatcher.bind().await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Unable to start listening: {}", e);
            std::process::exit(1);
        }
    };

    tokio::select! {
        _ = dispatcher.serve(bound) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown requested, draining session records");
        }
    }

    // Dropping the dispatcher releases its report sender; the logger exits
    // once the remaining per-session senders are gone and the channel is
    // drained, so no in-flight record is lost on exit.
    drop(dispatcher);
    if let Err(e) = logger_handle.await {
        error!("Error joining the session logger: {:?}", e);
    }
}
