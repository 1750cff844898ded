use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

use hello_gate::auth::AuthService;
use hello_gate::config::ServerConfig;
use hello_gate::constants::LOG_TARGET;
use hello_gate::routes;

#[tokio::main]
async fn main() {
    // Load .env before the logger so RUST_LOG from the file applies
    let dotenv_result = dotenvy::dotenv();

    // Initialize logging
    env_logger::init();

    match dotenv_result {
        Ok(path) => info!("Environment variables loaded from {}", path.display()),
        Err(e) => warn!("Failed to load .env file: {}", e),
    };

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Configuration: host={}, port={}, token_ttl_ms={}, tls={}",
        config.host,
        config.port,
        config.token_ttl.as_millis(),
        config.enable_tls
    );
    if config.development_mode {
        warn!("Development mode is enabled: demo credentials are exposed on /api/auth/help");
    }

    // Seeding hashes passwords, which is slow by design
    let service_config = config.clone();
    let service = match tokio::task::spawn_blocking(move || AuthService::from_config(&service_config)).await {
        Ok(Ok(service)) => Arc::new(service),
        Ok(Err(e)) => {
            error!("Failed to initialize authentication service: {}", e);
            std::process::exit(1);
        }
        Err(e) => {
            error!("Authentication service initialization panicked: {}", e);
            std::process::exit(1);
        }
    };

    let api = routes(service, config.development_mode).with(warp::log(LOG_TARGET));

    // Build the server address
    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to parse server address: {}", e);
            std::process::exit(1);
        }
    };

    match (config.enable_tls, config.tls_cert_path, config.tls_key_path) {
        (true, Some(cert_path), Some(key_path)) => {
            info!("Starting Hello Gate server on https://{}", addr);
            warp::serve(api)
                .tls()
                .cert_path(cert_path)
                .key_path(key_path)
                .run(addr)
                .await;
        }
        _ => {
            info!("Starting Hello Gate server on http://{}", addr);
            warp::serve(api).run(addr).await;
        }
    }
}
