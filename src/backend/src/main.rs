use actix_web::{App, HttpServer};
use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use espurna_ui::{
    api::{self, Api},
    config::AppConfig,
};
use log::{error, info};
use std::io::Write;

#[actix_web::main]
async fn main() {
    if let Err(e) = run().await {
        error!("application error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    initialize();

    let config = AppConfig::init().context("failed to load application configuration")?;
    let ui_port = config.ui.port;
    let api = Api::new(config);

    info!("device endpoints: {:?}", config.device.endpoints);
    info!(
        "serving {} on port {ui_port}",
        config.paths.static_dir.display()
    );

    HttpServer::new(move || App::new().configure(api::configure(api.clone())))
        .bind(format!("0.0.0.0:{ui_port}"))
        .context("failed to bind server")?
        .run()
        .await
        .context("server stopped with error")
}

fn initialize() {
    log_panics::init();

    let mut builder = if cfg!(debug_assertions) {
        Builder::from_env(Env::default().default_filter_or("debug"))
    } else {
        Builder::from_env(Env::default().default_filter_or("info"))
    };

    builder.format(|f, record| match record.level() {
        log::Level::Error => {
            eprintln!("{}", record.args());
            Ok(())
        }
        _ => {
            writeln!(f, "{}", record.args())
        }
    });

    builder.target(Target::Stdout).init();

    info!("module version: {}", env!("CARGO_PKG_VERSION"));
}
