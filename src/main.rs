use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use log::{debug, error, info};
use nuerovent_ui::{
    app::App,
    config::AppConfig,
    console::Console,
    credential_gate::CredentialGate,
    device_client::Esp32Client,
    dispatcher::DeviceCommandDispatcher,
    http_client::device_http_client,
};
use std::io::Write;
use tokio::io::{BufReader, stdin, stdout};

#[tokio::main]
async fn main() {
    initialize();

    if let Err(e) = run().await {
        error!("application error: {e:#}");
        std::process::exit(1);
    }
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

    // stdout belongs to the console
    builder.target(Target::Stderr).init();

    info!("module version: {}", env!("CARGO_PKG_VERSION"));
}

async fn run() -> Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    info!("target device: {}", config.device.base_url);

    let client = Esp32Client::new(device_http_client()?);
    let dispatcher =
        DeviceCommandDispatcher::new(client).context("failed to create command dispatcher")?;
    let app = App::new(
        CredentialGate::new(config.operator.identities.clone()),
        config.device.clone(),
    );
    let console = Console::new(app, dispatcher);

    tokio::select! {
        result = console.run(BufReader::new(stdin()), stdout()) => result?,
        _ = tokio::signal::ctrl_c() => {
            debug!("ctrl-c received");
        }
    }

    info!("good bye");
    Ok(())
}
