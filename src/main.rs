use std::{path::Path, sync::Arc, time::Duration};

use clap::{Parser, Subcommand};
use color_eyre::{
    Result,
    eyre::{Context, eyre},
};
use cosmosdb_provider::{
    ConfigMessage, ConfigProvider, CosmosDbProvider, CycleScheduler, DialParams, GracefulShutdown,
    MongoDocumentStore,
    config::{AppConfig, ConfigValidator, loader::load_config},
    metrics, tracing_setup,
};
use tokio::sync::mpsc;
use tracing::Instrument;

#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    #[clap(subcommand)]
    command: Option<Commands>,

    #[clap(short, long, default_value = "cosmosdb.toml")]
    config: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one provider cycle and print the snapshot as JSON (default)
    Fetch {
        #[clap(short, long, default_value = "cosmosdb.toml")]
        config: String,
        /// Pretty-print the JSON output
        #[clap(long)]
        pretty: bool,
    },
    /// Re-run the provider on an interval until interrupted
    Watch {
        #[clap(short, long, default_value = "cosmosdb.toml")]
        config: String,
        /// Overrides `schedule.refresh_interval`, e.g. "30s"
        #[clap(short, long)]
        interval: Option<String>,
    },
    /// Validate configuration file
    Validate {
        #[clap(short, long, default_value = "cosmosdb.toml")]
        config: String,
    },
    /// Initialize a new configuration file
    Init {
        #[clap(short, long, default_value = "cosmosdb.toml")]
        config: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    match args.command {
        Some(Commands::Validate { config }) => validate_config_command(&config).await,
        Some(Commands::Init { config }) => init_config_command(&config).await,
        Some(Commands::Watch { config, interval }) => {
            let app_config = load_app_config(&config).await?;
            let interval = match interval {
                Some(raw) => humantime::parse_duration(&raw)
                    .wrap_err_with(|| format!("Invalid interval: {raw}"))?,
                None => app_config
                    .schedule
                    .refresh_interval()
                    .wrap_err("Invalid schedule.refresh_interval")?
                    .ok_or_else(|| {
                        eyre!("No refresh interval: pass --interval or set schedule.refresh_interval")
                    })?,
            };
            watch_command(app_config, interval)
                .instrument(tracing_setup::command_span("watch"))
                .await
        }
        Some(Commands::Fetch { config, pretty }) => {
            let app_config = load_app_config(&config).await?;
            fetch_command(app_config, pretty)
                .instrument(tracing_setup::command_span("fetch"))
                .await
        }
        None => {
            let app_config = load_app_config(&args.config).await?;
            fetch_command(app_config, false)
                .instrument(tracing_setup::command_span("fetch"))
                .await
        }
    }
}

/// Load, validate and apply the ambient parts of the configuration
async fn load_app_config(config_path: &str) -> Result<AppConfig> {
    let app_config = load_config(config_path)
        .await
        .with_context(|| format!("Failed to load config from {config_path}"))?;
    ConfigValidator::validate(&app_config).wrap_err("Invalid configuration")?;

    tracing_setup::init_tracing(&app_config.logging)
        .map_err(|e| eyre!("Failed to initialize tracing: {}", e))?;
    metrics::init_metrics()?;

    tracing::info!(
        "Loaded configuration from {config_path}: {:?}",
        app_config.provider
    );
    Ok(app_config)
}

fn build_provider(app_config: &AppConfig) -> Result<Arc<dyn ConfigProvider>> {
    let params = DialParams::try_from(&app_config.provider)
        .wrap_err("Invalid provider.dial_timeout")?;
    Ok(Arc::new(CosmosDbProvider::new(Arc::new(
        MongoDocumentStore::new(params),
    ))))
}

async fn fetch_command(app_config: AppConfig, pretty: bool) -> Result<()> {
    let provider = build_provider(&app_config)?;
    let (tx, mut rx) = mpsc::channel::<ConfigMessage>(1);

    provider
        .provide(&tx)
        .await
        .with_context(|| format!("Provider cycle against {} failed", app_config.provider.address()))?;

    let message = rx
        .recv()
        .await
        .ok_or_else(|| eyre!("Provider finished without publishing a configuration"))?;
    let output = if pretty {
        serde_json::to_string_pretty(&message)?
    } else {
        serde_json::to_string(&message)?
    };
    println!("{output}");
    Ok(())
}

async fn watch_command(app_config: AppConfig, interval: Duration) -> Result<()> {
    let provider = build_provider(&app_config)?;
    let scheduler = CycleScheduler::new(provider, interval);

    let graceful_shutdown = Arc::new(GracefulShutdown::new());
    let signal_handler_shutdown = graceful_shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = signal_handler_shutdown.run_signal_handler().await {
            tracing::error!("Signal handler error: {}", e);
        }
    });

    // Stand-in for the aggregation side: print every snapshot as one JSON line.
    let (tx, mut rx) = mpsc::channel::<ConfigMessage>(1);
    let printer = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            match serde_json::to_string(&message) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::error!("Failed to encode configuration: {}", e),
            }
        }
    });

    let stats = scheduler.run(tx, graceful_shutdown.shutdown_token()).await;
    printer.await.wrap_err("Snapshot printer task failed")?;

    tracing::info!(
        "Watch finished: {} successful cycles, {} failed",
        stats.succeeded,
        stats.failed
    );
    Ok(())
}

async fn validate_config_command(config_path: &str) -> Result<()> {
    println!("🔍 Validating configuration file: {config_path}");

    if !Path::new(config_path).exists() {
        eprintln!("❌ Error: Configuration file '{config_path}' not found");
        std::process::exit(1);
    }

    let config = match load_config(config_path).await {
        Ok(config) => {
            println!("✅ Configuration parsing: OK");
            config
        }
        Err(e) => {
            eprintln!("❌ Configuration parsing failed:");
            eprintln!("   {e:#}");
            std::process::exit(1);
        }
    };

    match ConfigValidator::validate(&config) {
        Ok(()) => {
            println!("✅ Configuration validation: OK");
            println!();
            println!("📋 Configuration Summary:");
            println!("   • Store Address: {}", config.provider.address());
            println!("   • Database: {}", config.provider.database);
            println!("   • Collection: {}", config.provider.collection_name);
            println!("   • Credentials: {}", config.provider.has_credentials());
            println!("   • Dial Timeout: {}", config.provider.dial_timeout);
            println!(
                "   • Refresh Interval: {}",
                config
                    .schedule
                    .refresh_interval
                    .as_deref()
                    .unwrap_or("single cycle")
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Configuration validation failed:");
            eprintln!("{e}");
            println!();
            println!("💡 Common fixes:");
            println!("   • Set provider.host, provider.database and provider.collection_name");
            println!("   • Use humantime units for durations (e.g. '500ms', '10s', '1m')");
            println!("   • Set provider.username whenever provider.password is set");
            std::process::exit(1);
        }
    }
}

/// Initialize a new configuration file
async fn init_config_command(config_path: &str) -> Result<()> {
    let path = Path::new(config_path);
    if path.exists() {
        eprintln!("❌ Error: Configuration file '{config_path}' already exists");
        std::process::exit(1);
    }

    let default_config = r#"# CosmosDB provider configuration

[provider]
host = "127.0.0.1"
port = 27017
# username = "traefik"
# password = "secret"
database = "test"
collection_name = "traefik"
dial_timeout = "60s"

[logging]
level = "info"
json = false

# Used by `watch`; `fetch` always runs a single cycle
[schedule]
refresh_interval = "30s"
"#;

    tokio::fs::write(path, default_config)
        .await
        .context("Failed to write config file")?;
    println!("✅ Created default configuration at: {config_path}");
    println!("   Run 'cosmosdb-provider fetch --config {config_path}' to fetch a snapshot");
    Ok(())
}
