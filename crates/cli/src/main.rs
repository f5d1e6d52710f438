use std::{fs::OpenOptions, path::PathBuf, sync::Mutex};

use {
    anyhow::Context,
    clap::{Parser, Subcommand},
    herald_channels::ChannelKind,
    herald_config::{Address, HeraldConfig},
    herald_gateway::registry::AddressRegistry,
    tracing::info,
    tracing_subscriber::{
        EnvFilter, Registry, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt,
    },
};

type FilterHandle = reload::Handle<EnvFilter, Registry>;

#[derive(Parser)]
#[command(name = "herald", about = "Herald, notification gateway")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (JSON, TOML or YAML). Discovered when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory receiving `main.log`.
    #[arg(long, global = true, default_value = "logs")]
    log_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error). Defaults to `info`.
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the gateway server.
    Gateway {
        /// Overrides `bind` from the config.
        #[arg(long)]
        bind: Option<String>,
        /// Overrides `port` from the config.
        #[arg(long)]
        port: Option<u16>,
    },
    /// List configured addresses and their channels.
    Addresses,
}

fn init_telemetry(cli: &Cli) -> anyhow::Result<FilterHandle> {
    std::fs::create_dir_all(&cli.log_dir)
        .with_context(|| format!("creating log dir {}", cli.log_dir.display()))?;
    let log_path = cli.log_dir.join("main.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening log file {}", log_path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.as_deref().unwrap_or("info")));
    let (filter, handle) = reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .json()
                .with_file(true)
                .with_line_number(true)
                .with_writer(Mutex::new(log_file)),
        )
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_writer(std::io::stderr),
        )
        .init();

    Ok(handle)
}

/// `debug = true` in the config raises the level only when neither
/// `--log-level` nor `RUST_LOG` chose one.
fn forces_debug(config_debug: bool, log_level: Option<&str>, rust_log_set: bool) -> bool {
    config_debug && log_level.is_none() && !rust_log_set
}

/// One line per address: its name and stored channel list, unknown entries
/// marked.
fn describe_address(name: &str, address: &Address) -> String {
    let channels: Vec<String> = address
        .enabled_channels
        .iter()
        .map(|id| match id.parse::<ChannelKind>() {
            Ok(_) => id.clone(),
            Err(_) => format!("{id} (unknown)"),
        })
        .collect();
    if channels.is_empty() {
        format!("{name}: (no channels)")
    } else {
        format!("{name}: {}", channels.join(", "))
    }
}

fn list_addresses(config: &HeraldConfig) {
    let registry = AddressRegistry::from_config(config);
    if registry.is_empty() {
        println!("no addresses configured");
        return;
    }
    for name in registry.names() {
        if let Some(address) = registry.lookup(name) {
            println!("{}", describe_address(name, address));
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let filter = init_telemetry(&cli)?;

    let config = herald_config::discover_and_load(cli.config.as_deref());
    if forces_debug(
        config.debug,
        cli.log_level.as_deref(),
        std::env::var_os("RUST_LOG").is_some(),
    ) {
        filter.modify(|f| *f = EnvFilter::new("debug"))?;
    }

    info!(version = env!("CARGO_PKG_VERSION"), "herald starting");

    match cli.command {
        Commands::Gateway { bind, port } => {
            let bind = bind.unwrap_or_else(|| config.bind.clone());
            let port = port.unwrap_or(config.port);
            herald_gateway::server::start_gateway(&config, &bind, port).await
        },
        Commands::Addresses => {
            list_addresses(&config);
            Ok(())
        },
    }
}
