mod garden;
mod seed;
mod server;
mod settings;

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use garden_core::{InteractionKind, now_utc};
use garden_store::Store;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use uuid::Uuid;

use crate::garden::{GardenError, WaterRequest};
use crate::settings::Settings;

#[derive(Parser)]
#[command(name = "garden", about = "Relationship Garden decay engine CLI and HTTP server")]
struct Cli {
    /// Settings file (default: garden.toml in the data dir, if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database path, overriding settings and GARDEN_DB
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },

    /// Show a user's garden with live health scores
    Garden {
        user_id: String,

        /// Print the full response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Recompute and store every plant's health score
    Refresh { user_id: String },

    /// Log an interaction with a contact
    Water {
        user_id: String,
        contact_id: String,

        /// Interaction type (text, call, email, meeting, coffee, ...)
        #[arg(long, default_value = "other")]
        kind: String,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Replace a user's garden with 50 demo contacts
    Seed {
        user_id: String,

        /// Seed the RNG for a reproducible garden
        #[arg(long)]
        rng_seed: Option<u64>,
    },
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;
    if let Some(db) = &cli.db {
        settings.database = Some(db.clone());
    }
    Ok(settings)
}

fn open_store(settings: &Settings) -> Result<Store> {
    let path = settings.database_path();
    Store::open(&path).with_context(|| format!("failed to open store at {}", path.display()))
}

/// `--verbose` forces debug. Otherwise `RUST_LOG` wins when set; without it
/// the floor is WARN, and `serve` also reports its own INFO lines so the
/// bound address is visible.
fn init_tracing(verbose: bool, serving: bool) {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::filter::LevelFilter;

    let rust_log_set = std::env::var(EnvFilter::DEFAULT_ENV).is_ok_and(|v| !v.trim().is_empty());
    let filter = if verbose {
        EnvFilter::new("debug")
    } else if rust_log_set {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy()
    } else if serving {
        EnvFilter::new("warn,garden=info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, matches!(cli.command, Commands::Serve { .. }));

    let settings = load_settings(&cli)?;

    match &cli.command {
        Commands::Serve { host, port } => cmd_serve(settings, host.as_deref(), *port).await,
        Commands::Garden { user_id, json } => cmd_garden(&settings, user_id, *json),
        Commands::Refresh { user_id } => cmd_refresh(&settings, user_id),
        Commands::Water {
            user_id,
            contact_id,
            kind,
            notes,
        } => cmd_water(&settings, user_id, contact_id, kind, notes.clone()),
        Commands::Seed { user_id, rng_seed } => cmd_seed(&settings, user_id, *rng_seed),
    }
}

async fn cmd_serve(mut settings: Settings, host: Option<&str>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        settings.host = host.to_string();
    }
    if let Some(port) = port {
        settings.port = port;
    }
    let ip: IpAddr = settings
        .host
        .parse()
        .with_context(|| format!("invalid host address: {}", settings.host))?;
    let addr = SocketAddr::new(ip, settings.port);

    let store = open_store(&settings)?;
    let state = server::AppState::new(store, settings.decay, &settings.service_name);
    server::serve(state, addr, &settings.cors.allowed_origins).await
}

fn cmd_garden(settings: &Settings, user_id: &str, json: bool) -> Result<()> {
    let store = open_store(settings)?;
    let view = garden::garden_view(&store, &settings.decay, user_id, now_utc())
        .context("failed to load garden")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    if view.plants.is_empty() {
        println!("(no plants for {user_id})");
        return Ok(());
    }

    for plant in &view.plants {
        let cooling = match plant.days_until_cooling {
            Some(days) => format!("cools in {days:.1}d"),
            None => String::new(),
        };
        println!(
            "  [{}] {:.2} {:<10} {:<25} ({}) {}",
            seed::render_bar(plant.health_score),
            plant.health_score,
            plant.status.as_str(),
            plant.name,
            plant.tier,
            cooling
        );
    }
    println!();
    println!("plants:          {}", view.total_plants);
    println!("avg_health:      {:.4}", view.avg_health);
    println!("needs_attention: {}", view.needs_attention);
    Ok(())
}

fn cmd_refresh(settings: &Settings, user_id: &str) -> Result<()> {
    let store = open_store(settings)?;
    let result =
        garden::refresh_garden(&store, user_id, now_utc()).context("failed to refresh garden")?;
    println!(
        "refreshed {} plants, avg_health={:.4}",
        result.contacts_updated, result.avg_health
    );
    Ok(())
}

fn cmd_water(
    settings: &Settings,
    user_id: &str,
    contact_id: &str,
    kind: &str,
    notes: Option<String>,
) -> Result<()> {
    let contact_id =
        Uuid::parse_str(contact_id).with_context(|| format!("invalid contact id: {contact_id}"))?;
    let kind: InteractionKind = match kind.parse() {
        Ok(kind) => kind,
        Err(e) => bail!("{e}"),
    };

    let store = open_store(settings)?;
    let req = WaterRequest {
        user_id: user_id.to_string(),
        kind,
        notes,
        happened_at: None,
    };
    match garden::water_plant(&store, &settings.decay, contact_id, &req, now_utc()) {
        Ok(resp) => {
            println!(
                "watered {} health={:.2} stage={} status={}",
                resp.contact_id, resp.new_health, resp.new_stage, resp.status
            );
            Ok(())
        }
        Err(GardenError::NotFound { contact_id }) => bail!("contact not found: {contact_id}"),
        Err(e) => Err(e).context("failed to water plant"),
    }
}

fn cmd_seed(settings: &Settings, user_id: &str, rng_seed: Option<u64>) -> Result<()> {
    let store = open_store(settings)?;
    let mut rng = match rng_seed {
        Some(s) => SmallRng::seed_from_u64(s),
        None => SmallRng::from_os_rng(),
    };

    println!("seeding {} contacts for user {user_id}", seed::roster_len());
    let plants = seed::seed_garden(&store, &settings.decay, user_id, &mut rng, now_utc())
        .context("failed to seed garden")?;
    for plant in &plants {
        println!("{}", seed::render_line(plant));
    }
    let history: usize = plants.iter().map(|p| p.history).sum();
    println!(
        "done. seeded {} contacts, {history} past interactions",
        plants.len()
    );
    Ok(())
}
