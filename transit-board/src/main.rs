use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono_tz::Tz;
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use transit_board::board::{DEFAULT_TICK, Ticker, Tracking, empty_message};
use transit_board::digitransit::{DEFAULT_BASE_URL, DigitransitClient, DigitransitConfig};
use transit_board::domain::{GtfsId, SystemClock, VehicleMode};
use transit_board::favorites::{FavoritesStore, FileStore};
use transit_board::proxy::{AppState, PROXY_PATH, create_router};
use transit_board::session::{Board, LogNotifier, Session};
use transit_board::transit::{DEFAULT_PROXY_URL, TransitClient, TransitConfig, TransitQuery};

#[derive(Parser, Debug)]
#[command(name = "transit-board", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the Digitransit proxy server
    Serve {
        /// Digitransit subscription key
        #[arg(long, env = "HSL_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Address to listen on
        #[arg(long, env = "TRANSIT_BOARD_BIND", default_value = "127.0.0.1:3000")]
        bind: SocketAddr,

        /// Digitransit GraphQL endpoint
        #[arg(long, env = "DIGITRANSIT_URL", default_value = DEFAULT_BASE_URL)]
        digitransit_url: String,

        /// Departures fetched per stop
        #[arg(long, env = "DEPARTURES_LIMIT", default_value_t = 20)]
        departures_limit: u32,
    },

    /// Search stops by name
    Search {
        /// At least three characters of the stop name
        term: String,

        /// Only show stops served by these modes (e.g. bus,tram)
        #[arg(long = "mode", value_delimiter = ',')]
        modes: Vec<VehicleMode>,

        #[command(flatten)]
        client: ClientArgs,
    },

    /// Add a stop to favorites by GTFS id
    Add {
        gtfs_id: GtfsId,

        #[command(flatten)]
        client: ClientArgs,
    },

    /// Remove a stop from favorites
    Remove {
        gtfs_id: GtfsId,

        #[command(flatten)]
        client: ClientArgs,
    },

    /// List favorite stops
    List {
        #[command(flatten)]
        client: ClientArgs,
    },

    /// Show departures for a favorite stop
    Board {
        gtfs_id: GtfsId,

        /// Only show routes containing this text
        #[arg(long, default_value = "")]
        filter: String,

        /// Keep the board open, refreshing times every 30 seconds
        #[arg(long)]
        watch: bool,

        #[command(flatten)]
        client: ClientArgs,
    },
}

#[derive(Args, Debug)]
struct ClientArgs {
    /// URL of the proxy endpoint
    #[arg(long, env = "TRANSIT_BOARD_PROXY", default_value = DEFAULT_PROXY_URL)]
    proxy: String,

    /// Directory holding saved favorites
    #[arg(long, env = "TRANSIT_BOARD_DATA", default_value = ".transit-board")]
    data_dir: PathBuf,

    /// Time zone for departure times
    #[arg(long, env = "TRANSIT_BOARD_TZ", default_value = "Europe/Helsinki", value_parser = parse_tz)]
    tz: Tz,
}

impl ClientArgs {
    fn session(&self) -> Session<FileStore, LogNotifier> {
        let favorites = FavoritesStore::load(FileStore::new(&self.data_dir));
        Session::new(favorites, LogNotifier)
    }

    fn transit(&self) -> anyhow::Result<TransitClient> {
        TransitClient::new(TransitConfig::new(&self.proxy)).context("failed to create HTTP client")
    }
}

fn parse_tz(s: &str) -> Result<Tz, String> {
    s.parse::<Tz>().map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        // Standard logger, configured via the RUST_LOG env variable
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                ),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            api_key,
            bind,
            digitransit_url,
            departures_limit,
        } => serve(api_key, bind, digitransit_url, departures_limit).await,
        Commands::Search {
            term,
            modes,
            client,
        } => {
            let transit = client.transit()?;
            let mut session = client.session();
            let Ok(stops) = session.search(&transit, &term, &modes).await else {
                bail!("search failed");
            };
            for stop in stops {
                let saved = if session.favorites().contains(&stop.gtfs_id) {
                    "*"
                } else {
                    " "
                };
                println!(
                    "{saved} {} {:<16} {} {}",
                    stop.badge(),
                    stop.gtfs_id,
                    stop.name,
                    stop.code.as_deref().unwrap_or("")
                );
            }
            Ok(())
        }
        Commands::Add { gtfs_id, client } => {
            let transit = client.transit()?;
            let mut session = client.session();
            let details = transit
                .get_stop_departures(&gtfs_id)
                .await
                .with_context(|| format!("could not look up {gtfs_id}"))?;
            let Some(details) = details else {
                bail!("no stop with id {gtfs_id}");
            };
            session.add_favorite(details.stop());
            Ok(())
        }
        Commands::Remove { gtfs_id, client } => {
            let mut session = client.session();
            if session.remove_favorite(&gtfs_id).is_none() {
                bail!("{gtfs_id} is not a favorite stop");
            }
            Ok(())
        }
        Commands::List { client } => {
            let session = client.session();
            if session.favorites().is_empty() {
                println!("No favorite stops yet. Use `transit-board search` to find one.");
            }
            for stop in session.favorites().list() {
                println!(
                    "{} {:<16} {} {}",
                    stop.badge(),
                    stop.gtfs_id,
                    stop.name,
                    stop.code.as_deref().unwrap_or("")
                );
            }
            Ok(())
        }
        Commands::Board {
            gtfs_id,
            filter,
            watch,
            client,
        } => {
            let transit = client.transit()?;
            let mut session = client.session();
            session.set_route_filter(filter);
            session.load_departures(&transit, &gtfs_id).await?;

            if !watch {
                print_board(&session, &chrono::Utc::now().with_timezone(&client.tz));
                return Ok(());
            }

            let mut ticker = Ticker::start(SystemClock, DEFAULT_TICK);
            loop {
                // Clear the screen before redrawing
                print!("\x1b[2J\x1b[H");
                print_board(&session, &ticker.now().with_timezone(&client.tz));
                tokio::select! {
                    tick = ticker.tick() => { tick?; }
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
            Ok(())
        }
    }
}

async fn serve(
    api_key: Option<String>,
    bind: SocketAddr,
    digitransit_url: String,
    departures_limit: u32,
) -> anyhow::Result<()> {
    let config = DigitransitConfig::new(api_key)
        .with_base_url(digitransit_url)
        .with_departures_limit(departures_limit);
    if config.api_key.is_none() {
        warn!("HSL_API_KEY not set; every proxy request will be refused");
    }
    let digitransit = DigitransitClient::new(config).context("failed to create Digitransit client")?;

    let app = create_router(AppState::new(digitransit));

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    info!("transit-board proxy listening on http://{bind}{PROXY_PATH}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;
    Ok(())
}

fn print_board(session: &Session<FileStore, LogNotifier>, now: &chrono::DateTime<Tz>) {
    if let Some(stop) = session.selected() {
        let code = stop.code.as_deref().map(|c| format!(" ({c})")).unwrap_or_default();
        println!("{} {}{code}", stop.badge(), stop.name);
    }
    if !session.route_filter().is_empty() {
        println!("Routes matching \"{}\"", session.route_filter());
    }
    println!();

    match session.board() {
        Board::Ready(_) => {
            let rows = session.rows(now);
            if rows.is_empty() {
                println!("{}", empty_message(session.route_filter()));
            }
            for row in rows {
                let departure = row.departure;
                let canceled = if departure.is_canceled() { "  CANCELED" } else { "" };
                println!(
                    "{:>6} {:<5} {:<24} {}{canceled}",
                    row.label.to_string(),
                    departure.route(),
                    departure.headsign,
                    Tracking::of(departure)
                );
            }
        }
        Board::Failed(message) => println!("{message}"),
        Board::Loading(_) => println!("Loading..."),
        Board::Empty => println!("No stop selected."),
    }
    println!();
    println!("Updated {}", now.format("%H:%M"));
}
