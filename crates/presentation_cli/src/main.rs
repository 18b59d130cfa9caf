//! transit-cli
//!
//! Command-line front end for querying a transit backend.

#![allow(clippy::print_stdout)]

mod render;

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use application::{
    DeparturesQuery, NearbyQuery, SuggestQuery, TransitProvider, TripPager, TripsQuery,
};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use domain::{Location, Point, ProductSet};
use integration_hafas::{HafasConfig, HafasProvider};
use serde::Deserialize;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// transit-cli
#[derive(Parser)]
#[command(name = "transit-cli")]
#[command(author, version, about = "Query public transit backends", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (TOML)
    #[arg(short, long, env = "TRANSIT_CONFIG")]
    config: Option<PathBuf>,

    /// Backend base URL, overrides the configuration file
    #[arg(long, env = "TRANSIT_BASE_URL")]
    base_url: Option<String>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest locations for a partial name
    Suggest {
        /// Text typed so far
        text: String,

        /// Maximum suggestions
        #[arg(short, long, default_value_t = 0)]
        max: usize,
    },

    /// Stations around a coordinate ("lat,lon") or station id
    Nearby {
        /// Anchor location
        location: String,

        /// Search radius in meters
        #[arg(short, long, default_value_t = 0)]
        distance: u32,

        /// Maximum results
        #[arg(short, long, default_value_t = 0)]
        max: usize,
    },

    /// Departure board of a station
    Departures {
        /// Station id
        station_id: String,

        /// Maximum departures per stop
        #[arg(short, long, default_value_t = 0)]
        max: usize,

        /// One board per sub-stop
        #[arg(long)]
        equivalent: bool,
    },

    /// Trips between two locations
    ///
    /// Locations are station ids, "lat,lon" coordinates or free text.
    /// Example: transit-cli trips "Karlsruhe Hbf" "Heidelberg Hbf" --later 1
    Trips {
        /// Origin
        from: String,

        /// Destination
        to: String,

        /// Intermediate station id
        #[arg(long)]
        via: Option<String>,

        /// Reference time (RFC 3339), defaults to now
        #[arg(long)]
        at: Option<DateTime<Utc>>,

        /// Treat the time as the arrival time
        #[arg(long)]
        arrive: bool,

        /// Product codes to use, e.g. "RTB"
        #[arg(long)]
        products: Option<ProductSet>,

        /// Pages of later trips to load
        #[arg(long, default_value_t = 0)]
        later: u8,

        /// Pages of earlier trips to load
        #[arg(long, default_value_t = 0)]
        earlier: u8,
    },
}

/// Configuration file layout
#[derive(Debug, Default, Deserialize)]
struct CliConfig {
    #[serde(default)]
    hafas: HafasConfig,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Load the backend configuration, falling back to defaults without a file
fn load_config(path: Option<&Path>, base_url: Option<String>) -> anyhow::Result<HafasConfig> {
    let mut config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            toml::from_str::<CliConfig>(&raw)
                .with_context(|| format!("parsing {}", path.display()))?
                .hafas
        },
        None => HafasConfig::default(),
    };
    if let Some(base_url) = base_url {
        config.base_url = base_url;
    }
    Ok(config)
}

/// Interpret a location argument
fn parse_location(input: &str) -> anyhow::Result<Location> {
    let input = input.trim();
    if let Some((lat, lon)) = input.split_once(',') {
        if let (Ok(lat), Ok(lon)) = (lat.trim().parse::<f64>(), lon.trim().parse::<f64>()) {
            return Ok(Location::coord(Point::from_degrees(lat, lon)?));
        }
    }
    if !input.is_empty() && input.chars().all(|c| c.is_ascii_digit()) {
        return Ok(Location::station(input));
    }
    Ok(Location::any(input))
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = log_filter_from_verbosity(cli.verbose);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_config(cli.config.as_deref(), cli.base_url)?;
    debug!(base_url = %config.base_url, "Using backend");
    let provider: Arc<dyn TransitProvider> = Arc::new(HafasProvider::new(&config)?);

    match cli.command {
        Commands::Suggest { text, max } => {
            let query = SuggestQuery::new(text).with_max_results(max);
            let result = provider.suggest_locations(&query).await?;
            if cli.json {
                print_json(&result)?;
            } else {
                print!("{}", render::suggestions(&result));
            }
        },

        Commands::Nearby {
            location,
            distance,
            max,
        } => {
            let query = NearbyQuery::new(parse_location(&location)?)
                .with_max_distance(distance)
                .with_max_results(max);
            let result = provider.query_nearby_locations(&query).await?;
            if cli.json {
                print_json(&result)?;
            } else {
                print!("{}", render::nearby(&result));
            }
        },

        Commands::Departures {
            station_id,
            max,
            equivalent,
        } => {
            let query = DeparturesQuery::new(station_id)
                .with_max_departures(max)
                .with_equivalent_stations(equivalent);
            let result = provider.query_departures(&query).await?;
            if cli.json {
                print_json(&result)?;
            } else {
                print!("{}", render::departures(&result));
            }
        },

        Commands::Trips {
            from,
            to,
            via,
            at,
            arrive,
            products,
            later,
            earlier,
        } => {
            let (from, to) = (parse_location(&from)?, parse_location(&to)?);
            let time = at.unwrap_or_else(Utc::now);
            let mut query = if arrive {
                TripsQuery::arriving(from, to, time)
            } else {
                TripsQuery::departing(from, to, time)
            };
            if let Some(via) = via {
                query = query.with_via(Location::station(via));
            }
            if let Some(products) = products {
                query = query.with_products(products);
            }

            let mut pager = match TripPager::start(Arc::clone(&provider), &query).await? {
                Ok(pager) => pager,
                Err(result) => {
                    if cli.json {
                        print_json(&result)?;
                    } else {
                        print!("{}", render::trips_outcome(&result));
                    }
                    return Ok(());
                },
            };

            for _ in 0..later {
                if !pager.can_query_later() {
                    break;
                }
                let added = pager.later().await?;
                info!(added, "Loaded later trips");
            }
            for _ in 0..earlier {
                if !pager.can_query_earlier() {
                    break;
                }
                let added = pager.earlier().await?;
                info!(added, "Loaded earlier trips");
            }

            if cli.json {
                print_json(pager.trips())?;
            } else {
                print!("{}", render::trips(pager.trips()));
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use domain::{LocationType, Product};

    use super::*;

    #[test]
    fn log_filter_verbosity_zero() {
        assert_eq!(log_filter_from_verbosity(0), "warn");
    }

    #[test]
    fn log_filter_verbosity_one() {
        assert_eq!(log_filter_from_verbosity(1), "info");
    }

    #[test]
    fn log_filter_verbosity_two() {
        assert_eq!(log_filter_from_verbosity(2), "debug");
    }

    #[test]
    fn log_filter_verbosity_three_or_more() {
        assert_eq!(log_filter_from_verbosity(3), "trace");
        assert_eq!(log_filter_from_verbosity(10), "trace");
    }

    #[test]
    fn parse_location_coordinate() {
        let location = parse_location("49.008184, 8.400736").unwrap();
        assert_eq!(location.location_type(), LocationType::Coord);
        let point = location.coordinate().unwrap();
        assert!((point.latitude() - 49.008_184).abs() < 1e-6);
        assert!((point.longitude() - 8.400_736).abs() < 1e-6);
    }

    #[test]
    fn parse_location_out_of_range_coordinate_fails() {
        assert!(parse_location("91,8").is_err());
    }

    #[test]
    fn parse_location_station_id() {
        let location = parse_location("8000191").unwrap();
        assert_eq!(location.location_type(), LocationType::Station);
        assert_eq!(location.id(), Some("8000191"));
    }

    #[test]
    fn parse_location_free_text() {
        let location = parse_location("Karlsruhe, Marktplatz").unwrap();
        assert_eq!(location.location_type(), LocationType::Any);
        assert_eq!(location.name(), Some("Karlsruhe, Marktplatz"));
    }

    #[test]
    fn load_config_defaults_without_file() {
        let config = load_config(None, None).unwrap();
        assert_eq!(config.base_url, HafasConfig::default().base_url);
    }

    #[test]
    fn load_config_from_toml_with_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[hafas]\nbase_url = \"http://localhost:3000\"\nlanguage = \"en\"\ndefault_products = 12"
        )
        .unwrap();

        let config = load_config(Some(file.path()), None).unwrap();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.language, "en");
        assert!(config.default_products.contains(Product::Tram));
        assert!(!config.default_products.contains(Product::Rail));

        let config =
            load_config(Some(file.path()), Some("http://127.0.0.1:9".to_string())).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:9");
        assert_eq!(config.language, "en");
    }

    #[test]
    fn load_config_missing_file_fails() {
        assert!(load_config(Some(Path::new("/nonexistent/transit.toml")), None).is_err());
    }

    #[test]
    fn cli_parses_trips() {
        let cli = Cli::try_parse_from([
            "transit-cli",
            "-vv",
            "trips",
            "Karlsruhe Hbf",
            "8000156",
            "--products",
            "RT",
            "--at",
            "2026-02-11T08:00:00Z",
            "--later",
            "2",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Trips {
            products,
            at,
            later,
            ..
        } = cli.command
        else {
            panic!("expected trips");
        };
        let products = products.unwrap();
        assert!(products.contains(Product::Rail));
        assert!(products.contains(Product::Tram));
        assert!(!products.contains(Product::Bus));
        assert_eq!(at.unwrap().to_rfc3339(), "2026-02-11T08:00:00+00:00");
        assert_eq!(later, 2);
    }

    #[test]
    fn cli_rejects_unknown_product_code() {
        assert!(Cli::try_parse_from(["transit-cli", "trips", "a", "b", "--products", "X"]).is_err());
    }
}
