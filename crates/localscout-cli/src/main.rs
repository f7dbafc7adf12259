mod gateway;
mod map;
mod render;
mod shell;
mod view_state;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use localscout_core::{CategoryKey, Taxonomy};
use tracing_subscriber::EnvFilter;

use crate::gateway::{prediction_description, GatewayClient, DEFAULT_API_URL};
use crate::map::{MapView, Viewport};
use crate::view_state::{SearchSettings, ViewState, DEFAULT_RADIUS_MILES};

#[derive(Debug, Parser)]
#[command(name = "localscout")]
#[command(about = "Local Scout: find what is near an address")]
struct Cli {
    /// Base URL of the gateway API
    #[arg(long, global = true, env = "LOCALSCOUT_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,
    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = 60)]
    timeout_secs: u64,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search for places around an address
    Search {
        address: String,
        /// Search radius in miles
        #[arg(long, default_value_t = DEFAULT_RADIUS_MILES)]
        radius: f64,
        /// Category to leave out (repeatable)
        #[arg(long = "disable", value_name = "CATEGORY")]
        disable: Vec<CategoryKey>,
        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
        /// Also print the map view (markers, bounds, zoom)
        #[arg(long)]
        map: bool,
    },
    /// Suggest addresses for partial input
    Autocomplete { input: String },
    /// Print the category taxonomy
    Categories {
        /// Replacement taxonomy YAML file
        #[arg(long, env = "LOCALSCOUT_TAXONOMY_PATH")]
        taxonomy: Option<PathBuf>,
    },
    /// Interactive session with settings and history
    Shell,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let gateway = GatewayClient::new(&cli.api_url, cli.timeout_secs)?;

    match cli.command {
        Some(Commands::Search {
            address,
            radius,
            disable,
            json,
            map,
        }) => {
            let mut settings = SearchSettings::default();
            for key in disable {
                settings.categories.set(key, false);
            }
            let mut state = ViewState::new(settings);
            state.set_radius(radius)?;
            let request = state.begin_search(&address).map_err(|e| anyhow::anyhow!("{e}"))?;

            let response = gateway.search(&request).await?;
            state.finish_search(&address, true);

            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print!("{}", render::ResultsList(&response));
            }
            if map {
                let view = MapView::from_response(&response, Viewport::default());
                print!("{}", render::MapSummary(&view));
            }
        }
        Some(Commands::Autocomplete { input }) => {
            let predictions = gateway.autocomplete(&input).await?;
            if predictions.is_empty() {
                println!("no suggestions");
            }
            for description in predictions.iter().filter_map(prediction_description) {
                println!("{description}");
            }
        }
        Some(Commands::Categories { taxonomy }) => {
            let taxonomy = Taxonomy::load(taxonomy.as_deref())?;
            print!("{}", render::TaxonomyList(&taxonomy));
        }
        Some(Commands::Shell) | None => {
            shell::run_shell(&gateway, ViewState::default()).await?;
        }
    }

    Ok(())
}
