//! Interactive session: one `ViewState` for the lifetime of the process.

use localscout_core::CategoryKey;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::gateway::GatewayClient;
use crate::map::{MapView, Viewport};
use crate::render;
use crate::view_state::ViewState;

const HELP: &str = "commands:
  search <address>     run a search with the current settings
  radius <miles>       set the search radius
  toggle <category>    enable or disable a category
  settings             show radius and category switches
  history              list searches made in this session
  map                  show the map view of the last result
  help                 show this message
  quit                 leave the shell";

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Search(String),
    Radius(f64),
    Toggle(CategoryKey),
    Settings,
    History,
    Map,
    Help,
    Quit,
    Empty,
}

/// Parse one input line.
///
/// # Errors
///
/// Returns a message suitable for printing when the line is not a command.
pub fn parse_line(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(w, r)| (w, r.trim()));

    match word.to_ascii_lowercase().as_str() {
        "" => Ok(ShellCommand::Empty),
        "search" => Ok(ShellCommand::Search(rest.to_string())),
        "radius" => rest
            .parse::<f64>()
            .map(ShellCommand::Radius)
            .map_err(|_| format!("'{rest}' is not a number of miles")),
        "toggle" => rest.parse::<CategoryKey>().map(ShellCommand::Toggle),
        "settings" => Ok(ShellCommand::Settings),
        "history" => Ok(ShellCommand::History),
        "map" => Ok(ShellCommand::Map),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" => Ok(ShellCommand::Quit),
        other => Err(format!("unknown command '{other}'; type 'help'")),
    }
}

/// Read commands from stdin until `quit` or end of input.
///
/// # Errors
///
/// Returns an error only if stdin cannot be read.
pub async fn run_shell(gateway: &GatewayClient, mut state: ViewState) -> anyhow::Result<()> {
    println!("Local Scout shell. Type 'help' for commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_view: Option<MapView> = None;

    while let Some(line) = lines.next_line().await? {
        let command = match parse_line(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        match command {
            ShellCommand::Empty => {}
            ShellCommand::Quit => break,
            ShellCommand::Help => println!("{HELP}"),
            ShellCommand::Settings => print!("{}", render::SettingsView(&state.settings)),
            ShellCommand::History => print!("{}", render::HistoryView(&state)),
            ShellCommand::Radius(miles) => match state.set_radius(miles) {
                Ok(()) => println!("radius set to {miles} miles"),
                Err(e) => println!("{e}"),
            },
            ShellCommand::Toggle(key) => {
                let enabled = state.toggle(key);
                println!("{} {}", key.label(), if enabled { "enabled" } else { "disabled" });
            }
            ShellCommand::Map => match &last_view {
                Some(view) => print!("{}", render::MapSummary(view)),
                None => println!("no search results yet"),
            },
            ShellCommand::Search(address) => {
                let request = match state.begin_search(&address) {
                    Ok(request) => request,
                    Err(blocked) => {
                        println!("{blocked}");
                        continue;
                    }
                };
                println!("Searching for places...");
                let outcome = gateway.search(&request).await;
                state.finish_search(&address, outcome.is_ok());
                match outcome {
                    Ok(response) => {
                        print!("{}", render::ResultsList(&response));
                        last_view = Some(MapView::from_response(&response, Viewport::default()));
                    }
                    Err(e) => {
                        tracing::debug!(error = ?e, "search failed");
                        println!("Failed to search: {e}");
                    }
                }
            }
        }
    }

    Ok(())
}
