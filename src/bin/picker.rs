use anyhow::{bail, Context, Result};
use dotenv::dotenv;
use place_picker::config::Config;
use place_picker::models::Place;
use place_picker::services::{
    Catalog, PickerView, PlacePicker, PlacesClient, SelectionChange, SelectionStore,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

// --- ANSI colors ---
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

const HELP: &str = "\
Commands:
  list              show available places
  picked            show your places
  pick <id>         add a place to your list
  remove <id>       remove a place (asks for confirmation)
  yes | no          answer the confirmation
  near <lat> <lon>  order available places by distance
  reload            fetch the place listing again
  help              show this text
  quit              exit";

#[derive(Debug, PartialEq)]
enum Command {
    List,
    Picked,
    Pick(String),
    Remove(String),
    Confirm,
    Cancel,
    Near(f64, f64),
    Reload,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Option<Command>> {
    let mut parts = line.split_whitespace();
    let Some(word) = parts.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = parts.collect();

    let command = match (word.to_lowercase().as_str(), args.as_slice()) {
        ("list" | "ls", []) => Command::List,
        ("picked", []) => Command::Picked,
        ("pick" | "add", [id]) => Command::Pick(id.to_string()),
        ("remove" | "rm", [id]) => Command::Remove(id.to_string()),
        ("yes" | "y", []) => Command::Confirm,
        ("no" | "n", []) => Command::Cancel,
        ("near", [lat, lon]) => {
            let lat: f64 = lat.parse().context("latitude must be a number")?;
            let lon: f64 = lon.parse().context("longitude must be a number")?;
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                bail!("coordinates out of range");
            }
            Command::Near(lat, lon)
        }
        ("reload", []) => Command::Reload,
        ("help" | "?", []) => Command::Help,
        ("quit" | "exit" | "q", []) => Command::Quit,
        _ => bail!("unknown command '{}', try 'help'", line.trim()),
    };
    Ok(Some(command))
}

fn print_places(title: &str, places: &[Place], fallback: &str) {
    println!("{BOLD}{title}{RESET}");
    if places.is_empty() {
        println!("  {YELLOW}{fallback}{RESET}");
        return;
    }
    for place in places {
        println!("  {CYAN}{:<4}{RESET} {}", place.id, place.title);
    }
}

fn print_status(view: &PickerView) {
    if view.loading {
        println!("{YELLOW}Fetching place data...{RESET}");
    }
    if let Some(err) = &view.load_error {
        println!("{RED}An error occurred: {err}{RESET}");
    }
    if let Some(err) = &view.update_error {
        println!("{RED}An error occurred: {err}{RESET}");
    }
    if view.confirm_open {
        if let Some(id) = &view.pending_removal {
            println!("{BOLD}Are you sure?{RESET} Remove {id} from your list? (yes/no)");
        }
    }
}

fn report(change: SelectionChange) {
    match change {
        SelectionChange::Saved => println!("{GREEN}Saved.{RESET}"),
        SelectionChange::Unchanged => println!("Nothing changed."),
        SelectionChange::RolledBack => {}
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = Config::from_env();
    if let Err(e) = config.validate() {
        bail!("Configuration error: {}", e);
    }

    if std::env::var("RUST_LOG").is_err() {
        // Keep the console readable unless asked otherwise
        std::env::set_var("RUST_LOG", "warn");
    }
    env_logger::init();

    println!("{BOLD}PlacePicker{RESET}");
    println!("Create your personal collection of places you would like to visit or you have visited.\n");

    let client = PlacesClient::from_config(&config)?;
    if !client.check_health().await {
        println!(
            "{YELLOW}Backend at {} is not reachable, showing the bundled catalog.{RESET}",
            client.base_url()
        );
    }

    let catalog = Catalog::builtin()?;
    let store = SelectionStore::new(
        config.selection_store_path.clone(),
        config.selection_storage_key.clone(),
    );
    let mut picker = PlacePicker::new(catalog, store, Arc::new(client));
    picker.load_available();

    let view = picker.view();
    print_places(
        "I'd like to visit ...",
        &view.picked,
        "Select the places you would like to visit below.",
    );
    println!("\nType 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{RED}{e}{RESET}");
                continue;
            }
        };

        // A new command answers or dismisses any stale error
        picker.dismiss_update_error();

        match command {
            Command::List => {
                let state = picker.available_settled().await;
                let view = picker.view();
                print_status(&view);
                if state.error.is_some() {
                    println!("Showing the bundled catalog instead.");
                }
                print_places("Available Places", &view.available, "No places available.");
            }
            Command::Picked => {
                print_places(
                    "I'd like to visit ...",
                    picker.picked(),
                    "Select the places you would like to visit below.",
                );
            }
            Command::Pick(id) => match picker.select_place(&id).await {
                Ok(change) => report(change),
                Err(e) => println!("{RED}{e}{RESET}"),
            },
            Command::Remove(id) => {
                if !picker.start_remove(&id) {
                    println!("{RED}{id} is not in your list{RESET}");
                }
            }
            Command::Confirm => report(picker.confirm_remove().await),
            Command::Cancel => picker.stop_remove(),
            Command::Near(lat, lon) => {
                picker.locate(lat, lon);
                println!("{GREEN}Available places are now sorted by distance.{RESET}");
            }
            Command::Reload => {
                picker.reload_available();
                println!("Reloading places...");
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }

        print_status(&picker.view());
    }

    println!("Bye!");
    Ok(())
}
