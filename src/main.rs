use lector::{
    cli::Cli,
    clock::MonotonicTime,
    config::{Config, get_app_data_prefix},
    logging::{self, LogLevel},
    session::ReadingSession,
    sources::{Catalog, read_local},
    state::{ReadingStore, State},
    tokenizer::tokenize,
    ui::{reader::Reader, windows::library::LibraryWindow},
};

use clap::Parser;
use eyre::Result;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(LogLevel::from_verbosity(cli.verbose, cli.debug));

    if let Some(path) = &cli.dump {
        return dump_content(path);
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path.clone())?,
        None => Config::new()?,
    };

    if cli.history {
        return print_history();
    }
    if let Some(id) = &cli.delete {
        return delete_reading(id);
    }
    if cli.catalog {
        return list_catalog(&config);
    }
    if let Some(path) = &cli.fetch {
        return fetch_story(&config, path);
    }

    run_tui(config, cli.file.as_deref())
}

fn run_tui(config: Config, file: Option<&Path>) -> Result<()> {
    let log_path = get_app_data_prefix()?.join("lector.log");
    if let Err(err) = logging::redirect_to_file(&log_path) {
        logging::warn(format!("Could not open {}: {}", log_path.display(), err));
    }

    let mut reader = Reader::new(config, State::new()?)?;
    let result = reader.open(file).and_then(|_| reader.run());

    logging::redirect_to_stderr();
    result
}

fn dump_content(path: &Path) -> Result<()> {
    let imported = read_local(path)?;
    for (index, word) in tokenize(&imported.content).iter().enumerate() {
        println!("{}\t{}\t{}", index, word.text, word.orp_index);
    }
    Ok(())
}

fn print_history() -> Result<()> {
    let readings = State::new()?.get_all_readings()?;
    if readings.is_empty() {
        println!("Library is empty");
        return Ok(());
    }
    for reading in &readings {
        println!("{}  {}", reading.id, LibraryWindow::format_item(reading));
    }
    Ok(())
}

fn delete_reading(id: &str) -> Result<()> {
    let mut state = State::new()?;
    match state.get_reading(id)? {
        Some(reading) => {
            state.delete_reading(id)?;
            println!("Deleted {}", reading.name);
            Ok(())
        }
        None => Err(eyre::eyre!("No reading with id {}", id)),
    }
}

fn open_catalog(config: &Config) -> Result<Catalog> {
    let cache_dir = get_app_data_prefix()?.join("cache");
    Ok(Catalog::new(&config.catalog, cache_dir)?)
}

fn list_catalog(config: &Config) -> Result<()> {
    let catalog = open_catalog(config)?;
    for entry in catalog.list()? {
        let marker = if catalog.cached(&entry.path).is_some() { "*" } else { " " };
        println!("{} {}\t{}", marker, entry.path, entry.title());
    }
    Ok(())
}

fn fetch_story(config: &Config, path: &str) -> Result<()> {
    let catalog = open_catalog(config)?;
    let story = catalog.story(path)?;
    let mut session =
        ReadingSession::new(State::new()?, MonotonicTime::new(), config.navigation.clone());
    let reading = session.import(story)?;
    println!("{}  {}", reading.id, reading.name);
    Ok(())
}
