use std::sync::Arc;

use anyhow::{Context, anyhow, bail};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use dashboard_core::{
    Config, Location, WeatherStore,
    cities::{choose_city, fetch_city_summaries},
    debounce::SearchDebouncer,
    provider_from_config,
    views::{self, DayReading},
};
use inquire::{Password, Select, Text};

use crate::{
    render,
    search::{CitySuggester, chosen_location},
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dashboard", version, about = "Weather dashboard for the terminal")]
pub struct Cli {
    /// Log requests and state transitions to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Search for cities by name.
    Search {
        query: String,
    },

    /// Show weather for a city or coordinates.
    Show {
        /// City name; the first search result is used.
        query: Option<String>,

        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        #[arg(long, value_enum, default_value_t = Tab::Today)]
        view: Tab,
    },

    /// Current conditions in the preset cities.
    Cities,

    /// Interactive dashboard.
    Dashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Tab {
    Today,
    Tomorrow,
    Week,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;

        match self.command {
            Command::Configure => configure(&mut config)?,
            Command::Search { query } => {
                let store = open_store(&config)?;
                let results = store.search_cities(&query).await;
                println!("{}", render::search_results(&query, &results));
            }
            Command::Show { query, lat, lon, view } => {
                let store = open_store(&config)?;
                let location = resolve_location(&store, query, lat, lon).await?;
                store.select_location(location.clone());
                store
                    .fetch_current_weather(&location)
                    .await
                    .with_context(|| format!("Failed to load weather for {}", location.label()))?;
                print_dashboard(&store, view);
            }
            Command::Cities => {
                let store = open_store(&config)?;
                let summaries =
                    fetch_city_summaries(store.provider().as_ref(), &config.other_cities).await;
                println!("{}", render::cities(&summaries));
            }
            Command::Dashboard => {
                let store = Arc::new(open_store(&config)?);
                dashboard(store, &config).await?;
            }
        }

        Ok(())
    }
}

fn open_store(config: &Config) -> anyhow::Result<WeatherStore> {
    let provider = provider_from_config(config)?;
    Ok(WeatherStore::new(provider).with_search_limit(config.search.limit))
}

fn configure(config: &mut Config) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }

    let lang = Text::new("Description language:")
        .with_default(&config.lang)
        .prompt()
        .context("Failed to read language")?;

    config.set_api_key(api_key.trim().to_string());
    config.lang = lang;
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn resolve_location(
    store: &WeatherStore,
    query: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
) -> anyhow::Result<Location> {
    if let (Some(lat), Some(lon)) = (lat, lon) {
        return Ok(Location {
            name: format!("{lat:.4}, {lon:.4}"),
            lat: Some(lat),
            lon: Some(lon),
            ..Default::default()
        });
    }

    let query = query.ok_or_else(|| anyhow!("Provide a city name or --lat/--lon"))?;
    let results = store.search_cities(&query).await;
    results
        .first()
        .map(Location::from)
        .ok_or_else(|| anyhow!("No locations found for \"{query}\""))
}

fn print_dashboard(store: &WeatherStore, tab: Tab) {
    let state = store.snapshot();
    println!("{}", render::header(&state));

    if let Some(message) = &state.error {
        println!("{}", render::error(message));
        return;
    }
    let Some(current) = &state.current_weather else {
        return;
    };

    let body = match tab {
        Tab::Today => render::overview("Today", &views::overview(current)),
        Tab::Tomorrow => {
            let picked = views::tomorrow(&state.forecast, current, &Local::now());
            let title = match picked {
                DayReading::Forecast(_) => "Tomorrow",
                DayReading::Current(_) => "Tomorrow (current conditions)",
            };
            render::overview(title, &views::overview(picked.reading()))
        }
        Tab::Week => render::weekly(&views::daily_summaries(&state.forecast, &Local)),
    };

    println!("\n{body}");
    println!("\n{}", render::rain(&views::rain_outlook(&state.forecast)));
}

const NEW_SEARCH: &str = "Search another city";
const OTHER_CITIES: &str = "Other cities";
const QUIT: &str = "Quit";

async fn dashboard(store: Arc<WeatherStore>, config: &Config) -> anyhow::Result<()> {
    let debouncer = Arc::new(SearchDebouncer::spawn(store.clone(), config.search.debounce()));
    let suggester = CitySuggester::new(store.clone(), debouncer.clone());

    let outcome = browse(&store, &suggester, config).await;

    drop(suggester);
    if let Ok(debouncer) = Arc::try_unwrap(debouncer) {
        debouncer.close().await;
    }
    outcome
}

async fn browse(
    store: &WeatherStore,
    suggester: &CitySuggester,
    config: &Config,
) -> anyhow::Result<()> {
    pick_city(store, suggester, config).await?;

    loop {
        let choices = vec!["Today", "Tomorrow", "Next 7 days", OTHER_CITIES, NEW_SEARCH, QUIT];
        let choice = Select::new("View:", choices).prompt()?;

        match choice {
            "Today" => print_dashboard(store, Tab::Today),
            "Tomorrow" => print_dashboard(store, Tab::Tomorrow),
            "Next 7 days" => print_dashboard(store, Tab::Week),
            OTHER_CITIES => pick_other_city(store, config).await?,
            NEW_SEARCH => pick_city(store, suggester, config).await?,
            _ => return Ok(()),
        }
    }
}

async fn pick_city(
    store: &WeatherStore,
    suggester: &CitySuggester,
    config: &Config,
) -> anyhow::Result<()> {
    loop {
        // The prompt blocks this worker while the debouncer keeps searching on the others.
        let query = tokio::task::block_in_place(|| {
            Text::new("Search for a city:")
                .with_autocomplete(suggester.clone())
                .prompt()
        })?;
        let results = store.search_cities(&query).await;
        if results.is_empty() {
            println!("{}", render::search_results(&query, &results));
            if query.trim().is_empty() {
                return pick_other_city(store, config).await;
            }
            continue;
        }

        let labels: Vec<String> = results.iter().map(|c| c.full_name.clone()).collect();
        let choice = Select::new("City:", labels).raw_prompt()?;
        let Some(location) = chosen_location(&results, &choice) else {
            continue;
        };

        load(store, &location).await;
        return Ok(());
    }
}

async fn pick_other_city(store: &WeatherStore, config: &Config) -> anyhow::Result<()> {
    let summaries = fetch_city_summaries(store.provider().as_ref(), &config.other_cities).await;
    println!("{}", render::cities(&summaries));

    let labels: Vec<String> = summaries.iter().map(|s| s.location.label()).collect();
    if labels.is_empty() {
        return Ok(());
    }
    let choice = Select::new("City:", labels).raw_prompt()?;
    if let Some(summary) = summaries.get(choice.index) {
        load(store, &summary.location).await;
    }
    Ok(())
}

async fn load(store: &WeatherStore, location: &Location) {
    // Failures are already in the store's error field; the dashboard shows them.
    let _ = choose_city(store, location).await;
    print_dashboard(store, Tab::Today);
}
