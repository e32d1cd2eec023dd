//! CLI entrypoint for tablepick
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod args;
mod demo;
mod interact;
mod progress;

use std::sync::Arc;

use anyhow::{Result, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tablepick_application::{
    GroupFlowError, HostGroupFlowUseCase, JoinGroupFlowUseCase, JudgeError, PlacesGateway,
    RunSoloFlowUseCase, SoloFlowError,
};
use tablepick_domain::CandidateSet;
use tablepick_infrastructure::{
    ConfigLoader, FileConfig, HttpPlacesGateway, MemoryDecisionStore, generate_session_code,
};

use args::{Cli, Command, SearchArgs};
use progress::ConsoleProgress;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())?
    };

    match &cli.command {
        Command::Solo(search) => run_solo(search, &config, cli.quiet).await,
        Command::Group {
            search,
            participants,
            simulate_host,
        } => run_group(search, &config, *participants, *simulate_host, cli.quiet).await,
    }
}

/// Fetch candidates from the places service, or fall back to the sample deck
/// when no API key or location is available.
async fn load_candidates(
    search: &SearchArgs,
    config: &FileConfig,
    limit: usize,
) -> Result<CandidateSet> {
    let mut filters = config.filters.to_filters();
    if search.open_now {
        filters.open_now = true;
    }
    if !search.cuisine.is_empty() {
        filters.cuisine = search.cuisine.clone();
    }

    match (&config.places.api_key, search.lat, search.lng) {
        (Some(api_key), Some(lat), Some(lng)) => {
            let gateway = HttpPlacesGateway::new(api_key.as_str());
            let candidates = gateway.fetch_candidates(lat, lng, &filters, limit).await?;
            if candidates.is_empty() {
                bail!("No places matched the search filters");
            }
            Ok(CandidateSet::new(candidates))
        }
        _ => {
            info!("No places API key or location given; using the built-in sample deck");
            Ok(demo::sample_set())
        }
    }
}

async fn run_solo(search: &SearchArgs, config: &FileConfig, quiet: bool) -> Result<()> {
    let behavior = config.behavior.to_behavior();
    let candidates = load_candidates(search, config, behavior.deck_size).await?;
    if !quiet {
        println!(
            "Swiping through {} places; liked ones go head to head.",
            candidates.len()
        );
    }

    let result = RunSoloFlowUseCase::new()
        .execute_with_progress(
            candidates,
            &interact::StdinSwipeFeed,
            &interact::StdinMatchupJudge,
            &ConsoleProgress::new(quiet),
        )
        .await;

    match result {
        Ok(winner) => {
            println!();
            println!("Tonight's pick: {} ({})", winner.name, winner.price_display());
            Ok(())
        }
        Err(SoloFlowError::Input(JudgeError::Cancelled)) => {
            println!("Cancelled.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn run_group(
    search: &SearchArgs,
    config: &FileConfig,
    participants: usize,
    simulate_host: bool,
    quiet: bool,
) -> Result<()> {
    if participants < 2 {
        bail!("A group session needs at least 2 participants");
    }
    let behavior = config.behavior.to_behavior();
    let candidates = load_candidates(search, config, behavior.deck_size).await?;

    // === Dependency Injection ===
    let store = Arc::new(MemoryDecisionStore::new());
    let code = generate_session_code();
    let host_name = config
        .profile
        .display_name
        .clone()
        .unwrap_or_else(|| "You".to_string());

    let host = HostGroupFlowUseCase::new(Arc::clone(&store)).with_config(behavior.clone());
    host.create_session(code.clone(), "host", host_name.clone(), candidates)
        .await?;
    println!("Session {code}: you and {} guests", participants - 1);

    let join = JoinGroupFlowUseCase::new(Arc::clone(&store));
    let host_seat = join.join(&code, "host", host_name).await?;
    let mut guest_seats = Vec::new();
    for i in 1..participants {
        guest_seats.push(
            join.join(&code, format!("guest-{i}"), format!("Guest {i}"))
                .await?,
        );
    }

    host.start_swiping(&code).await?;

    // Simulated guests swipe and vote on their own
    let mut guests = Vec::new();
    for seat in guest_seats {
        let join = JoinGroupFlowUseCase::new(Arc::clone(&store));
        guests.push(tokio::spawn(async move {
            join.run(&seat, &demo::RandomSwipes::default(), &demo::RandomVote)
                .await
        }));
    }

    // The observer drives the session through its phases
    let observer = tokio::spawn({
        let host = HostGroupFlowUseCase::new(Arc::clone(&store)).with_config(behavior);
        let code = code.clone();
        async move {
            host.run_with_progress(&code, &ConsoleProgress::new(quiet))
                .await
        }
    });

    // Your own seat runs in the foreground
    let host_result = if simulate_host {
        join.run(&host_seat, &demo::RandomSwipes::default(), &demo::RandomVote)
            .await
    } else {
        join.run(
            &host_seat,
            &interact::StdinSwipeFeed,
            &interact::StdinVoteChooser,
        )
        .await
    };
    if let Err(e) = host_result {
        observer.abort();
        for guest in guests {
            guest.abort();
        }
        if matches!(e, GroupFlowError::Input(JudgeError::Cancelled)) {
            println!("Cancelled.");
            return Ok(());
        }
        return Err(e.into());
    }

    let winner = observer.await??;
    for guest in guests {
        guest.await??;
    }

    println!();
    println!(
        "The table picked: {} ({})",
        winner.name,
        winner.price_display()
    );
    Ok(())
}
