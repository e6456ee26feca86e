use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{Catalog, Coordinate, SwipeEvent};
use pipeline::filters::{AlreadySwipedFilter, TravelRangeFilter};
use pipeline::{FilterPipeline, ScoreBreakdown, ScoredItem};
use preferences::{rebuild_profile, Dimension, PreferenceProfile};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use session::{EngineConfig, SessionSnapshot, SwipeSession};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// SwipeRecs - Summer program recommendations from likes and skips
#[derive(Parser)]
#[command(name = "swipe-recs")]
#[command(about = "Learns program preferences from swipes and reorders the deck", long_about = None)]
struct Cli {
    /// Path to the program catalog CSV
    #[arg(short, long, default_value = "data/programs.csv")]
    catalog: PathBuf,

    /// Engine config file (JSON); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// User latitude, enables the distance dimension
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// User longitude
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend the next programs for a saved session
    Recommend {
        /// Session snapshot to read the swipe history from (cold start if omitted)
        #[arg(long)]
        session: Option<PathBuf>,

        /// Number of recommendations to return
        #[arg(long, default_value = "10")]
        limit: usize,

        /// Show every sub-score for each recommendation
        #[arg(long)]
        explain: bool,

        /// Drop programs beyond the learned travel range
        #[arg(long)]
        exclude_out_of_range: bool,
    },

    /// Show the preference profile learned from a session
    Profile {
        #[arg(long)]
        session: PathBuf,

        /// Buckets to show per dimension
        #[arg(long, default_value = "5")]
        top: usize,
    },

    /// Show like/pass statistics for a session
    Stats {
        #[arg(long)]
        session: PathBuf,
    },

    /// Search programs by name
    Search {
        /// Name to search for (case-insensitive substring match)
        #[arg(long)]
        name: String,
    },

    /// Swipe through the deck with a simulated user
    Simulate {
        /// Number of swipes
        #[arg(long, default_value = "30")]
        swipes: usize,

        /// Seed for the deck shuffle and the simulated decisions
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Category text the simulated user is drawn to
        #[arg(long, default_value = "Engineering")]
        favorite: String,

        /// Chance of liking a program in the favorite category
        #[arg(long, default_value = "0.8")]
        like_probability: f64,

        /// Chance of liking any other program
        #[arg(long, default_value = "0.1")]
        base_probability: f64,

        /// Write the resulting session snapshot here
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Time profile rebuilds and deck ranking
    Benchmark {
        /// Number of rebuild + rank rounds
        #[arg(long, default_value = "100")]
        iterations: usize,

        /// Swipes in each synthetic history
        #[arg(long, default_value = "40")]
        history: usize,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    let location = match (cli.lat, cli.lon) {
        (Some(lat), Some(lon)) => {
            let coordinate = Coordinate::new(lat, lon);
            anyhow::ensure!(coordinate.is_valid(), "Invalid coordinate {lat}, {lon}");
            Some(coordinate)
        }
        _ => None,
    };

    println!("Loading program catalog from {}...", cli.catalog.display());
    let start = Instant::now();
    let catalog = Catalog::load_from_file(&cli.catalog).context("Failed to load program catalog")?;
    println!(
        "{} Loaded {} programs in {:?}",
        "✓".green(),
        catalog.len(),
        start.elapsed()
    );

    match cli.command {
        Commands::Recommend {
            session,
            limit,
            explain,
            exclude_out_of_range,
        } => handle_recommend(
            &catalog,
            config,
            location,
            session.as_deref(),
            limit,
            explain,
            exclude_out_of_range,
        )?,
        Commands::Profile { session, top } => handle_profile(config, &session, top)?,
        Commands::Stats { session } => handle_stats(config, &session)?,
        Commands::Search { name } => handle_search(&catalog, &name),
        Commands::Simulate {
            swipes,
            seed,
            favorite,
            like_probability,
            base_probability,
            save,
        } => handle_simulate(
            &catalog,
            config,
            location,
            SimulatedUser {
                favorite,
                like_probability,
                base_probability,
            },
            swipes,
            seed,
            save.as_deref(),
        )?,
        Commands::Benchmark {
            iterations,
            history,
        } => handle_benchmark(&catalog, config, location, iterations, history),
    }

    Ok(())
}

fn load_session(config: EngineConfig, path: &Path) -> Result<SwipeSession> {
    let snapshot = SessionSnapshot::load(path)?;
    SwipeSession::restore(snapshot, config)
}

/// Handle the 'recommend' command
fn handle_recommend(
    catalog: &Catalog,
    config: EngineConfig,
    location: Option<Coordinate>,
    session_path: Option<&Path>,
    limit: usize,
    explain: bool,
    exclude_out_of_range: bool,
) -> Result<()> {
    let mut session = match session_path {
        Some(path) => load_session(config, path)?,
        None => SwipeSession::from_catalog(catalog, config),
    };
    if location.is_some() {
        session.set_user_location(location);
    }
    // Learn from the full history under the current location
    if !session.events().is_empty() {
        session.refresh_recommendations();
    }

    let mut filters = FilterPipeline::new().add_filter(AlreadySwipedFilter);
    if exclude_out_of_range {
        filters = filters.add_filter(TravelRangeFilter);
    }
    let recommendations = session.recommend_with(limit, &filters)?;

    let profile = session.profile_snapshot();
    if profile.is_cold_start() {
        println!("{}", "No swipes yet: every program scores 0.5".yellow());
    }
    print_recommendations(&recommendations);

    if explain {
        let scorer = session.ranker().scorer().clone();
        println!("\n{}", "Score breakdown:".bold().blue());
        for rec in &recommendations {
            let breakdown = scorer.explain(&rec.item, &profile);
            print_breakdown(&rec.item.name, &breakdown);
        }
    }
    Ok(())
}

/// Handle the 'profile' command
fn handle_profile(config: EngineConfig, path: &Path, top: usize) -> Result<()> {
    let session = load_session(config, path)?;
    let profile = session.profile_snapshot();

    println!("{}", "Preference profile".bold().blue());
    println!("{}Swipes: {}", "• ".green(), profile.total_swipes);
    println!("{}Likes: {}", "• ".green(), profile.total_likes);
    println!("{}Like rate: {:.1}%", "• ".green(), profile.like_rate * 100.0);
    match profile.max_travel_distance {
        Some(limit) => println!("{}Travel range: {:.0} km", "• ".green(), limit / 1000.0),
        None => println!("{}Travel range: unbounded", "• ".green()),
    }

    if profile.is_cold_start() {
        println!("\n{}", "Nothing learned yet (profile rebuilds after 5 swipes)".yellow());
        return Ok(());
    }

    for dimension in Dimension::ALL {
        print_dimension(&profile, dimension, top);
    }
    Ok(())
}

fn print_dimension(profile: &PreferenceProfile, dimension: Dimension, top: usize) {
    let prefs = profile.dimension(dimension);
    if prefs.is_empty() {
        return;
    }
    println!("\n{}", dimension.as_str().bold());
    for (bucket, score) in prefs.top(top) {
        let marker = if score > 0.5 {
            "▲".green()
        } else if score < 0.5 {
            "▼".red()
        } else {
            "•".normal()
        };
        println!(
            "  {} {:<40} {:.3} ({} swipes)",
            marker,
            bucket,
            score,
            prefs.observations(bucket)
        );
    }
}

/// Handle the 'stats' command
fn handle_stats(config: EngineConfig, path: &Path) -> Result<()> {
    let session = load_session(config, path)?;
    let stats = session.stats();

    println!("{}", "Session statistics".bold().blue());
    println!("{}Total swipes: {}", "• ".cyan(), stats.total_swipes);
    println!("{}Likes: {}", "• ".cyan(), stats.likes);
    println!("{}Passes: {}", "• ".cyan(), stats.passes);
    println!("{}Like rate: {:.0}%", "• ".cyan(), stats.like_rate * 100.0);
    println!("{}Top category: {}", "• ".cyan(), stats.most_liked_category());
    println!("{}Liked programs saved: {}", "• ".cyan(), session.liked().len());

    if !stats.categories.is_empty() {
        println!("\n{}", "Liked categories:".bold());
        for share in &stats.categories {
            let bar = "█".repeat((share.percentage / 5.0).round() as usize);
            println!(
                "  {:<32} {:>3} {:>5.1}% {}",
                share.group,
                share.count,
                share.percentage,
                bar.magenta()
            );
        }
    }
    Ok(())
}

/// Handle the 'search' command
fn handle_search(catalog: &Catalog, name: &str) {
    let matches = catalog.search(name);
    println!("{}", format!("Search results for '{}':", name).bold().blue());
    if matches.is_empty() {
        println!("  no programs found");
    }
    for item in matches.iter().take(20) {
        println!(
            "{}: {} [{}] {} | {} | {}",
            item.id,
            item.name.bold(),
            item.category,
            item.location,
            item.duration,
            item.cost
        );
    }
}

struct SimulatedUser {
    favorite: String,
    like_probability: f64,
    base_probability: f64,
}

impl SimulatedUser {
    fn decide(&self, category: &str, rng: &mut StdRng) -> bool {
        let drawn = category
            .to_lowercase()
            .contains(&self.favorite.to_lowercase());
        let probability = if drawn {
            self.like_probability
        } else {
            self.base_probability
        };
        rng.gen_bool(probability.clamp(0.0, 1.0))
    }
}

/// Handle the 'simulate' command
fn handle_simulate(
    catalog: &Catalog,
    config: EngineConfig,
    location: Option<Coordinate>,
    user: SimulatedUser,
    swipes: usize,
    seed: u64,
    save: Option<&Path>,
) -> Result<()> {
    let mut session = SwipeSession::from_catalog(catalog, config).with_user_location(location);
    session.shuffle(seed);
    let mut rng = StdRng::seed_from_u64(seed);

    println!(
        "{}",
        format!("Simulating {} swipes, drawn to '{}'", swipes, user.favorite)
            .bold()
            .blue()
    );
    for _ in 0..swipes {
        let Some(item) = session.current() else {
            println!("{}", "Deck exhausted".yellow());
            break;
        };
        let highlighted = session.is_highlighted();
        let liked = user.decide(&item.category, &mut rng);

        let outcome = if liked { session.like() } else { session.skip() };
        let Some(outcome) = outcome else { break };

        let verdict = if outcome.liked {
            "♥ like".green()
        } else {
            "✗ skip".red()
        };
        let sparkle = if highlighted { " ✨" } else { "" };
        println!(
            "{:>3}. {} {} [{}]{}",
            outcome.swipe_order + 1,
            verdict,
            outcome.item.name,
            outcome.item.category,
            sparkle
        );
        if outcome.rebuilt {
            println!(
                "     {} profile rebuilt, {} programs reordered",
                "↻".cyan(),
                session.remaining().len()
            );
        }
    }

    let stats = session.stats();
    println!("\n{}", "Summary".bold().blue());
    println!("{}Likes: {} / {}", "• ".green(), stats.likes, stats.total_swipes);
    println!("{}Top category: {}", "• ".green(), stats.most_liked_category());

    let next = session.recommend(5)?;
    println!("\n{}", "Up next:".bold());
    print_recommendations(&next);

    if let Some(path) = save {
        session.snapshot().save(path)?;
        println!("{} Saved session to {}", "✓".green(), path.display());
    }
    Ok(())
}

/// Handle the 'benchmark' command
fn handle_benchmark(
    catalog: &Catalog,
    config: EngineConfig,
    location: Option<Coordinate>,
    iterations: usize,
    history: usize,
) {
    let items = catalog.items();
    let history = history.min(items.len());
    let ranker = SwipeSession::from_catalog(catalog, config)
        .with_user_location(location)
        .ranker();
    let mut rng = StdRng::seed_from_u64(7);

    let mut timings: Vec<Duration> = Vec::with_capacity(iterations);
    for _ in 0..iterations {
        let events: Vec<SwipeEvent> = items
            .iter()
            .take(history)
            .zip(0..)
            .map(|(item, order)| SwipeEvent::new(item.clone(), rng.gen_bool(0.3), order, 0))
            .collect();

        let start = Instant::now();
        let profile = rebuild_profile(&events, location, &config.learning);
        let remaining = &items[history..];
        let ranked = ranker.rank(remaining, &profile, remaining.len());
        timings.push(start.elapsed());
        std::hint::black_box(ranked);
    }

    if timings.is_empty() {
        println!("No iterations run");
        return;
    }

    let total_time: Duration = timings.iter().sum();
    let avg_latency = total_time / timings.len() as u32;
    timings.sort();
    let percentile = |p: f64| timings[((timings.len() as f64 * p) as usize).min(timings.len() - 1)];

    println!("{}", "Benchmark results:".bold().blue());
    println!("Rounds: {} (history {} swipes, {} candidates)", iterations, history, items.len() - history);
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!(
        "Throughput: {:.2} rounds/second",
        timings.len() as f64 / total_time.as_secs_f64()
    );
}

/// Print a ranked list of programs
fn print_recommendations(recommendations: &[ScoredItem]) {
    print!("{}", "Program Recommendations:\n".bold().blue());
    if recommendations.is_empty() {
        println!("  nothing left to recommend");
    }
    for (rank, rec) in recommendations.iter().enumerate() {
        println!(
            "{}. {} ({}) [{}] - Score: {:.3}",
            (rank + 1).to_string().green(),
            rec.item.name,
            rec.item.location,
            rec.item.category,
            rec.score
        );
    }
}

fn print_breakdown(name: &str, breakdown: &ScoreBreakdown) {
    println!("  {}", name.bold());
    if breakdown.cold_start {
        println!("    cold start, neutral score");
        return;
    }
    println!(
        "    category {:.2} | location {:.2} | duration {:.2} | cost {:.2} | selectivity {:.2} | restrictions {:.2}",
        breakdown.category,
        breakdown.location,
        breakdown.duration,
        breakdown.cost,
        breakdown.selectivity,
        breakdown.restrictions
    );
    match breakdown.distance {
        Some(distance) if breakdown.out_of_range => {
            println!("    distance {:.2} {}", distance, "(beyond travel range)".red())
        }
        Some(distance) => println!("    distance {:.2}", distance),
        None => println!("    distance n/a (no location)"),
    }
    println!("    total {:.3}", breakdown.total);
}
