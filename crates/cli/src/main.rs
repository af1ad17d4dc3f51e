use anyhow::{Context, Result, bail};
use api_client::{ApiConfig, CatalogApi, HttpCatalogClient, SearchQuery};
use catalog::{Algorithm, Mood, Movie, UserId};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use discovery::{DiscoverySession, RecommendationOutcome};
use session::{DEFAULT_USER_LIMIT, DEFAULT_WINDOW, Mode};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// ReelDiscover - explore a movie recommendation backend
#[derive(Parser)]
#[command(name = "reel-discover")]
#[command(about = "Discover movies through a recommendation backend", long_about = None)]
struct Cli {
    /// Backend base URL (overrides REEL_API_BASE_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Request timeout in seconds, 0 disables it (overrides REEL_API_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every recommendation command
#[derive(Args)]
struct RankOptions {
    /// Recommendation algorithm (wire id, e.g. cosine, hybrid, popular)
    #[arg(long)]
    algorithm: Option<Algorithm>,

    /// How many of the ranked results to show (1-20)
    #[arg(long, default_value_t = DEFAULT_WINDOW)]
    top: usize,

    /// Show the backend's explanation of the method
    #[arg(long)]
    explain: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show catalog statistics and the genre list
    Stats,

    /// List random/popular movies
    Browse {
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Search the catalog
    Search {
        /// Title text to search for
        #[arg(long)]
        text: Option<String>,

        #[arg(long)]
        genre: Option<String>,

        #[arg(long)]
        year: Option<u16>,

        /// Minimum average rating
        #[arg(long)]
        rating: Option<f64>,

        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Recommend movies similar to the first of the given movies
    Movies {
        /// Movie ids, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<String>,

        #[command(flatten)]
        rank: RankOptions,
    },

    /// Recommend movies for a combination of genres
    Genres {
        /// Genre ids, comma separated, in priority order
        #[arg(long, value_delimiter = ',', required = true)]
        genres: Vec<String>,

        #[command(flatten)]
        rank: RankOptions,
    },

    /// List candidates for a mood, optionally recommending from picked movies
    Mood {
        /// One of: any, cheerful, reflective, exciting, relaxed, suspenseful, intellectual
        #[arg(long)]
        mood: Mood,

        /// Candidate movie ids to recommend from, comma separated
        #[arg(long, value_delimiter = ',')]
        pick: Vec<String>,

        #[command(flatten)]
        rank: RankOptions,
    },

    /// Recommend movies for a user
    User {
        #[arg(long)]
        user_id: UserId,

        /// Number of recommendations to request (1-20)
        #[arg(long, default_value_t = DEFAULT_USER_LIMIT)]
        limit: usize,

        #[command(flatten)]
        rank: RankOptions,
    },

    /// Show a movie's details and rating statistics
    Detail {
        #[arg(long)]
        movie_id: String,
    },

    /// Describe the similarity methods the backend offers
    Methods,

    /// Compare two movies under every similarity method
    Similarity {
        #[arg(long)]
        a: String,

        #[arg(long)]
        b: String,

        #[arg(long, default_value = "cosine")]
        algorithm: Algorithm,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = ApiConfig::from_env();
    if let Some(url) = cli.api_url {
        config = config.with_base_url(url);
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout((secs > 0).then(|| Duration::from_secs(secs)));
    }
    let client: Arc<dyn CatalogApi> =
        Arc::new(HttpCatalogClient::new(&config).context("Failed to create backend client")?);

    match cli.command {
        Commands::Stats => handle_stats(client).await?,
        Commands::Browse { limit } => handle_listing(client, SearchQuery::browse(limit)).await?,
        Commands::Search {
            text,
            genre,
            year,
            rating,
            limit,
        } => {
            let mut query = SearchQuery::browse(limit);
            if let Some(text) = text {
                query = query.with_text(text);
            }
            if let Some(genre) = genre {
                query = query.with_genre(genre);
            }
            if let Some(year) = year {
                query = query.with_year(year);
            }
            if let Some(rating) = rating {
                query = query.with_min_rating(rating);
            }
            handle_listing(client, query).await?
        }
        Commands::Movies { ids, rank } => handle_movies(client, ids, rank).await?,
        Commands::Genres { genres, rank } => handle_genres(client, genres, rank).await?,
        Commands::Mood { mood, pick, rank } => handle_mood(client, mood, pick, rank).await?,
        Commands::User {
            user_id,
            limit,
            rank,
        } => handle_user(client, user_id, limit, rank).await?,
        Commands::Detail { movie_id } => handle_detail(client, &movie_id).await?,
        Commands::Methods => handle_methods(client).await?,
        Commands::Similarity { a, b, algorithm } => handle_similarity(client, &a, &b, algorithm).await?,
    }

    Ok(())
}

/// Bootstrap a session against the backend
async fn connect(client: Arc<dyn CatalogApi>) -> Result<DiscoverySession> {
    let session = DiscoverySession::new(client);
    let start = Instant::now();
    let snapshot = session
        .initialize()
        .await
        .context("Failed to initialize the recommendation backend")?;
    info!(
        movies = snapshot.total_movies,
        genres = snapshot.genres.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Catalog ready"
    );
    println!(
        "{} Catalog ready in {:.2?} ({} movies, {} genres)",
        "✓".green(),
        start.elapsed(),
        snapshot.total_movies,
        snapshot.genres.len()
    );
    Ok(session)
}

/// Handle the 'stats' command
async fn handle_stats(client: Arc<dyn CatalogApi>) -> Result<()> {
    let session = connect(client).await?;
    let snapshot = session.catalog().await;

    println!("{}", "Catalog statistics:".bold().blue());
    println!("{}Movies: {}", "• ".green(), snapshot.total_movies);
    println!("{}Ratings: {}", "• ".green(), snapshot.total_ratings);
    println!("{}Users: {}", "• ".green(), snapshot.total_users);
    println!("{}Genres: {}", "• ".cyan(), snapshot.genres.join(", "));
    Ok(())
}

/// Handle the 'browse' and 'search' commands
async fn handle_listing(client: Arc<dyn CatalogApi>, query: SearchQuery) -> Result<()> {
    let movies = client.search(&query).await.context("Search failed")?;

    let header = if query.is_browse() {
        "Popular picks:".to_string()
    } else {
        format!("Search results ({}):", movies.len())
    };
    println!("{}", header.bold().blue());
    print_movie_list(&movies);
    Ok(())
}

/// Handle the 'movies' command
async fn handle_movies(client: Arc<dyn CatalogApi>, ids: Vec<String>, rank: RankOptions) -> Result<()> {
    let session = connect(client).await?;
    session.enter_mode(Mode::ByMovies).await;
    for id in ids {
        session.toggle_movie(id).await?;
    }
    recommend(&session, rank).await
}

/// Handle the 'genres' command
async fn handle_genres(client: Arc<dyn CatalogApi>, genres: Vec<String>, rank: RankOptions) -> Result<()> {
    let session = connect(client).await?;
    session.enter_mode(Mode::ByGenres).await;
    for genre in genres {
        session.toggle_genre(genre.trim()).await?;
    }
    recommend(&session, rank).await
}

/// Handle the 'mood' command
async fn handle_mood(
    client: Arc<dyn CatalogApi>,
    mood: Mood,
    pick: Vec<String>,
    rank: RankOptions,
) -> Result<()> {
    let session = connect(client).await?;
    let candidates = session.enter_mood_mode(mood).await;

    println!(
        "{} {}",
        format!("Candidates for a {mood} mood").bold().blue(),
        format!("[{}]", mood.genres_for().join(", ")).dimmed()
    );
    print_movie_list(&candidates);

    if pick.is_empty() {
        return Ok(());
    }
    println!();
    for id in pick {
        session.toggle_movie(id).await?;
    }
    recommend(&session, rank).await
}

/// Handle the 'user' command
async fn handle_user(
    client: Arc<dyn CatalogApi>,
    user_id: UserId,
    limit: usize,
    rank: RankOptions,
) -> Result<()> {
    let session = connect(client).await?;
    session.enter_mode(Mode::ByUser).await;
    session.set_user(user_id).await?;
    session.set_user_limit(limit).await?;
    recommend(&session, rank).await
}

/// Apply ranking options, run the request and print the visible window
async fn recommend(session: &DiscoverySession, rank: RankOptions) -> Result<()> {
    if let Some(algorithm) = rank.algorithm {
        session.set_algorithm(algorithm).await?;
    }
    session.set_window(rank.top).await;

    if !session.can_calculate().await {
        bail!("Nothing selected to recommend from");
    }

    let result = match session.calculate().await? {
        RecommendationOutcome::Completed(result) => result,
        RecommendationOutcome::Superseded { .. } => bail!("Request was superseded by a newer one"),
    };

    let algorithm = session.algorithm().await;
    let visible = session.visible().await;
    info!(
        sequence = result.sequence,
        ranked = result.ranked_movies.len(),
        visible = visible.len(),
        "Recommendations calculated"
    );
    if let Some(failure) = &result.failure {
        warn!(%failure, "Recommendation request failed");
    }
    if visible.is_empty() {
        println!("{}", "No recommendations found".yellow());
        if let Some(failure) = &result.failure {
            println!("   {}", failure.dimmed());
        }
        return Ok(());
    }

    println!(
        "{} {}",
        format!("Top {} of {} recommendations", visible.len(), result.ranked_movies.len())
            .bold()
            .blue(),
        format!("({})", algorithm.display_name()).dimmed()
    );
    print_ranked(&visible);
    println!(
        "{}",
        format!("Calculated in {:.2}s", result.elapsed_seconds()).dimmed()
    );

    if rank.explain {
        if let Some(explanation) = &result.explanation {
            println!("   Explanation: {}", explanation);
        }
    }
    Ok(())
}

/// Handle the 'detail' command
async fn handle_detail(client: Arc<dyn CatalogApi>, movie_id: &str) -> Result<()> {
    let session = DiscoverySession::new(client);
    let detail = session
        .fetch_detail(movie_id)
        .await
        .with_context(|| format!("Failed to load movie {}", movie_id))?;

    let movie = &detail.movie;
    println!("{}", movie.display_title().bold().blue());
    println!("{}Genres: {}", "• ".green(), movie.genres.join(", "));
    if let Some(year) = movie.release_year() {
        println!("{}Year: {}", "• ".green(), year);
    }
    if let Some(stats) = &detail.stats {
        let avg = stats
            .avg_rating
            .map(|r| format!("{:.2}", r))
            .unwrap_or_else(|| "n/a".into());
        let range = match (stats.min_rating, stats.max_rating) {
            (Some(min), Some(max)) => format!(", range {}-{}", min, max),
            _ => String::new(),
        };
        println!(
            "{}Rating: {} ({} ratings{})",
            "• ".cyan(),
            avg,
            stats.total_ratings,
            range
        );
    }
    if let Some(users) = detail.users_who_rated {
        println!("{}Rated by {} users", "• ".cyan(), users);
    }

    let similar = detail.similar_preview();
    if !similar.is_empty() {
        println!("Similar movies:");
        for movie in similar {
            println!("  - {} ({})", movie.display_title(), movie.movie_id);
        }
    }
    Ok(())
}

/// Handle the 'methods' command
async fn handle_methods(client: Arc<dyn CatalogApi>) -> Result<()> {
    let catalog = client.methods().await.context("Failed to load methods")?;

    let supported: Vec<_> = catalog.algorithms().iter().map(Algorithm::as_str).collect();
    println!(
        "{} {}",
        "Similarity methods:".bold().blue(),
        format!("[{}]", supported.join(", ")).dimmed()
    );
    for (id, detail) in &catalog.details {
        println!("{} {}", id.green(), format!("- {}", detail.name).bold());
        println!("   {}", detail.explanation);
        println!("   Range: {}  Best for: {}", detail.range, detail.best_for);
    }
    if !catalog.recommendations.is_empty() {
        println!("{}", "Suggested:".bold());
        for (use_case, method) in &catalog.recommendations {
            println!("  - {}: {}", use_case, method);
        }
    }
    Ok(())
}

/// Handle the 'similarity' command
async fn handle_similarity(client: Arc<dyn CatalogApi>, a: &str, b: &str, algorithm: Algorithm) -> Result<()> {
    let report = client
        .similarity(a, b, algorithm)
        .await
        .with_context(|| format!("Failed to compare {} and {}", a, b))?;

    println!(
        "{}",
        format!("{} vs {}", report.movie1.display_title(), report.movie2.display_title())
            .bold()
            .blue()
    );
    match report.similarity {
        Some(value) => println!("{}{}: {:.3}", "• ".green(), report.selected_method, value),
        None => println!("{}{}: n/a", "• ".green(), report.selected_method),
    }
    if let Some(explanation) = &report.explanation {
        println!("   {}", explanation.dimmed());
    }
    for (method, value) in &report.all_methods {
        let value = value.map(|v| format!("{:.3}", v)).unwrap_or_else(|| "n/a".into());
        println!("  - {}: {}", method, value);
    }
    if let Some(comparison) = &report.comparison {
        println!(
            "{}Same genres: {}{}",
            "• ".cyan(),
            comparison.genres_match,
            comparison
                .year_diff
                .map(|d| format!(", {} years apart", d))
                .unwrap_or_default()
        );
    }
    Ok(())
}

/// Print an unranked listing
fn print_movie_list(movies: &[Movie]) {
    if movies.is_empty() {
        println!("{}", "No movies found".yellow());
        return;
    }
    for movie in movies {
        println!(
            "  {} {} [{}]",
            format!("{:>6}", movie.movie_id).dimmed(),
            movie.display_title(),
            movie.genres.join(", ")
        );
    }
}

/// Print ranked recommendations in server order
fn print_ranked(movies: &[Movie]) {
    for (i, movie) in movies.iter().enumerate() {
        let score = movie
            .relevance()
            .map(|s| format!(" - Score: {:.3}", s))
            .unwrap_or_default();
        println!(
            "{}. {} [{}]{}",
            (i + 1).to_string().green(),
            movie.display_title(),
            movie.genres.join(", "),
            score
        );
    }
}
