//! movie-explorer - browse TMDB movie collections from the terminal.

/// Application configuration (TOML).
mod config;

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{AppConfig, resolve_config_path, resolve_log_path};
use movie_explorer_api::tmdb::{Endpoint, SortKey, TmdbApi, TmdbClient};
use movie_explorer_tui::render::render_cards;
use movie_explorer_tui::state::NO_RESULTS_MESSAGE;
use movie_explorer_tui::{BrowseOptions, run_browser};

/// CLI argument parser.
#[derive(Parser)]
#[command(name = "movie-explorer", about, version)]
struct Cli {
    /// Override config/log directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Browse movies interactively.
    Browse(BrowseArgs),
    /// List popular movies.
    Popular(PageArgs),
    /// Search movies by title.
    Search(SearchArgs),
    /// List movies in a sort order.
    Discover(DiscoverArgs),
    /// Show the image configuration.
    Configuration,
    /// Generate shell completions.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the `browse` subcommand.
#[derive(clap::Args)]
struct BrowseArgs {
    /// Initial search text.
    #[arg(long)]
    search: Option<String>,
    /// Initial sort order (ignored while searching).
    #[arg(long, value_parser = parse_sort_key)]
    sort_by: Option<SortKey>,
}

/// Page selection shared by the listing subcommands.
#[derive(clap::Args)]
struct PageArgs {
    /// Page number (1-500).
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=500))]
    page: u32,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query (e.g. "batman").
    #[arg(long, required = true, value_parser = parse_query)]
    query: String,
    #[command(flatten)]
    page: PageArgs,
}

/// Arguments for the `discover` subcommand.
#[derive(clap::Args)]
struct DiscoverArgs {
    /// Sort order.
    #[arg(long, required = true, value_parser = parse_sort_key)]
    sort_by: SortKey,
    #[command(flatten)]
    page: PageArgs,
}

/// Parses a `--sort-by` value.
fn parse_sort_key(s: &str) -> Result<SortKey, String> {
    s.parse::<SortKey>().map_err(|e| e.to_string())
}

/// Parses a `--query` value, rejecting blank text.
fn parse_query(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        return Err(String::from("search query must not be blank"));
    }
    Ok(s.to_owned())
}

/// Builds a `TmdbClient` from `TMDB_API_TOKEN` and the config file.
///
/// # Errors
///
/// Returns an error if no token is configured, the config file is invalid,
/// or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(dir: Option<&PathBuf>) -> Result<TmdbClient> {
    let config_path = resolve_config_path(dir)?;
    let config = AppConfig::load(&config_path)?;

    let api_token = config
        .tmdb
        .resolve_api_token(std::env::var("TMDB_API_TOKEN").ok())
        .with_context(|| {
            format!(
                "TMDB_API_TOKEN environment variable or [tmdb] api_token in {} is required",
                config_path.display()
            )
        })?;

    let mut builder = TmdbClient::builder()
        .api_token(api_token)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
    if let Some(base_url) = &config.tmdb.base_url {
        let url = Url::parse(base_url)
            .with_context(|| format!("invalid [tmdb] base_url: {base_url}"))?;
        builder = builder.base_url(url);
    }
    if let Some(language) = config.tmdb.language {
        builder = builder.language(language);
    }

    builder.build().context("failed to build TMDB client")
}

/// Fetches one page and prints it.
///
/// # Errors
///
/// Returns an error if the movie request fails.
#[instrument(skip_all, fields(endpoint = %endpoint, page = page))]
async fn run_listing(client: &TmdbClient, endpoint: &Endpoint, page: u32) -> Result<()> {
    let config = match client.configuration().await {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(error = %e, "failed to load TMDB configuration; posters disabled");
            None
        }
    };

    let response = client
        .movie_page(endpoint, page)
        .await
        .context("Failed To Load Movies")?;

    if response.results.is_empty() {
        tracing::info!("{NO_RESULTS_MESSAGE}");
        return Ok(());
    }

    tracing::info!(
        "Page {} of {} ({} results)",
        response.page,
        response.total_pages,
        response.total_results
    );
    tracing::info!("ID\tReleaseDate\tRating\tTitle\tPoster");
    for card in render_cards(&response.results, config.as_ref()) {
        let release_date = if card.release_date.is_empty() {
            "-"
        } else {
            card.release_date.as_str()
        };
        tracing::info!(
            "{}\t{}\t{}\t{}\t{}",
            card.id,
            release_date,
            card.rating,
            card.title,
            card.poster,
        );
    }

    Ok(())
}

/// Runs the `configuration` subcommand.
///
/// # Errors
///
/// Returns an error if the configuration request fails.
#[instrument(skip_all)]
async fn run_configuration(client: &TmdbClient) -> Result<()> {
    let config = client
        .configuration()
        .await
        .context("TMDB configuration request failed")?;

    tracing::info!("Image base URL: {}", config.images.base_url);
    tracing::info!("Secure base URL: {}", config.images.secure_base_url);
    tracing::info!("Poster sizes: {}", config.images.poster_sizes.join(", "));

    Ok(())
}

/// Runs the interactive browser.
///
/// # Errors
///
/// Returns an error if the client fails to build or the TUI fails.
async fn run_browse(args: BrowseArgs, dir: Option<&PathBuf>) -> Result<()> {
    let client = build_tmdb_client(dir)?;
    let options = BrowseOptions {
        search: args.search.unwrap_or_default(),
        sort: args.sort_by,
    };
    tracing::info!(search = %options.search, sort = ?options.sort, "starting browser");
    run_browser(Arc::new(client), options).await
}

/// Initializes the tracing subscriber.
///
/// Logs go to stdout, or to `log_file` (without ANSI colors) when set.
///
/// # Errors
///
/// Returns an error if the log file cannot be created.
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let writer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create directory {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(io::stdout),
    };
    let ansi = log_file.is_none();

    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let dir = cli.dir.as_ref();

    let log_file = match &cli.command {
        Commands::Browse(_) => Some(resolve_log_path(dir)?),
        _ => None,
    };
    init_tracing(log_file.as_deref())?;

    match cli.command {
        Commands::Browse(args) => run_browse(args, dir).await,
        Commands::Popular(args) => {
            let client = build_tmdb_client(dir)?;
            run_listing(&client, &Endpoint::Popular, args.page).await
        }
        Commands::Search(args) => {
            let client = build_tmdb_client(dir)?;
            let endpoint = Endpoint::derive(&args.query, None);
            run_listing(&client, &endpoint, args.page.page).await
        }
        Commands::Discover(args) => {
            let client = build_tmdb_client(dir)?;
            let endpoint = Endpoint::derive("", Some(args.sort_by));
            run_listing(&client, &endpoint, args.page.page).await
        }
        Commands::Configuration => {
            let client = build_tmdb_client(dir)?;
            run_configuration(&client).await
        }
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "movie-explorer",
                &mut io::stdout(),
            );
            Ok(())
        }
    }
}
