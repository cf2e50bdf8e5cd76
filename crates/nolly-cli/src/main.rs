//! nolly - browse the movie catalog and manage watchlists from the terminal.

/// Client wiring for one invocation.
mod app;
/// Subcommand implementations.
mod commands;
/// Application configuration (TOML).
mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use nolly_api::account::{LoginRequest, RegisterRequest};
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::app::App;
use crate::commands::{account, catalog, settings};

/// CLI argument parser.
#[derive(Parser)]
#[command(name = "nolly", about, version)]
struct Cli {
    /// Override config/data directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Movie listings.
    Movies(MoviesCommand),
    /// TV listings.
    Tv(TvCommand),
    /// List movie genres.
    Genres,
    /// People listings.
    People(PeopleCommand),
    /// Single movie lookups.
    Movie(MovieCommand),
    /// Search movies by title.
    Search(SearchArgs),
    /// Sign up, sign in and out.
    Auth(AuthCommand),
    /// Public user profiles.
    User(UserCommand),
    /// Manage watchlists.
    Watchlist(WatchlistCommand),
    /// Inspect or create the config file.
    Config(ConfigCommand),
    /// Print shell completions.
    Completions(CompletionsArgs),
}

/// Paging options shared by listings.
#[derive(clap::Args)]
struct PageArgs {
    /// Number of pages to load.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=500))]
    pages: u32,
}

/// Arguments for the `movies` subcommand.
#[derive(clap::Args)]
struct MoviesCommand {
    /// Movies subcommand to run.
    #[command(subcommand)]
    command: MoviesSubcommands,
}

/// Available movie listings.
#[derive(Subcommand)]
enum MoviesSubcommands {
    /// Popular movies.
    Popular(PageArgs),
    /// Upcoming releases.
    Upcoming(PageArgs),
    /// Movies in theaters now.
    NowPlaying(PageArgs),
    /// Discover movies by sort order.
    Discover(DiscoverArgs),
}

/// Arguments for the `discover` listings.
#[derive(clap::Args)]
struct DiscoverArgs {
    #[command(flatten)]
    paging: PageArgs,
    /// Sort order (e.g. "vote_average.desc").
    #[arg(long, default_value = nolly_api::catalog::DEFAULT_SORT_BY)]
    sort_by: String,
}

/// Arguments for the `tv` subcommand.
#[derive(clap::Args)]
struct TvCommand {
    /// TV subcommand to run.
    #[command(subcommand)]
    command: TvSubcommands,
}

/// Available TV listings.
#[derive(Subcommand)]
enum TvSubcommands {
    /// Discover TV shows by sort order.
    Discover(DiscoverArgs),
}

/// Arguments for the `people` subcommand.
#[derive(clap::Args)]
struct PeopleCommand {
    /// People subcommand to run.
    #[command(subcommand)]
    command: PeopleSubcommands,
}

/// Available people listings.
#[derive(Subcommand)]
enum PeopleSubcommands {
    /// Popular people.
    Popular(PageArgs),
}

/// Arguments for the `movie` subcommand.
#[derive(clap::Args)]
struct MovieCommand {
    /// Movie subcommand to run.
    #[command(subcommand)]
    command: MovieSubcommands,
}

/// Available single-movie lookups.
#[derive(Subcommand)]
enum MovieSubcommands {
    /// Full movie details.
    Details(MovieIdArgs),
    /// Cast and crew.
    Credits(MovieIdArgs),
    /// Trailers and clips.
    Videos(MovieIdArgs),
}

/// Movie selector.
#[derive(clap::Args)]
struct MovieIdArgs {
    /// Catalog movie ID.
    #[arg(long, required = true)]
    id: u64,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search text.
    #[arg(long, required = true)]
    query: String,
    /// Result page.
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// Filter by release year.
    #[arg(long)]
    year: Option<u32>,
}

/// Arguments for the `auth` subcommand.
#[derive(clap::Args)]
struct AuthCommand {
    /// Auth subcommand to run.
    #[command(subcommand)]
    command: AuthSubcommands,
}

/// Available auth subcommands.
#[derive(Subcommand)]
enum AuthSubcommands {
    /// Create an account and sign in.
    Register(RegisterArgs),
    /// Sign in with email and password.
    Login(LoginArgs),
    /// Sign out and forget the stored token.
    Logout,
    /// Show the signed-in user.
    Profile,
}

/// Arguments for `auth register`.
#[derive(clap::Args)]
struct RegisterArgs {
    /// Full name.
    #[arg(long, required = true)]
    full_name: String,
    /// Username.
    #[arg(long, required = true)]
    username: String,
    /// Email address.
    #[arg(long, required = true)]
    email: String,
    /// Password.
    #[arg(long, required = true)]
    password: String,
}

/// Arguments for `auth login`.
#[derive(clap::Args)]
struct LoginArgs {
    /// Email address.
    #[arg(long, required = true)]
    email: String,
    /// Password.
    #[arg(long, required = true)]
    password: String,
}

/// Arguments for the `user` subcommand.
#[derive(clap::Args)]
struct UserCommand {
    /// User subcommand to run.
    #[command(subcommand)]
    command: UserSubcommands,
}

/// Available user subcommands.
#[derive(Subcommand)]
enum UserSubcommands {
    /// Show a user by ID.
    Show(UserIdArgs),
}

/// User selector.
#[derive(clap::Args)]
struct UserIdArgs {
    /// Account service user ID.
    #[arg(long, required = true)]
    id: String,
}

/// Arguments for the `watchlist` subcommand.
#[derive(clap::Args)]
struct WatchlistCommand {
    /// Watchlist subcommand to run.
    #[command(subcommand)]
    command: WatchlistSubcommands,
}

/// Available watchlist subcommands.
#[derive(Subcommand)]
enum WatchlistSubcommands {
    /// List your watchlists.
    List(WatchlistListArgs),
    /// Show one watchlist.
    Show(WatchlistIdArgs),
    /// List the movie IDs in a watchlist.
    Movies(WatchlistIdArgs),
    /// Create a watchlist.
    Create(WatchlistCreateArgs),
    /// Add a movie to a watchlist.
    Add(WatchlistMovieArgs),
    /// Remove a movie from a watchlist.
    Remove(WatchlistMovieArgs),
    /// Rename a watchlist.
    Rename(WatchlistRenameArgs),
    /// Delete a watchlist.
    Delete(WatchlistIdArgs),
}

/// Arguments for `watchlist list`.
#[derive(clap::Args)]
struct WatchlistListArgs {
    /// Include when each movie was added.
    #[arg(long)]
    with_movies: bool,
}

/// Watchlist selector.
#[derive(clap::Args)]
struct WatchlistIdArgs {
    /// Watchlist ID.
    #[arg(long, required = true)]
    id: String,
}

/// Arguments for `watchlist create`.
#[derive(clap::Args)]
struct WatchlistCreateArgs {
    /// Display name.
    #[arg(long, required = true)]
    name: String,
    /// Optional description.
    #[arg(long)]
    description: Option<String>,
}

/// Arguments for `watchlist add` and `watchlist remove`.
#[derive(clap::Args)]
struct WatchlistMovieArgs {
    /// Watchlist ID.
    #[arg(long, required = true)]
    id: String,
    /// Catalog movie ID.
    #[arg(long, required = true)]
    movie: u64,
}

/// Arguments for `watchlist rename`.
#[derive(clap::Args)]
struct WatchlistRenameArgs {
    /// Watchlist ID.
    #[arg(long, required = true)]
    id: String,
    /// New display name.
    #[arg(long, required = true)]
    name: String,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Print the effective configuration.
    Show,
    /// Write a config file with default values.
    Init(ConfigInitArgs),
}

/// Arguments for `config init`.
#[derive(clap::Args)]
struct ConfigInitArgs {
    /// Overwrite an existing file.
    #[arg(long)]
    force: bool,
}

/// Arguments for the `completions` subcommand.
#[derive(clap::Args)]
struct CompletionsArgs {
    /// Target shell.
    shell: Shell,
}

/// Installs the global tracing subscriber.
fn init_tracing() {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;

        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let endpoint_set = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").is_ok();

        let otel_layer = endpoint_set
            .then(|| {
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
            })
            .flatten();

        let log_layer = endpoint_set
            .then(|| {
                let exporter = opentelemetry_otlp::LogExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let logger_provider = opentelemetry_sdk::logs::SdkLoggerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                Some(OpenTelemetryTracingBridge::new(&logger_provider))
            })
            .flatten();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .with(log_layer)
            .init();
    }
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let dir = cli.dir.as_deref();

    match cli.command {
        Commands::Completions(args) => {
            settings::print_completions(args.shell);
            Ok(())
        }
        Commands::Config(cmd) => match cmd.command {
            ConfigSubcommands::Show => settings::run_config_show(dir),
            ConfigSubcommands::Init(args) => settings::run_config_init(dir, args.force),
        },
        command => {
            let app = App::new(dir)?;
            run(&app, command).await
        }
    }
}

/// Dispatches commands that need the service clients.
async fn run(app: &App, command: Commands) -> Result<()> {
    match command {
        Commands::Movies(cmd) => match cmd.command {
            MoviesSubcommands::Popular(args) => catalog::run_popular_movies(app, args.pages).await,
            MoviesSubcommands::Upcoming(args) => {
                catalog::run_upcoming_movies(app, args.pages).await
            }
            MoviesSubcommands::NowPlaying(args) => {
                catalog::run_now_playing_movies(app, args.pages).await
            }
            MoviesSubcommands::Discover(args) => {
                catalog::run_discover_movies(app, &args.sort_by, args.paging.pages).await
            }
        },
        Commands::Tv(cmd) => match cmd.command {
            TvSubcommands::Discover(args) => {
                catalog::run_discover_tv(app, &args.sort_by, args.paging.pages).await
            }
        },
        Commands::Genres => catalog::run_genres(app).await,
        Commands::People(cmd) => match cmd.command {
            PeopleSubcommands::Popular(args) => catalog::run_popular_people(app, args.pages).await,
        },
        Commands::Movie(cmd) => match cmd.command {
            MovieSubcommands::Details(args) => catalog::run_movie_details(app, args.id).await,
            MovieSubcommands::Credits(args) => catalog::run_movie_credits(app, args.id).await,
            MovieSubcommands::Videos(args) => catalog::run_movie_videos(app, args.id).await,
        },
        Commands::Search(args) => {
            catalog::run_search(app, &args.query, args.page, args.year).await
        }
        Commands::Auth(cmd) => match cmd.command {
            AuthSubcommands::Register(args) => {
                let request = RegisterRequest {
                    full_name: args.full_name,
                    username: args.username,
                    email: args.email,
                    password: args.password,
                };
                account::run_register(app, request).await
            }
            AuthSubcommands::Login(args) => {
                let request = LoginRequest {
                    email: args.email,
                    password: args.password,
                };
                account::run_login(app, request).await
            }
            AuthSubcommands::Logout => account::run_logout(app).await,
            AuthSubcommands::Profile => account::run_profile(app).await,
        },
        Commands::User(cmd) => match cmd.command {
            UserSubcommands::Show(args) => account::run_user_show(app, args.id).await,
        },
        Commands::Watchlist(cmd) => match cmd.command {
            WatchlistSubcommands::List(args) => {
                account::run_watchlist_list(app, args.with_movies).await
            }
            WatchlistSubcommands::Show(args) => account::run_watchlist_show(app, args.id).await,
            WatchlistSubcommands::Movies(args) => {
                account::run_watchlist_movies(app, args.id).await
            }
            WatchlistSubcommands::Create(args) => {
                account::run_watchlist_create(app, args.name, args.description).await
            }
            WatchlistSubcommands::Add(args) => {
                account::run_watchlist_add(app, args.id, args.movie).await
            }
            WatchlistSubcommands::Remove(args) => {
                account::run_watchlist_remove(app, args.id, args.movie).await
            }
            WatchlistSubcommands::Rename(args) => {
                account::run_watchlist_rename(app, args.id, args.name).await
            }
            WatchlistSubcommands::Delete(args) => {
                account::run_watchlist_delete(app, args.id).await
            }
        },
        Commands::Config(_) | Commands::Completions(_) => Ok(()),
    }
}
