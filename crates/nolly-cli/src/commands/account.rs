//! Account subcommands: authentication, users and watchlists.

use anyhow::{Result, bail};
use nolly_api::account::{
    CreateWatchlistRequest, LoginRequest, RegisterRequest, User, Watchlist, WatchlistMovieRequest,
};
use nolly_api::{MovieId, UserId, WatchlistId};
use nolly_query::slices::RenameWatchlist;
use tracing::instrument;

use super::{NOT_SIGNED_IN, failure};
use crate::app::App;

fn print_user(user: &User) {
    tracing::info!("ID: {}", user.id);
    tracing::info!("Name: {}", user.full_name);
    tracing::info!("Username: {}", user.username);
    tracing::info!("Email: {}", user.email);
    tracing::info!("Member since: {}", user.created_at.format("%Y-%m-%d"));
}

fn print_watchlists(lists: &[Watchlist]) {
    if lists.is_empty() {
        tracing::info!("No watchlists");
        return;
    }
    tracing::info!("ID\t\t\t\tMovies\tName");
    for list in lists {
        tracing::info!("{}\t{}\t{}", list.id, list.movies.len(), list.name);
    }
}

fn require_session(app: &App) -> Result<()> {
    if app.session.is_authenticated() {
        Ok(())
    } else {
        bail!(NOT_SIGNED_IN)
    }
}

/// Runs `auth register`.
///
/// # Errors
///
/// Returns the server message when registration is rejected.
#[instrument(skip_all)]
pub async fn run_register(app: &App, request: RegisterRequest) -> Result<()> {
    let auth = app
        .client
        .mutate(&app.account.register, request)
        .await
        .map_err(|e| failure(&e, "Registration failed"))?;
    tracing::info!("Registered and signed in as {}", auth.user.username);
    Ok(())
}

/// Runs `auth login`.
///
/// # Errors
///
/// Returns the server message when the credentials are rejected.
#[instrument(skip_all)]
pub async fn run_login(app: &App, request: LoginRequest) -> Result<()> {
    let auth = app
        .client
        .mutate(&app.account.login, request)
        .await
        .map_err(|e| failure(&e, "Login failed"))?;
    tracing::info!("Signed in as {} <{}>", auth.user.username, auth.user.email);
    Ok(())
}

/// Runs `auth logout`. Signing out when already signed out succeeds.
///
/// # Errors
///
/// Returns an error if the stored token cannot be removed.
#[instrument(skip_all)]
pub async fn run_logout(app: &App) -> Result<()> {
    app.client
        .mutate(&app.account.logout, ())
        .await
        .map_err(|e| failure(&e, "Logout failed"))?;
    tracing::info!("Signed out");
    Ok(())
}

/// Runs `auth profile`.
///
/// # Errors
///
/// Returns an error when signed out or when the request fails.
#[instrument(skip_all)]
pub async fn run_profile(app: &App) -> Result<()> {
    let user = app
        .client
        .fetch(&app.account.user_profile, ())
        .await
        .map_err(|e| failure(&e, "Could not load profile"))?;
    print_user(&user);
    Ok(())
}

/// Runs `user show`.
///
/// # Errors
///
/// Returns the server message when the user does not exist.
#[instrument(skip_all, fields(id = %id))]
pub async fn run_user_show(app: &App, id: String) -> Result<()> {
    let user = app
        .client
        .fetch(&app.account.user_by_id, UserId::from(id.as_str()))
        .await
        .map_err(|e| failure(&e, "Could not load user"))?;
    print_user(&user);
    Ok(())
}

/// Runs `watchlist list`.
///
/// # Errors
///
/// Returns an error when signed out or when the request fails.
#[instrument(skip_all)]
pub async fn run_watchlist_list(app: &App, with_movies: bool) -> Result<()> {
    let def = if with_movies {
        &app.account.watchlists_with_movies
    } else {
        &app.account.watchlists
    };
    let lists = app
        .client
        .fetch(def, ())
        .await
        .map_err(|e| failure(&e, "Could not load watchlists"))?;

    print_watchlists(&lists);
    if with_movies {
        for list in lists.as_slice() {
            let ids: Vec<String> = list
                .movies
                .movie_ids()
                .iter()
                .map(MovieId::to_string)
                .collect();
            tracing::info!("{}: {}", list.name, ids.join(", "));
        }
    }
    Ok(())
}

/// Runs `watchlist show`.
///
/// # Errors
///
/// Returns an error when signed out or when the watchlist cannot be loaded.
#[instrument(skip_all, fields(id = %id))]
pub async fn run_watchlist_show(app: &App, id: String) -> Result<()> {
    let list = app
        .client
        .fetch(&app.account.watchlist_by_id, WatchlistId::from(id.as_str()))
        .await
        .map_err(|e| failure(&e, "Could not load watchlist"))?;

    tracing::info!("ID: {}", list.id);
    tracing::info!("Name: {}", list.name);
    tracing::info!(
        "Description: {}",
        list.description.as_deref().unwrap_or("-")
    );
    tracing::info!("Movies: {}", list.movies.len());
    tracing::info!("Updated: {}", list.updated_at.format("%Y-%m-%d %H:%M"));
    Ok(())
}

/// Runs `watchlist movies`.
///
/// # Errors
///
/// Returns an error when signed out or when the watchlist cannot be loaded.
#[instrument(skip_all, fields(id = %id))]
pub async fn run_watchlist_movies(app: &App, id: String) -> Result<()> {
    let movies = app
        .client
        .fetch(&app.account.movies_in_watchlist, WatchlistId::from(id.as_str()))
        .await
        .map_err(|e| failure(&e, "Could not load watchlist"))?;

    if movies.is_empty() {
        tracing::info!("Watchlist is empty");
    }
    for movie in movies.as_slice() {
        tracing::info!("{movie}");
    }
    Ok(())
}

/// Runs `watchlist create`.
///
/// # Errors
///
/// Returns an error when signed out or when the server rejects the request.
#[instrument(skip_all)]
pub async fn run_watchlist_create(
    app: &App,
    name: String,
    description: Option<String>,
) -> Result<()> {
    require_session(app)?;
    let list = app
        .client
        .mutate(
            &app.account.create_watchlist,
            CreateWatchlistRequest { name, description },
        )
        .await
        .map_err(|e| failure(&e, "Could not create watchlist"))?;
    tracing::info!("Created watchlist {} ({})", list.name, list.id);
    Ok(())
}

/// Runs `watchlist add`.
///
/// # Errors
///
/// Returns an error when signed out or when the server rejects the request.
#[instrument(skip_all, fields(id = %id, movie = movie))]
pub async fn run_watchlist_add(app: &App, id: String, movie: u64) -> Result<()> {
    require_session(app)?;
    let request = WatchlistMovieRequest {
        watchlist_id: WatchlistId::from(id.as_str()),
        movie_id: MovieId(movie),
    };
    let response = app
        .client
        .mutate(&app.account.add_to_watchlist, request)
        .await
        .map_err(|e| failure(&e, "Could not add movie"))?;
    tracing::info!("{}", response.message);
    Ok(())
}

/// Runs `watchlist remove`.
///
/// # Errors
///
/// Returns an error when signed out or when the server rejects the request.
#[instrument(skip_all, fields(id = %id, movie = movie))]
pub async fn run_watchlist_remove(app: &App, id: String, movie: u64) -> Result<()> {
    require_session(app)?;
    let request = WatchlistMovieRequest {
        watchlist_id: WatchlistId::from(id.as_str()),
        movie_id: MovieId(movie),
    };
    let response = app
        .client
        .mutate(&app.account.remove_from_watchlist, request)
        .await
        .map_err(|e| failure(&e, "Could not remove movie"))?;
    tracing::info!("{}", response.message);
    Ok(())
}

/// Runs `watchlist rename`.
///
/// # Errors
///
/// Returns an error when signed out or when the server rejects the request.
#[instrument(skip_all, fields(id = %id))]
pub async fn run_watchlist_rename(app: &App, id: String, name: String) -> Result<()> {
    require_session(app)?;
    let request = RenameWatchlist {
        id: WatchlistId::from(id.as_str()),
        name,
    };
    let list = app
        .client
        .mutate(&app.account.update_watchlist_name, request)
        .await
        .map_err(|e| failure(&e, "Could not rename watchlist"))?;
    tracing::info!("Renamed watchlist {} to {}", list.id, list.name);
    Ok(())
}

/// Runs `watchlist delete`.
///
/// # Errors
///
/// Returns an error when signed out or when the server rejects the request.
#[instrument(skip_all, fields(id = %id))]
pub async fn run_watchlist_delete(app: &App, id: String) -> Result<()> {
    require_session(app)?;
    let response = app
        .client
        .mutate(&app.account.delete_watchlist, WatchlistId::from(id.as_str()))
        .await
        .map_err(|e| failure(&e, "Could not delete watchlist"))?;
    tracing::info!("{}", response.message);
    Ok(())
}
