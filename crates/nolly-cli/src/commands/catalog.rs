//! Catalog subcommands: listings, lookups and search.

use anyhow::Result;
use nolly_api::MovieId;
use nolly_api::catalog::{
    CatalogItem, DiscoverParams, GenreList, ListParams, MovieLookup, Paginated, SearchMovieParams,
    genre_labels,
};
use nolly_query::slices::CatalogEndpoints;
use nolly_query::{Identified, PagedArgs, Paginator, QueryDef};
use tracing::instrument;

use super::{failure, or_dash};
use crate::app::App;

/// Loads `pages` pages of a listing, stopping early on the last page.
async fn load_pages<A, T>(
    app: &App,
    def: &QueryDef<A, Paginated<T>>,
    root: &A,
    pages: u32,
) -> Result<Paginator<A, T>>
where
    A: PagedArgs,
    T: Identified + Clone + Send + Sync + 'static,
{
    let mut paginator = Paginator::new(app.client.clone(), def.clone(), root);
    paginator
        .load_first()
        .await
        .map_err(|e| failure(&e, "Could not load listing"))?;
    for _ in 1..pages {
        let loaded = paginator
            .load_more()
            .await
            .map_err(|e| failure(&e, "Could not load more results"))?;
        if !loaded {
            break;
        }
    }
    Ok(paginator)
}

fn list_params(app: &App) -> ListParams {
    let params = ListParams::page(1).language(app.config.catalog.language.clone());
    match &app.config.catalog.region {
        Some(region) => params.region(region.clone()),
        None => params,
    }
}

fn discover_params(app: &App, sort_by: &str) -> DiscoverParams {
    DiscoverParams {
        list: list_params(app),
        ..DiscoverParams::page(1)
    }
    .sort_by(sort_by)
    .include_adult(app.config.catalog.include_adult)
}

fn print_items(items: &[CatalogItem], total: Option<u32>, genres: Option<&GenreList>) {
    tracing::info!("ID\tYear\tRating\tTitle\t\t\tGenres");
    for item in items {
        let labels = genres.map_or_else(String::new, |g| genre_labels(item, &g.genres).join(", "));
        tracing::info!(
            "{}\t{}\t{:.1}\t{}\t\t\t{}",
            item.id,
            item.release_year().unwrap_or("-"),
            item.vote_average,
            item.title,
            labels,
        );
    }
    tracing::info!("Showing {} of {} results", items.len(), or_dash(total));
}

async fn run_movie_listing(
    app: &App,
    catalog: &CatalogEndpoints,
    def: &QueryDef<ListParams, Paginated<CatalogItem>>,
    pages: u32,
) -> Result<()> {
    let genres = app
        .client
        .fetch(&catalog.movie_genres, app.config.catalog.language.clone())
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "genre list unavailable"))
        .ok();

    let paginator = load_pages(app, def, &list_params(app), pages).await?;
    let list = paginator.list();
    print_items(list.items(), list.total_results(), genres.as_deref());
    Ok(())
}

/// Runs `movies popular`.
///
/// # Errors
///
/// Returns an error if the token is missing or a page request fails.
#[instrument(skip_all)]
pub async fn run_popular_movies(app: &App, pages: u32) -> Result<()> {
    let catalog = app.catalog()?;
    run_movie_listing(app, &catalog, &catalog.popular_movies, pages).await
}

/// Runs `movies upcoming`.
///
/// # Errors
///
/// Returns an error if the token is missing or a page request fails.
#[instrument(skip_all)]
pub async fn run_upcoming_movies(app: &App, pages: u32) -> Result<()> {
    let catalog = app.catalog()?;
    run_movie_listing(app, &catalog, &catalog.upcoming_movies, pages).await
}

/// Runs `movies now-playing`.
///
/// # Errors
///
/// Returns an error if the token is missing or a page request fails.
#[instrument(skip_all)]
pub async fn run_now_playing_movies(app: &App, pages: u32) -> Result<()> {
    let catalog = app.catalog()?;
    run_movie_listing(app, &catalog, &catalog.now_playing_movies, pages).await
}

/// Runs `movies discover`.
///
/// # Errors
///
/// Returns an error if the token is missing or a page request fails.
#[instrument(skip_all)]
pub async fn run_discover_movies(app: &App, sort_by: &str, pages: u32) -> Result<()> {
    let catalog = app.catalog()?;
    let params = discover_params(app, sort_by);
    let paginator = load_pages(app, &catalog.discover_movies, &params, pages).await?;
    let list = paginator.list();
    print_items(list.items(), list.total_results(), None);
    Ok(())
}

/// Runs `tv discover`.
///
/// # Errors
///
/// Returns an error if the token is missing or a page request fails.
#[instrument(skip_all)]
pub async fn run_discover_tv(app: &App, sort_by: &str, pages: u32) -> Result<()> {
    let catalog = app.catalog()?;
    let params = discover_params(app, sort_by);
    let paginator = load_pages(app, &catalog.discover_tv, &params, pages).await?;
    let list = paginator.list();
    print_items(list.items(), list.total_results(), None);
    Ok(())
}

/// Runs `genres`.
///
/// # Errors
///
/// Returns an error if the token is missing or the request fails.
#[instrument(skip_all)]
pub async fn run_genres(app: &App) -> Result<()> {
    let catalog = app.catalog()?;
    let list = app
        .client
        .fetch(&catalog.movie_genres, app.config.catalog.language.clone())
        .await
        .map_err(|e| failure(&e, "Could not load genres"))?;

    tracing::info!("ID\tName");
    for genre in &list.genres {
        tracing::info!("{}\t{}", genre.id, genre.name);
    }
    Ok(())
}

/// Runs `people popular`.
///
/// # Errors
///
/// Returns an error if the token is missing or a page request fails.
#[instrument(skip_all)]
pub async fn run_popular_people(app: &App, pages: u32) -> Result<()> {
    let catalog = app.catalog()?;
    let paginator = load_pages(app, &catalog.popular_people, &list_params(app), pages).await?;
    let list = paginator.list();

    tracing::info!("ID\tDepartment\tName\t\t\tKnown for");
    for person in list.items() {
        let known_for: Vec<&str> = person.known_for.iter().map(|i| i.title.as_str()).collect();
        tracing::info!(
            "{}\t{}\t{}\t\t\t{}",
            person.id,
            person.known_for_department.as_deref().unwrap_or("-"),
            person.name,
            known_for.join(", "),
        );
    }
    tracing::info!(
        "Showing {} of {} people",
        list.items().len(),
        or_dash(list.total_results())
    );
    Ok(())
}

fn lookup(app: &App, id: u64) -> MovieLookup {
    MovieLookup::new(MovieId(id)).language(app.config.catalog.language.clone())
}

/// Runs `movie details`.
///
/// # Errors
///
/// Returns an error if the token is missing or the request fails.
#[instrument(skip_all, fields(id = id))]
pub async fn run_movie_details(app: &App, id: u64) -> Result<()> {
    let catalog = app.catalog()?;
    let movie = app
        .client
        .fetch(&catalog.movie_details, lookup(app, id))
        .await
        .map_err(|e| failure(&e, "Could not load movie"))?;

    let genres: Vec<&str> = movie.genres.iter().map(|g| g.name.as_str()).collect();
    let companies: Vec<&str> = movie
        .production_companies
        .iter()
        .map(|c| c.name.as_str())
        .collect();

    tracing::info!("ID: {}", movie.id);
    tracing::info!("Title: {}", movie.title);
    tracing::info!(
        "Original Title: {}",
        movie.original_title.as_deref().unwrap_or("-")
    );
    tracing::info!("Tagline: {}", movie.tagline.as_deref().unwrap_or("-"));
    tracing::info!("Release Date: {}", movie.release_date.as_deref().unwrap_or("-"));
    tracing::info!("Runtime: {} min", or_dash(movie.runtime));
    tracing::info!(
        "Rating: {:.1} ({} votes)",
        movie.vote_average,
        movie.vote_count
    );
    tracing::info!("Genres: {}", genres.join(", "));
    tracing::info!("Companies: {}", companies.join(", "));
    tracing::info!("IMDb: {}", movie.imdb_id.as_deref().unwrap_or("-"));
    tracing::info!("Overview: {}", movie.overview.as_deref().unwrap_or("-"));
    Ok(())
}

/// Number of cast members printed by `movie credits`.
const CAST_LIMIT: usize = 10;

/// Runs `movie credits`.
///
/// # Errors
///
/// Returns an error if the token is missing or the request fails.
#[instrument(skip_all, fields(id = id))]
pub async fn run_movie_credits(app: &App, id: u64) -> Result<()> {
    let catalog = app.catalog()?;
    let credits = app
        .client
        .fetch(&catalog.movie_credits, lookup(app, id))
        .await
        .map_err(|e| failure(&e, "Could not load credits"))?;

    for director in credits.crew_with_job("Director") {
        tracing::info!("Director: {}", director.name);
    }
    tracing::info!("Cast:");
    for member in credits.cast.iter().take(CAST_LIMIT) {
        tracing::info!(
            "  {}\tas {}",
            member.name,
            member.character.as_deref().unwrap_or("-")
        );
    }
    tracing::info!(
        "Total: {} cast, {} crew",
        credits.cast.len(),
        credits.crew.len()
    );
    Ok(())
}

/// Runs `movie videos`.
///
/// # Errors
///
/// Returns an error if the token is missing or the request fails.
#[instrument(skip_all, fields(id = id))]
pub async fn run_movie_videos(app: &App, id: u64) -> Result<()> {
    let catalog = app.catalog()?;
    let videos = app
        .client
        .fetch(&catalog.movie_videos, lookup(app, id))
        .await
        .map_err(|e| failure(&e, "Could not load videos"))?;

    match videos.trailer() {
        Some(trailer) => {
            tracing::info!("Trailer: {} ({} {})", trailer.name, trailer.site, trailer.key);
        }
        None => tracing::info!("No trailer available"),
    }
    tracing::info!("Type\tSite\tKey\t\tName");
    for video in &videos.results {
        tracing::info!("{}\t{}\t{}\t{}", video.kind, video.site, video.key, video.name);
    }
    Ok(())
}

/// Runs `search`.
///
/// Blank queries are rejected locally without a request.
///
/// # Errors
///
/// Returns an error if the token is missing or the request fails.
#[instrument(skip_all)]
pub async fn run_search(app: &App, query: &str, page: u32, year: Option<u32>) -> Result<()> {
    let catalog = app.catalog()?;
    let mut params = SearchMovieParams::new(query)
        .language(app.config.catalog.language.clone())
        .page(page);
    params.include_adult = app.config.catalog.include_adult;
    if let Some(year) = year {
        params = params.year(year);
    }

    let results = match app.client.fetch(&catalog.search_movies, params).await {
        Ok(results) => results,
        Err(e) if e.is_skipped() => anyhow::bail!("search text must not be blank"),
        Err(e) => return Err(failure(&e, "Search failed")),
    };

    tracing::info!(
        "Total results: {} (page {} of {})",
        results.total_results,
        results.page,
        results.total_pages
    );
    print_items(&results.results, None, None);
    Ok(())
}
