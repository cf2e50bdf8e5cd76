//! Catalog endpoints. None of them require a session.

use std::future::Future;
use std::sync::Arc;

use nolly_api::ApiError;
use nolly_api::catalog::{
    CatalogApi, CatalogItem, Credits, DetailedCatalogItem, DiscoverParams, GenreList, ListParams,
    MovieLookup, Paginated, Person, SearchMovieParams, VideoList,
};

use super::query;
use crate::endpoint::QueryDef;

/// Query definitions for every catalog endpoint.
#[derive(Debug, Clone)]
pub struct CatalogEndpoints {
    /// `discover/movie`.
    pub discover_movies: QueryDef<DiscoverParams, Paginated<CatalogItem>>,
    /// `discover/tv`.
    pub discover_tv: QueryDef<DiscoverParams, Paginated<CatalogItem>>,
    /// `movie/popular`.
    pub popular_movies: QueryDef<ListParams, Paginated<CatalogItem>>,
    /// `movie/now_playing`.
    pub now_playing_movies: QueryDef<ListParams, Paginated<CatalogItem>>,
    /// `movie/upcoming`.
    pub upcoming_movies: QueryDef<ListParams, Paginated<CatalogItem>>,
    /// `genre/movie/list`, keyed by language.
    pub movie_genres: QueryDef<String, GenreList>,
    /// `person/popular`.
    pub popular_people: QueryDef<ListParams, Paginated<Person>>,
    /// `movie/{id}`.
    pub movie_details: QueryDef<MovieLookup, DetailedCatalogItem>,
    /// `movie/{id}/credits`.
    pub movie_credits: QueryDef<MovieLookup, Credits>,
    /// `movie/{id}/videos`.
    pub movie_videos: QueryDef<MovieLookup, VideoList>,
    /// `search/movie`. Skipped while the query text is blank.
    pub search_movies: QueryDef<SearchMovieParams, Paginated<CatalogItem>>,
}

impl CatalogEndpoints {
    /// Binds every catalog endpoint to `api`.
    pub fn new<C>(api: Arc<C>) -> Self
    where
        C: CatalogApi + Send + Sync + 'static,
    {
        Self {
            discover_movies: paced_query(&api, "discover_movies", |api, params: DiscoverParams| async move {
                api.discover_movies(&params).await
            }),
            discover_tv: paced_query(&api, "discover_tv", |api, params: DiscoverParams| async move {
                api.discover_tv(&params).await
            }),
            popular_movies: paced_query(&api, "popular_movies", |api, params: ListParams| async move {
                api.popular_movies(&params).await
            }),
            now_playing_movies: paced_query(&api, "now_playing_movies", |api, params: ListParams| async move {
                api.now_playing_movies(&params).await
            }),
            upcoming_movies: paced_query(&api, "upcoming_movies", |api, params: ListParams| async move {
                api.upcoming_movies(&params).await
            }),
            movie_genres: paced_query(&api, "movie_genres", |api, language: String| async move {
                api.movie_genres(&language).await
            }),
            popular_people: paced_query(&api, "popular_people", |api, params: ListParams| async move {
                api.popular_people(&params).await
            }),
            movie_details: paced_query(&api, "movie_details", |api, lookup: MovieLookup| async move {
                api.movie_details(&lookup).await
            }),
            movie_credits: paced_query(&api, "movie_credits", |api, lookup: MovieLookup| async move {
                api.movie_credits(&lookup).await
            }),
            movie_videos: paced_query(&api, "movie_videos", |api, lookup: MovieLookup| async move {
                api.movie_videos(&lookup).await
            }),
            search_movies: paced_query(&api, "search_movies", |api, params: SearchMovieParams| async move {
                api.search_movies(&params).await
            })
            .precondition(has_query_text),
        }
    }
}

/// Catalog query admitted through the client's rate limiter.
fn paced_query<C, A, T, F, Fut>(api: &Arc<C>, name: &'static str, call: F) -> QueryDef<A, T>
where
    C: CatalogApi + Send + Sync + 'static,
    A: 'static,
    T: 'static,
    F: Fn(Arc<C>, A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
{
    let limiter = Arc::clone(api);
    query(api, name, call).admitted_by(move || {
        let api = Arc::clone(&limiter);
        async move { api.wait_for_slot().await }
    })
}

fn has_query_text(params: &SearchMovieParams) -> bool {
    !params.query.trim().is_empty()
}
