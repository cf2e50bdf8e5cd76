//! Movie catalog API (TMDB v3) client and types.

mod api;
mod client;
mod params;
mod rate_limiter;
mod types;

pub use api::{CatalogApi, LocalCatalogApi};
pub use client::{CatalogClient, CatalogClientBuilder, DEFAULT_BASE_URL};
pub use params::{
    DEFAULT_LANGUAGE, DEFAULT_SORT_BY, DiscoverParams, ListParams, MovieLookup, SearchMovieParams,
};
pub use types::{
    CastMember, CatalogErrorResponse, CatalogItem, Credits, CrewMember, DEFAULT_POSTER_SIZE,
    DetailedCatalogItem, Genre, GenreList, IMAGE_BASE_URL, Paginated, Person, ProductionCompany,
    ProductionCountry, SpokenLanguage, Video, VideoList, genre_labels, image_url,
};
