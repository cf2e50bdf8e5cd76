//! Catalog API response types.

use serde::{Deserialize, Serialize};

use crate::ids::{GenreId, MovieId, PersonId};

/// Default image CDN base.
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/";

/// Default poster size segment.
pub const DEFAULT_POSTER_SIZE: &str = "w500";

// --- Listings ---

/// A page of results from any listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Current page number (1-based).
    pub page: u32,
    /// Results on this page.
    pub results: Vec<T>,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of results.
    pub total_results: u32,
}

impl<T> Paginated<T> {
    /// Whether a page after this one exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// A movie or TV show as returned by listing and search endpoints.
///
/// TV records use `name`, `original_name` and `first_air_date`; they are
/// read into the same fields as movies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Catalog ID.
    pub id: MovieId,
    /// Localized title.
    #[serde(alias = "name")]
    pub title: String,
    /// Original title.
    #[serde(default, alias = "original_name")]
    pub original_title: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Release date (YYYY-MM-DD), or first air date for TV.
    #[serde(default, alias = "first_air_date")]
    pub release_date: Option<String>,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: Option<String>,
    /// Genre IDs.
    #[serde(default)]
    pub genre_ids: Vec<GenreId>,
    /// Adult flag.
    #[serde(default)]
    pub adult: bool,
}

impl CatalogItem {
    /// Full poster URL at the default size.
    #[must_use]
    pub fn poster_url(&self) -> Option<String> {
        self.poster_path
            .as_deref()
            .map(|p| image_url(p, DEFAULT_POSTER_SIZE))
    }

    /// Release year, if the release date is present.
    #[must_use]
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|d| d.get(..4))
            .filter(|y| y.len() == 4)
    }
}

/// Joins an image path onto the CDN base with the given size segment.
#[must_use]
pub fn image_url(path: &str, size: &str) -> String {
    format!(
        "{IMAGE_BASE_URL}{size}/{}",
        path.trim_start_matches('/')
    )
}

// --- Genres ---

/// Genre entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    /// Genre ID.
    pub id: GenreId,
    /// Genre name.
    pub name: String,
}

/// Response from `genre/movie/list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreList {
    /// All genres.
    pub genres: Vec<Genre>,
}

/// Maps an item's genre IDs to display names, dropping unknown IDs.
#[must_use]
pub fn genre_labels<'a>(item: &CatalogItem, genres: &'a [Genre]) -> Vec<&'a str> {
    item.genre_ids
        .iter()
        .filter_map(|id| genres.iter().find(|g| g.id == *id))
        .map(|g| g.name.as_str())
        .collect()
}

// --- People ---

/// A person (actor or crew member) from `person/popular`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Person ID.
    pub id: PersonId,
    /// Display name.
    pub name: String,
    /// Profile image path.
    #[serde(default)]
    pub profile_path: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Department the person is known for (e.g. "Acting").
    #[serde(default)]
    pub known_for_department: Option<String>,
    /// Gender code (0 unknown, 1 female, 2 male, 3 non-binary).
    #[serde(default)]
    pub gender: u8,
    /// Adult flag.
    #[serde(default)]
    pub adult: bool,
    /// Titles the person is known for.
    #[serde(default)]
    pub known_for: Vec<CatalogItem>,
}

// --- Details ---

/// Response from `movie/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedCatalogItem {
    /// Catalog ID.
    pub id: MovieId,
    /// Localized title.
    pub title: String,
    /// Original title.
    #[serde(default)]
    pub original_title: Option<String>,
    /// Tagline.
    #[serde(default)]
    pub tagline: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Release date.
    #[serde(default)]
    pub release_date: Option<String>,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: Option<String>,
    /// Runtime in minutes.
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Budget in USD (0 when unknown).
    #[serde(default)]
    pub budget: u64,
    /// Revenue in USD (0 when unknown).
    #[serde(default)]
    pub revenue: u64,
    /// Release status (e.g. "Released").
    #[serde(default)]
    pub status: Option<String>,
    /// Homepage URL.
    #[serde(default)]
    pub homepage: Option<String>,
    /// IMDb ID.
    #[serde(default)]
    pub imdb_id: Option<String>,
    /// Full genre objects.
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Production companies.
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
    /// Production countries.
    #[serde(default)]
    pub production_countries: Vec<ProductionCountry>,
    /// Spoken languages.
    #[serde(default)]
    pub spoken_languages: Vec<SpokenLanguage>,
    /// Adult flag.
    #[serde(default)]
    pub adult: bool,
}

/// Production company entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionCompany {
    /// Company ID.
    pub id: u64,
    /// Company name.
    pub name: String,
    /// Logo image path.
    #[serde(default)]
    pub logo_path: Option<String>,
    /// Origin country (ISO 3166-1).
    #[serde(default)]
    pub origin_country: Option<String>,
}

/// Production country entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionCountry {
    /// ISO 3166-1 code.
    pub iso_3166_1: String,
    /// Country name.
    pub name: String,
}

/// Spoken language entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpokenLanguage {
    /// ISO 639-1 code.
    pub iso_639_1: String,
    /// English name.
    #[serde(default)]
    pub english_name: Option<String>,
    /// Native name.
    pub name: String,
}

// --- Credits ---

/// Response from `movie/{id}/credits`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credits {
    /// Movie ID.
    pub id: MovieId,
    /// Cast, in billing order.
    #[serde(default)]
    pub cast: Vec<CastMember>,
    /// Crew.
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

impl Credits {
    /// Crew members with the given job (e.g. "Director").
    pub fn crew_with_job<'a>(&'a self, job: &'a str) -> impl Iterator<Item = &'a CrewMember> {
        self.crew.iter().filter(move |c| c.job == job)
    }
}

/// A cast credit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    /// Person ID.
    pub id: PersonId,
    /// Person name.
    pub name: String,
    /// Character played.
    #[serde(default)]
    pub character: Option<String>,
    /// Billing order (0 = top billed).
    #[serde(default)]
    pub order: u32,
    /// Profile image path.
    #[serde(default)]
    pub profile_path: Option<String>,
    /// Credit ID.
    #[serde(default)]
    pub credit_id: Option<String>,
}

/// A crew credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewMember {
    /// Person ID.
    pub id: PersonId,
    /// Person name.
    pub name: String,
    /// Job title.
    pub job: String,
    /// Department.
    pub department: String,
    /// Profile image path.
    #[serde(default)]
    pub profile_path: Option<String>,
    /// Credit ID.
    #[serde(default)]
    pub credit_id: Option<String>,
}

// --- Videos ---

/// Response from `movie/{id}/videos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoList {
    /// Movie ID.
    pub id: MovieId,
    /// Videos.
    #[serde(default)]
    pub results: Vec<Video>,
}

impl VideoList {
    /// First official YouTube trailer, else any YouTube trailer.
    #[must_use]
    pub fn trailer(&self) -> Option<&Video> {
        let youtube_trailers = || {
            self.results
                .iter()
                .filter(|v| v.site == "YouTube" && v.kind == "Trailer")
        };
        youtube_trailers()
            .find(|v| v.official)
            .or_else(|| youtube_trailers().next())
    }
}

/// A video entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    /// Video ID.
    pub id: String,
    /// Site-specific key (YouTube video ID).
    pub key: String,
    /// Hosting site (e.g. "YouTube").
    pub site: String,
    /// Video type (e.g. "Trailer", "Teaser").
    #[serde(rename = "type")]
    pub kind: String,
    /// Title.
    pub name: String,
    /// Whether the video is official.
    #[serde(default)]
    pub official: bool,
}

// --- Error Response ---

/// Catalog API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogErrorResponse {
    /// Catalog error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[serde(default)]
    pub success: bool,
}
