//! Account endpoints: authentication, profile and watchlists.

use std::future::Future;
use std::sync::Arc;

use nolly_api::ApiError;
use nolly_api::account::{
    AccountApi, AuthResponse, CreateWatchlistRequest, LoginRequest, MessageResponse,
    RegisterRequest, User, Watchlist, WatchlistMovieRequest,
};
use nolly_api::{MovieId, UserId, WatchlistId};

use super::{mutation, query};
use crate::endpoint::{MutationDef, QueryDef};
use crate::error::QueryError;
use crate::session::Session;
use crate::tag::CacheTag;

/// Body of the rename mutation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenameWatchlist {
    /// Watchlist to rename.
    pub id: WatchlistId,
    /// New display name.
    pub name: String,
}

/// Query and mutation definitions for every account endpoint.
#[derive(Debug, Clone)]
pub struct AccountEndpoints {
    /// `users/register`; signs the session in.
    pub register: MutationDef<RegisterRequest, AuthResponse>,
    /// `users/login`; signs the session in.
    pub login: MutationDef<LoginRequest, AuthResponse>,
    /// Local sign-out; no request is made.
    pub logout: MutationDef<(), ()>,
    /// `users/get-profile`.
    pub user_profile: QueryDef<(), User>,
    /// `users/{id}`.
    pub user_by_id: QueryDef<UserId, User>,
    /// `watchlist`.
    pub watchlists: QueryDef<(), Vec<Watchlist>>,
    /// `watchlist/with-movies`.
    pub watchlists_with_movies: QueryDef<(), Vec<Watchlist>>,
    /// `watchlist/{id}`.
    pub watchlist_by_id: QueryDef<WatchlistId, Watchlist>,
    /// `watchlist/movies/{id}`.
    pub movies_in_watchlist: QueryDef<WatchlistId, Vec<MovieId>>,
    /// `watchlist/create`.
    pub create_watchlist: MutationDef<CreateWatchlistRequest, Watchlist>,
    /// `watchlist/add-movie`.
    pub add_to_watchlist: MutationDef<WatchlistMovieRequest, MessageResponse>,
    /// `watchlist/remove-movie`.
    pub remove_from_watchlist: MutationDef<WatchlistMovieRequest, MessageResponse>,
    /// `watchlist/update-name/{id}`.
    pub update_watchlist_name: MutationDef<RenameWatchlist, Watchlist>,
    /// `watchlist/delete/{id}`.
    pub delete_watchlist: MutationDef<WatchlistId, MessageResponse>,
}

impl AccountEndpoints {
    /// Binds every account endpoint to `api`, signing `session` in and out.
    ///
    /// `api` is expected to read its bearer token from the same `session`.
    pub fn new<S>(api: Arc<S>, session: &Session) -> Self
    where
        S: AccountApi + Send + Sync + 'static,
    {
        Self {
            register: sign_in_mutation(&api, session, "register", |api, body: RegisterRequest| {
                async move { api.register(&body).await }
            }),
            login: sign_in_mutation(&api, session, "login", |api, body: LoginRequest| async move {
                api.login(&body).await
            }),
            logout: logout(session.clone()),
            user_profile: query(&api, "user_profile", |api, (): ()| async move {
                api.user_profile().await
            })
            .requires_session()
            .provides(&[CacheTag::User]),
            user_by_id: query(&api, "user_by_id", |api, id: UserId| async move {
                api.user_by_id(&id).await
            })
            .provides(&[CacheTag::User]),
            watchlists: query(&api, "watchlists", |api, (): ()| async move {
                api.watchlists().await
            })
            .requires_session()
            .provides(&[CacheTag::Watchlist]),
            watchlists_with_movies: query(&api, "watchlists_with_movies", |api, (): ()| async move {
                api.watchlists_with_movies().await
            })
            .requires_session()
            .provides(&[CacheTag::Watchlist]),
            watchlist_by_id: query(&api, "watchlist_by_id", |api, id: WatchlistId| async move {
                api.watchlist_by_id(&id).await
            })
            .requires_session()
            .provides(&[CacheTag::Watchlist]),
            movies_in_watchlist: query(&api, "movies_in_watchlist", |api, id: WatchlistId| async move {
                api.movies_in_watchlist(&id).await
            })
            .requires_session()
            .provides(&[CacheTag::Watchlist]),
            create_watchlist: mutation(&api, "create_watchlist", |api, body: CreateWatchlistRequest| {
                async move { api.create_watchlist(&body).await }
            })
            .invalidates(&[CacheTag::Watchlist]),
            add_to_watchlist: mutation(&api, "add_to_watchlist", |api, body: WatchlistMovieRequest| {
                async move { api.add_to_watchlist(&body).await }
            })
            .invalidates(&[CacheTag::Watchlist]),
            remove_from_watchlist: mutation(
                &api,
                "remove_from_watchlist",
                |api, body: WatchlistMovieRequest| async move {
                    api.remove_from_watchlist(&body).await
                },
            )
            .invalidates(&[CacheTag::Watchlist]),
            update_watchlist_name: mutation(
                &api,
                "update_watchlist_name",
                |api, body: RenameWatchlist| async move {
                    api.update_watchlist_name(&body.id, &body.name).await
                },
            )
            .invalidates(&[CacheTag::Watchlist]),
            delete_watchlist: mutation(&api, "delete_watchlist", |api, id: WatchlistId| async move {
                api.delete_watchlist(&id).await
            })
            .invalidates(&[CacheTag::Watchlist]),
        }
    }
}

fn session_error(err: &anyhow::Error) -> QueryError {
    QueryError::Session(format!("{err:#}"))
}

/// Auth mutation that stores the returned token in `session`.
fn sign_in_mutation<S, B, F, Fut>(
    api: &Arc<S>,
    session: &Session,
    name: &'static str,
    call: F,
) -> MutationDef<B, AuthResponse>
where
    S: Send + Sync + 'static,
    B: 'static,
    F: Fn(Arc<S>, B) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<AuthResponse, ApiError>> + Send + 'static,
{
    let api = Arc::clone(api);
    let session = session.clone();
    MutationDef::new(name, move |body| {
        let request = call(Arc::clone(&api), body);
        let session = session.clone();
        async move {
            let response = request.await?;
            session
                .sign_in(&response.token)
                .map_err(|e| session_error(&e))?;
            tracing::info!(user = %response.user.username, "authenticated");
            Ok(response)
        }
    })
    .invalidates(&[CacheTag::User])
}

fn logout(session: Session) -> MutationDef<(), ()> {
    MutationDef::new("logout", move |()| {
        let session = session.clone();
        async move { session.sign_out().map_err(|e| session_error(&e)) }
    })
}
