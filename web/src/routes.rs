//! The HTTP route table.
//!
//! Every catalogue operation has exactly one route; [`route_for`] is an
//! exhaustive match so a new operation cannot ship without one.

use crate::handlers::{self, dispatch};
use crate::middleware::correlation_id;
use crate::state::AppState;
use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{MethodRouter, get, post},
};
use notebridge_core::OperationKind;
use std::collections::HashMap;
use tower_http::trace::TraceLayer;

/// HTTP method of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// `GET`
    Get,
    /// `POST`
    Post,
}

/// Method and path template of an operation.
#[must_use]
pub const fn route_for(kind: OperationKind) -> (Verb, &'static str) {
    use OperationKind as K;
    use Verb::{Get, Post};

    match kind {
        K::GetHomefeedCategory => (Get, "/api/homefeed/category"),
        K::GetHomefeedRecommend => (Post, "/api/homefeed/recommend"),
        K::GetHomefeedRecommendByNum => (Get, "/api/homefeed/recommend/by-num"),
        K::GetUserInfo => (Get, "/api/user/info/:user_id"),
        K::GetUserSelfInfo => (Get, "/api/user/self/info"),
        K::GetUserSelfInfo2 => (Get, "/api/user/self/info2"),
        K::GetUserNotes => (Get, "/api/user/:user_id/notes"),
        K::GetUserAllNotes => (Get, "/api/user/notes/all"),
        K::GetUserLikes => (Get, "/api/user/:user_id/likes"),
        K::GetUserAllLikes => (Get, "/api/user/likes/all"),
        K::GetUserCollects => (Get, "/api/user/:user_id/collects"),
        K::GetUserAllCollects => (Get, "/api/user/collects/all"),
        K::GetNoteInfo => (Get, "/api/note/info"),
        K::GetNoteNoWatermarkVideo => (Get, "/api/note/video/no-watermark/:note_id"),
        K::GetNoteNoWatermarkImage => (Get, "/api/note/image/no-watermark"),
        K::GetSearchKeyword => (Get, "/api/search/keyword"),
        K::SearchNotes => (Get, "/api/search/notes"),
        K::SearchSomeNotes => (Get, "/api/search/notes/some"),
        K::SearchUsers => (Get, "/api/search/users"),
        K::SearchSomeUsers => (Get, "/api/search/users/some"),
        K::GetNoteComments => (Get, "/api/note/:note_id/comments"),
        K::GetNoteAllComments => (Get, "/api/note/:note_id/comments/all"),
        K::GetNoteAllComment => (Get, "/api/note/comments/all"),
        K::GetUnreadMessage => (Get, "/api/message/unread"),
        K::GetMentions => (Get, "/api/message/mentions"),
        K::GetAllMentions => (Get, "/api/message/mentions/all"),
        K::GetLikes => (Get, "/api/message/likes"),
        K::GetAllLikes => (Get, "/api/message/likes/all"),
        K::GetConnections => (Get, "/api/message/connections"),
        K::GetAllConnections => (Get, "/api/message/connections/all"),
        K::SetCookies => (Post, "/api/set_cookies"),
        K::GetCookies => (Get, "/api/get_cookies"),
    }
}

fn operation_route(kind: OperationKind, verb: Verb) -> MethodRouter<AppState> {
    if kind == OperationKind::SetCookies {
        return post(handlers::set_cookies);
    }

    let handler = move |State(state): State<AppState>,
                        path: Option<Path<HashMap<String, String>>>,
                        Query(query): Query<HashMap<String, String>>| async move {
        dispatch(state, kind, path, query).await
    };
    match verb {
        Verb::Get => get(handler),
        Verb::Post => post(handler),
    }
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let router = OperationKind::ALL.into_iter().fold(
        Router::new()
            .route("/", get(handlers::root))
            .route("/health", get(handlers::health_check)),
        |router, kind| {
            let (verb, path) = route_for(kind);
            router.route(path, operation_route(kind, verb))
        },
    );

    router
        .fallback(handlers::fallback)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(correlation_id))
        .with_state(state)
}
