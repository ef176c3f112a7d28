//! Client identity middleware for rate limited endpoints.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};

use crate::state::AppState;
use crate::utils::client_key::resolve_client_key;

/// Rate limiting identity of the caller, available to handlers as an
/// `Extension<ClientKey>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientKey(pub String);

impl ClientKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Resolves the [`ClientKey`] for the request and stores it in extensions.
///
/// The socket peer comes from `ConnectInfo<SocketAddr>`; proxy headers are
/// consulted only when [`AppState::behind_proxy`] is set.
///
/// # Example
///
/// ```rust,ignore
/// let api = Router::new()
///     .route("/shorten", post(shorten_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), client_key::layer));
/// ```
pub async fn layer(State(st): State<AppState>, mut req: Request, next: Next) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let key = resolve_client_key(req.headers(), peer, st.behind_proxy);
    req.extensions_mut().insert(ClientKey(key));

    next.run(req).await
}
