use crate::{
    proxy::{InboundRequest, UpstreamResponse},
    AppState, Result,
};
use axum::{
    extract::State,
    http::{Method, Uri},
};
use std::sync::Arc;

pub async fn proxy_search(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
) -> Result<UpstreamResponse> {
    state.proxy.handle(InboundRequest::new(method, &uri)).await
}
