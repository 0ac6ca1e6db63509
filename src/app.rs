use axum::{extract::DefaultBodyLimit, response::Html, routing::get, Router};
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::{
  domains::{
    document::rest::document_routes, report::rest::report_routes, search::rest::search_routes,
    user::rest::user_routes,
  },
  state::SharedAppState,
};

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn create_app(state: SharedAppState) -> Router {
  let api_routes = user_routes()
    .merge(report_routes())
    .merge(search_routes())
    .merge(document_routes());

  Router::new()
    .route("/", get(index_handler))
    .nest("/api", api_routes)
    .nest_service("/images", ServeDir::new(state.store.root()))
    .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
    .layer(CorsLayer::permissive())
    .with_state(state)
}

pub async fn index_handler() -> Html<String> {
  Html("<h1>FindMe API</h1>".to_string())
}
