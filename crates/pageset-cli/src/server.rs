// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! HTTP host for the renderer.
//!
//! Two routes render the configured index page:
//!
//! - `GET /` streams the page into a [`PageResponse`] and returns it
//! - `GET /string` renders the page to a string, prints it to the console and
//!   replies with a plain notice
//!
//! Rendering does blocking file I/O on cache misses, so it runs on tokio's
//! blocking pool.

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use pageset::{PageError, PageResponse, Renderer};
use serde::Serialize;
use tower_http::services::ServeDir;

use crate::config::Config;

/// Payload passed to the index page by the demo routes.
pub const DEMO_PAYLOAD: &str = "This is MY passed data.";

/// Reply body of `GET /string`.
pub const STRING_NOTICE: &str = "Check the console; you should see html";

/// Template data wrapper.
///
/// Serializes as `{"Data": ...}`, so templates read fields as `Data.payload`.
#[derive(Debug, Clone, Serialize)]
pub struct PageData<T> {
    /// The wrapped value.
    #[serde(rename = "Data")]
    pub data: T,
}

impl<T> PageData<T> {
    /// Wraps a value.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Payload of the demo routes.
#[derive(Debug, Clone, Serialize)]
pub struct DemoPayload {
    /// Text shown by the index page.
    pub payload: String,
}

fn demo_data() -> PageData<DemoPayload> {
    PageData::new(DemoPayload {
        payload: DEMO_PAYLOAD.to_string(),
    })
}

/// Shared application state.
pub struct AppState {
    /// Renderer with layouts and partials already discovered.
    pub renderer: Renderer,
    /// Page rendered by the demo routes.
    pub index: String,
}

impl AppState {
    /// Builds a renderer from `config` and discovers its layouts and partials.
    pub fn from_config(config: &Config) -> pageset::Result<Self> {
        let mut renderer = Renderer::new(config.render.clone());
        renderer.load_layouts_and_partials(&config.discovery.markers)?;
        Ok(Self {
            renderer,
            index: config.server.index.clone(),
        })
    }
}

/// Creates the axum application.
///
/// `static_dir`, when given, is served under `/static`.
pub fn app(state: Arc<AppState>, static_dir: Option<&Path>) -> Router {
    let mut router = Router::new()
        .route("/", get(stream_page))
        .route("/string", get(string_page));

    if let Some(dir) = static_dir {
        router = router.nest_service("/static", ServeDir::new(dir));
    }

    router.with_state(state)
}

async fn stream_page(State(state): State<Arc<AppState>>) -> Response {
    let rendered = tokio::task::spawn_blocking(move || {
        let mut response = PageResponse::new();
        let outcome = state
            .renderer
            .render_to_stream(&mut response, &state.index, &demo_data());
        (response, outcome)
    })
    .await;

    match rendered {
        Ok((response, Ok(()))) => page_response(response),
        // The sink already carries the 500 reply.
        Ok((response, Err(PageError::Execution { .. }))) => page_response(response),
        Ok((_, Err(e))) => error_response(StatusCode::BAD_REQUEST, &e),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &e),
    }
}

async fn string_page(State(state): State<Arc<AppState>>) -> Response {
    let rendered = tokio::task::spawn_blocking(move || {
        state.renderer.render_to_string(&state.index, &demo_data())
    })
    .await;

    match rendered {
        Ok(Ok(html)) => {
            println!("{}", html);
            (
                [(header::CONTENT_TYPE, pageset::TEXT_CONTENT_TYPE)],
                STRING_NOTICE,
            )
                .into_response()
        }
        Ok(Err(e)) if e.is_execution() => error_response(StatusCode::INTERNAL_SERVER_ERROR, &e),
        Ok(Err(e)) => error_response(StatusCode::BAD_REQUEST, &e),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &e),
    }
}

/// Converts a rendered [`PageResponse`] into an HTTP response.
pub fn page_response(response: PageResponse) -> Response {
    let (status, content_type, body) = response.into_parts();
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, content_type)], body).into_response()
}

fn error_response(status: StatusCode, err: &dyn std::fmt::Display) -> Response {
    tracing::warn!("{}: {}", status, err);
    (
        status,
        [(header::CONTENT_TYPE, pageset::TEXT_CONTENT_TYPE)],
        format!("{}\n", err),
    )
        .into_response()
}
