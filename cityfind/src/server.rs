use crate::{
    config::ServerConfig,
    error::Error,
    index::qgram_index::QGramIndex,
    search::{CityRecord, Search},
    utils::any::Any,
};
use poem::{
    endpoint::StaticFilesEndpoint,
    http::StatusCode,
    listener::TcpListener,
    middleware::Tracing,
    Endpoint, EndpointExt, Request, Response, Result as PoemResult, Route, Server as PoemServer,
};
use poem_openapi::{param::Query, payload::Json, Object, OpenApi, OpenApiService};
use serde::Deserialize;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

pub struct State {
    index: QGramIndex,
    limit: usize,
    static_dirpath: PathBuf,
}

impl State {
    const HTML_CONTENT_TYPE: &'static str = "text/html; charset=utf-8";
    const PLAIN_CONTENT_TYPE: &'static str = "text/plain; charset=utf-8";
    const NOT_FOUND_FILENAME: &'static str = "fileNotFound404.html";
    const DEFAULT_NOT_FOUND_PAGE: &'static str = "<!DOCTYPE html>\n<html><body><h1>404 File not found</h1></body></html>\n";

    pub fn new(index: QGramIndex, limit: usize, static_dirpath: PathBuf) -> Self {
        Self {
            index,
            limit,
            static_dirpath,
        }
    }

    fn search(&self, query: &str, limit: usize) -> Vec<CityRecord> {
        Search::new(&self.index).fuzzy_search(query, limit)
    }

    fn not_found_page(&self) -> Result<Vec<u8>, Error> {
        let filepath = self.static_dirpath.join(Self::NOT_FOUND_FILENAME);

        if filepath.is_file() {
            std::fs::read(filepath)?.ok()
        } else {
            Self::DEFAULT_NOT_FOUND_PAGE.as_bytes().to_vec().ok()
        }
    }

    fn not_found(&self) -> Response {
        let page = self
            .not_found_page()
            .warn()
            .unwrap_or_else(|| Self::DEFAULT_NOT_FOUND_PAGE.as_bytes().to_vec());

        Response::builder()
            .status(StatusCode::NOT_FOUND)
            .content_type(Self::HTML_CONTENT_TYPE)
            .body(page)
    }

    fn search_response(&self, query: &str) -> Response {
        let records = self.search(query, self.limit);

        tracing::info!(query, num_results = records.len(), "answered query");

        match Search::render_body(&records) {
            Ok(body) => Response::builder().content_type(Self::PLAIN_CONTENT_TYPE).body(body),
            Err(error) => {
                tracing::error!(%error);

                StatusCode::INTERNAL_SERVER_ERROR.into()
            }
        }
    }
}

#[derive(Deserialize)]
struct RootParams {
    q: Option<String>,
}

/// Everything outside of the api: `GET /?q=<query>` answers a search, any other request is a static file.
struct Site {
    state: Arc<State>,
    static_files: StaticFilesEndpoint,
}

impl Site {
    const INDEX_FILENAME: &'static str = "search.html";

    fn new(state: Arc<State>) -> Self {
        let static_files = StaticFilesEndpoint::new(&state.static_dirpath).index_file(Self::INDEX_FILENAME);

        Self { state, static_files }
    }

    fn query(request: &Request) -> Option<String> {
        if request.uri().path() != "/" {
            return None;
        }

        request.params::<RootParams>().ok()?.q
    }
}

impl Endpoint for Site {
    type Output = Response;

    async fn call(&self, request: Request) -> PoemResult<Self::Output> {
        if let Some(query) = Self::query(&request) {
            return self.state.search_response(&query).ok();
        }

        match self.static_files.call(request).await {
            Err(poem_err) if poem_err.status() == StatusCode::NOT_FOUND => self.state.not_found().ok(),
            response_res => response_res,
        }
    }
}

#[derive(Object)]
struct Stats {
    q: usize,
    num_entities: usize,
    num_qgrams: usize,
}

struct Api {
    state: Arc<State>,
}

// NOTE: OpenApi macro requires that endpoint methods be async
#[allow(clippy::unused_async)]
#[OpenApi]
impl Api {
    /// Fuzzy prefix search over the city names.
    #[oai(method = "get", path = "/search")]
    async fn search(&self, Query(q): Query<String>, Query(limit): Query<Option<usize>>) -> Json<Vec<CityRecord>> {
        let limit = limit.unwrap_or(self.state.limit);

        Json(self.state.search(&q, limit))
    }

    /// Size of the loaded index.
    #[oai(method = "get", path = "/stats")]
    async fn stats(&self) -> Json<Stats> {
        let index = &self.state.index;

        Json(Stats {
            q: index.q(),
            num_entities: index.num_entities(),
            num_qgrams: index.num_qgrams(),
        })
    }
}

pub struct Server;

impl Server {
    const API_PATH: &'static str = "/api";
    const API_SPEC_PATH: &'static str = "/api/openapi.json";
    const API_TITLE: &'static str = std::env!("CARGO_PKG_NAME");
    const API_VERSION: &'static str = std::env!("CARGO_PKG_VERSION");

    pub fn route(state: State) -> impl Endpoint {
        let state = state.arc();
        let api = Api { state: state.clone() };
        let open_api_service = OpenApiService::new(api, Self::API_TITLE, Self::API_VERSION).server(Self::API_PATH);
        let spec_endpoint = open_api_service.spec_endpoint();

        Route::new()
            .nest(Self::API_SPEC_PATH, spec_endpoint)
            .nest(Self::API_PATH, open_api_service)
            .nest("/", Site::new(state))
            .with(Tracing)
    }

    pub async fn serve(entities_filepath: &Path, config: ServerConfig) -> Result<(), Error> {
        let mut index = QGramIndex::new(config.q)?;

        index.build_from_file(entities_filepath)?;

        let address = (config.host, config.port);
        let tcp_listener = TcpListener::bind(address);
        let poem_server = PoemServer::new(tcp_listener);
        let state = State::new(index, config.limit, config.static_dirpath);

        tracing::info!(host = %config.host, port = config.port, "waiting for queries");

        poem_server.run(Self::route(state)).await?.ok()
    }
}
