use crate::{error::Error, utils::any::Any};
use derive_more::Display;
use http::StatusCode;
use reqwest::{Client as ReqwestClient, Error as ReqwestError};
use std::future::Future;
use url::Url;

#[derive(Clone, Debug, Display)]
#[display(fmt = "{status_text}")]
pub struct FetchError {
    status: Option<StatusCode>,
    status_text: String,
}

impl FetchError {
    const TIMEOUT_STATUS_TEXT: &'static str = "timeout";
    const UNKNOWN_STATUS_TEXT: &'static str = "error";

    pub fn from_status(status: StatusCode) -> Self {
        let status_text = status.canonical_reason().unwrap_or(Self::UNKNOWN_STATUS_TEXT).into();

        Self {
            status: status.some(),
            status_text,
        }
    }

    pub fn from_transport(reqwest_err: &ReqwestError) -> Self {
        let status_text = if reqwest_err.is_timeout() {
            Self::TIMEOUT_STATUS_TEXT.into()
        } else {
            reqwest_err.to_string()
        };

        Self {
            status: reqwest_err.status(),
            status_text,
        }
    }

    pub fn status_code(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }
}

/// Issues the autocomplete request for a query and yields the raw response body.
pub trait Fetch {
    fn fetch(&self, query: &str) -> impl Send + Future<Output = Result<String, FetchError>>;
}

pub struct HttpFetch {
    client: ReqwestClient,
    url: Url,
}

impl HttpFetch {
    pub const QUERY_PARAM_NAME: &'static str = "q";

    // NOTE: requests always go to the root path of the given host, mirroring a page that asks its own origin
    pub fn new(host: &str) -> Result<Self, Error> {
        let url = std::format!("http://{host}/").parse::<Url>()?;
        let client = ReqwestClient::new();

        Self { client, url }.ok()
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl Fetch for HttpFetch {
    fn fetch(&self, query: &str) -> impl Send + Future<Output = Result<String, FetchError>> {
        let request = self
            .client
            .get(self.url.clone())
            .query(&[(Self::QUERY_PARAM_NAME, query)]);

        async move {
            let response = match request.send().await {
                Ok(response) => response,
                Err(reqwest_err) => return FetchError::from_transport(&reqwest_err).err(),
            };
            let status = response.status();

            if !status.is_success() {
                return FetchError::from_status(status).err();
            }

            response.text().await.map_err(|reqwest_err| FetchError::from_transport(&reqwest_err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        task::JoinHandle,
    };

    // NOTE: answers exactly one request with the given raw response and yields the raw request
    async fn serve_once(response: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let host = listener.local_addr().unwrap().to_string();
        let join_handle = tokio::spawn(async move {
            let (mut socket, _address) = listener.accept().await.unwrap();
            let mut bytes = std::vec![0; 4096];
            let len = socket.read(&mut bytes).await.unwrap();

            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();

            String::from_utf8_lossy(&bytes[..len]).into_owned()
        });

        (host, join_handle)
    }

    fn http_response(status_line: &str, body: &str) -> String {
        std::format!(
            "HTTP/1.1 {status_line}\r\nContent-Length: {len}\r\nContent-Type: text/plain\r\nConnection: close\r\n\r\n{body}",
            len = body.len(),
        )
    }

    #[test]
    fn new_targets_root_path() {
        let http_fetch = HttpFetch::new("localhost:8080").unwrap();

        assert_eq!(http_fetch.url().as_str(), "http://localhost:8080/");
    }

    #[test]
    fn status_error_uses_reason_phrase() {
        let fetch_err = FetchError::from_status(StatusCode::NOT_FOUND);

        assert_eq!(fetch_err.status_text(), "Not Found");
        assert_eq!(fetch_err.status_code(), Some(StatusCode::NOT_FOUND));
        assert_eq!(fetch_err.to_string(), "Not Found");
    }

    #[tokio::test]
    async fn fetch_sends_query_parameter_and_returns_body() {
        let body = r#"[{"city":"Paris"}]"#;
        let (host, join_handle) = serve_once(http_response("200 OK", body)).await;
        let text = HttpFetch::new(&host).unwrap().fetch("Saint Malo").await.unwrap();
        let request = join_handle.await.unwrap();

        assert_eq!(text, body);
        assert!(request.starts_with("GET /?q=Saint+Malo HTTP/1.1"), "{request}");
    }

    #[tokio::test]
    async fn fetch_reports_non_success_status() {
        let (host, join_handle) = serve_once(http_response("500 Internal Server Error", "")).await;
        let fetch_err = HttpFetch::new(&host).unwrap().fetch("Paris").await.unwrap_err();

        join_handle.await.unwrap();

        assert_eq!(fetch_err.status_code(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(fetch_err.status_text(), "Internal Server Error");
    }

    #[tokio::test]
    async fn fetch_reports_transport_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let host = listener.local_addr().unwrap().to_string();

        std::mem::drop(listener);

        let fetch_err = HttpFetch::new(&host).unwrap().fetch("Paris").await.unwrap_err();

        assert_eq!(fetch_err.status_code(), None);
        assert!(!fetch_err.status_text().is_empty());
    }
}
