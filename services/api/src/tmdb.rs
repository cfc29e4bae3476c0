//! Pass-through client for The Movie Database
//!
//! Responses are forwarded verbatim: upstream status and JSON body, including
//! upstream failures. There is no caching and no retry; each request is
//! bounded by the configured timeout.

use axum::{
    body::Bytes,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use std::{str::FromStr, sync::Arc, time::Duration};
use tracing::info;

/// Title category understood by the TMDB endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleKind {
    Movie,
    Tv,
}

impl TitleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TitleKind::Movie => "movie",
            TitleKind::Tv => "tv",
        }
    }
}

impl FromStr for TitleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(TitleKind::Movie),
            "tv" => Ok(TitleKind::Tv),
            other => Err(format!(
                "Unsupported media type '{}': expected 'movie' or 'tv'",
                other
            )),
        }
    }
}

/// TMDB connection settings
#[derive(Clone)]
pub struct TmdbConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

/// An upstream response relayed as-is
#[derive(Debug)]
pub struct Passthrough {
    pub status: StatusCode,
    pub body: Bytes,
}

impl IntoResponse for Passthrough {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            self.body,
        )
            .into_response()
    }
}

/// TMDB client
#[derive(Clone)]
pub struct TmdbClient {
    http: reqwest::Client,
    config: Arc<TmdbConfig>,
}

impl TmdbClient {
    /// Create a new client with the configured request timeout
    pub fn new(config: TmdbConfig) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    /// `GET /search/{kind}?query=...`
    pub async fn search(&self, kind: TitleKind, query: &str) -> reqwest::Result<Passthrough> {
        let url = self.endpoint(&format!("search/{}", kind.as_str()));
        self.forward(&url, &[("query", query), ("language", "en-US")])
            .await
    }

    /// `GET /{kind}/{id}`
    pub async fn details(&self, kind: TitleKind, tmdb_id: i64) -> reqwest::Result<Passthrough> {
        let url = self.endpoint(&format!("{}/{}", kind.as_str(), tmdb_id));
        self.forward(&url, &[("language", "en-US")]).await
    }

    /// `GET /{kind}/{id}/credits`
    pub async fn credits(&self, kind: TitleKind, tmdb_id: i64) -> reqwest::Result<Passthrough> {
        let url = self.endpoint(&format!("{}/{}/credits", kind.as_str(), tmdb_id));
        self.forward(&url, &[]).await
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn forward(&self, url: &str, params: &[(&str, &str)]) -> reqwest::Result<Passthrough> {
        info!("Forwarding metadata request to {}", url);

        let response = self
            .http
            .get(url)
            .query(&[("api_key", self.config.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        Ok(Passthrough { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> TmdbClient {
        TmdbClient::new(TmdbConfig {
            api_key: "key".to_string(),
            base_url: base_url.to_string(),
            timeout: Duration::from_millis(500),
        })
        .unwrap()
    }

    #[test]
    fn test_title_kind_parsing() {
        assert_eq!("movie".parse::<TitleKind>(), Ok(TitleKind::Movie));
        assert_eq!("tv".parse::<TitleKind>(), Ok(TitleKind::Tv));
        assert!("anime".parse::<TitleKind>().is_err());
        assert!("Movie".parse::<TitleKind>().is_err());
    }

    #[test]
    fn test_endpoint_joins_paths() {
        assert_eq!(
            client("https://api.themoviedb.org/3/").endpoint("tv/1399/credits"),
            "https://api.themoviedb.org/3/tv/1399/credits"
        );
        assert_eq!(
            client("http://localhost:9999").endpoint("search/movie"),
            "http://localhost:9999/search/movie"
        );
    }

    #[tokio::test]
    async fn test_passthrough_preserves_status_and_body() {
        let response = Passthrough {
            status: StatusCode::NOT_FOUND,
            body: Bytes::from_static(br#"{"status_code":34}"#),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], br#"{"status_code":34}"#);
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_an_error() {
        // Port 9 (discard) on localhost is not expected to speak HTTP.
        let result = client("http://127.0.0.1:9").details(TitleKind::Movie, 1).await;
        assert!(result.is_err());
    }
}
