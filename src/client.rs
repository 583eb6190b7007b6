//! Blocking client for the parts of the Vela API the summary needs.

use crate::config::ClientConfig;
use crate::model::{Build, Log, Service, Step};
use crate::{AppError, AppResult};
use reqwest::blocking::{Client, Response};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

/// Page size requested from list endpoints.
pub const PER_PAGE: usize = 100;

/// Upper bound on pages fetched from one list endpoint.
pub const MAX_PAGES: usize = 50;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

pub struct VelaClient {
    base_url: String,
    http: Client,
}

impl VelaClient {
    pub fn new(config: &ClientConfig) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| AppError::Config("config token is not a valid header value".to_string()))?;
        headers.insert(AUTHORIZATION, bearer);
        let agent = HeaderValue::from_str(&format!("{}/{}", config.app_name, config.app_version))
            .map_err(|_| AppError::Config("invalid user agent".to_string()))?;
        headers.insert(USER_AGENT, agent);

        let http = Client::builder().default_headers(headers).build()?;

        Ok(VelaClient {
            base_url: config.server.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn get_build(&self, org: &str, repo: &str, number: i64) -> AppResult<Build> {
        self.get(&build_path(org, repo, number), &[])
    }

    pub fn get_services(&self, org: &str, repo: &str, number: i64) -> AppResult<Vec<Service>> {
        self.get_all(&format!("{}/services", build_path(org, repo, number)))
    }

    pub fn get_steps(&self, org: &str, repo: &str, number: i64) -> AppResult<Vec<Step>> {
        self.get_all(&format!("{}/steps", build_path(org, repo, number)))
    }

    pub fn get_logs(&self, org: &str, repo: &str, number: i64) -> AppResult<Vec<Log>> {
        self.get_all(&format!("{}/logs", build_path(org, repo, number)))
    }

    /// Collects every page of a list endpoint, stopping at the first page
    /// shorter than [`PER_PAGE`]. A list still full after [`MAX_PAGES`]
    /// pages is an error.
    fn get_all<T: DeserializeOwned>(&self, path: &str) -> AppResult<Vec<T>> {
        let mut items = Vec::new();
        for page in 1..=MAX_PAGES {
            let query = [("page", page.to_string()), ("per_page", PER_PAGE.to_string())];
            let batch: Vec<T> = self.get(path, &query)?;
            let fetched = batch.len();
            trace!(path, page, fetched, "fetched page");
            items.extend(batch);
            if fetched < PER_PAGE {
                return Ok(items);
            }
        }
        Err(AppError::TooManyPages {
            path: path.to_string(),
            pages: MAX_PAGES,
        })
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> AppResult<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "sending request");

        let response = self.http.get(&url).query(query).send()?;
        let body = check_status(response)?.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}

fn build_path(org: &str, repo: &str, number: i64) -> String {
    format!("/api/v1/repos/{org}/{repo}/builds/{number}")
}

fn check_status(response: Response) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|parsed| parsed.error)
        .unwrap_or_else(|_| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                trimmed.to_string()
            }
        });

    Err(AppError::Api {
        status: status.as_u16(),
        message,
    })
}
