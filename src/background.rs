use crate::settings::Settings;
use anyhow::Context;
use rand::seq::SliceRandom;
use rand::thread_rng;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

const PER_PAGE: &str = "30";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ImageUrls {
    #[serde(default)]
    pub full: Option<String>,
    #[serde(default)]
    pub regular: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
pub struct ImageUser {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
pub struct ImageLinks {
    #[serde(default)]
    pub html: Option<String>,
}

/// One image record from the search API.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ImageRecord {
    pub id: String,
    pub urls: ImageUrls,
    #[serde(default)]
    pub user: ImageUser,
    #[serde(default)]
    pub links: ImageLinks,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<ImageRecord>,
}

/// Background chosen for the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundImage {
    pub id: String,
    pub url: String,
    pub author: Option<String>,
    pub page: Option<String>,
}

impl BackgroundImage {
    fn from_record(record: &ImageRecord) -> Option<Self> {
        let url = record
            .urls
            .full
            .clone()
            .or_else(|| record.urls.regular.clone())?;
        Some(Self {
            id: record.id.clone(),
            url,
            author: record.user.name.clone(),
            page: record.links.html.clone(),
        })
    }
}

/// Image search client used to pick the dashboard background.
pub struct BackgroundClient {
    client: Client,
    endpoint: String,
}

impl BackgroundClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("newtab-board background")
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        Self::new(
            settings.image_endpoint.clone(),
            Duration::from_secs(settings.http_timeout_secs),
        )
    }

    pub fn search(&self, query: &str, access_key: &str) -> anyhow::Result<Vec<ImageRecord>> {
        let url = format!("{}/search/photos", self.endpoint.trim_end_matches('/'));
        let resp = self
            .client
            .get(url)
            .query(&[("query", query), ("per_page", PER_PAGE)])
            .header("Authorization", format!("Client-ID {access_key}"))
            .send()?;
        if !resp.status().is_success() {
            anyhow::bail!("http status {}", resp.status());
        }
        let body = resp.text().context("read image search body")?;
        let parsed: SearchResponse = serde_json::from_str(&body).context("parse image search")?;
        Ok(parsed.results)
    }

    /// Pick one image uniformly at random. Any failure leaves the background
    /// unchanged, signalled by `None`.
    pub fn random_image(&self, query: &str, access_key: &str) -> Option<BackgroundImage> {
        if access_key.trim().is_empty() {
            tracing::debug!("no image search key configured");
            return None;
        }
        let results = match self.search(query, access_key) {
            Ok(r) => r,
            Err(err) => {
                tracing::warn!(error = %err, "image search failed");
                return None;
            }
        };
        let usable: Vec<BackgroundImage> = results
            .iter()
            .filter_map(BackgroundImage::from_record)
            .collect();
        let picked = usable.choose(&mut thread_rng()).cloned();
        if picked.is_none() {
            tracing::debug!(%query, "image search returned no results");
        }
        picked
    }
}
