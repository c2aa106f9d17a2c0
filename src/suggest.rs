use crate::model::{normalize_url, Shortcut};
use crate::settings::Settings;
use anyhow::Context;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use once_cell::sync::Lazy;
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::{Duration, Instant};

const WEB_SEARCH_URL: &str = "https://www.google.com/search?q=";

static MATCHER: Lazy<SkimMatcherV2> = Lazy::new(SkimMatcherV2::default);

/// Anything that turns a query into ordered suggestion strings. Failures are
/// reported as an empty list.
pub trait SuggestSource {
    fn suggest(&self, query: &str) -> Vec<String>;
}

/// Client for an OpenSearch style autocomplete endpoint returning
/// `["query", ["suggestion", ...]]`.
pub struct SuggestClient {
    client: Client,
    endpoint: String,
    max: usize,
}

impl SuggestClient {
    pub fn new(endpoint: impl Into<String>, max: usize, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("newtab-board suggest")
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            max,
        })
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        Self::new(
            settings.suggest_endpoint.clone(),
            settings.max_suggestions,
            Duration::from_secs(settings.http_timeout_secs),
        )
    }

    fn fetch(&self, query: &str) -> anyhow::Result<Vec<String>> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("client", "firefox"), ("q", query)])
            .send()?;
        if !resp.status().is_success() {
            anyhow::bail!("http status {}", resp.status());
        }
        let body = resp.text().context("read suggestion body")?;
        let mut list = parse_suggestions(&body)?;
        list.truncate(self.max);
        Ok(list)
    }
}

impl SuggestSource for SuggestClient {
    fn suggest(&self, query: &str) -> Vec<String> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        match self.fetch(query) {
            Ok(list) => list,
            Err(err) => {
                tracing::warn!(error = %err, "autocomplete request failed");
                Vec::new()
            }
        }
    }
}

pub fn parse_suggestions(body: &str) -> anyhow::Result<Vec<String>> {
    let value: Value = serde_json::from_str(body).context("parse suggestions")?;
    let list = value
        .get(1)
        .and_then(Value::as_array)
        .context("suggestion list missing")?;
    Ok(list
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect())
}

/// A query that survived the debounce delay, tagged with its issue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuery {
    pub seq: u64,
    pub query: String,
}

/// Trailing-edge debounce. Each input restarts the delay and only the last
/// query is released once the input has been quiet for the full delay.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
    seq: u64,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            seq: 0,
        }
    }

    pub fn input(&mut self, query: &str, now: Instant) {
        self.pending = Some((query.to_string(), now));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Release the pending query once its delay has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<PendingQuery> {
        let (_, at) = self.pending.as_ref()?;
        if now.saturating_duration_since(*at) < self.delay {
            return None;
        }
        let (query, _) = self.pending.take()?;
        self.seq += 1;
        Some(PendingQuery {
            seq: self.seq,
            query,
        })
    }
}

/// Suggestions currently on screen. Responses older than the newest one
/// already shown are discarded.
#[derive(Debug, Default, Clone)]
pub struct SuggestionList {
    items: Vec<String>,
    shown_seq: u64,
}

impl SuggestionList {
    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn apply(&mut self, seq: u64, items: Vec<String>) -> bool {
        if seq < self.shown_seq {
            tracing::debug!(seq, shown = self.shown_seq, "dropping stale suggestions");
            return false;
        }
        self.shown_seq = seq;
        self.items = items;
        true
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Search box state: debounced autocomplete over a [`SuggestSource`].
pub struct SearchBox<S: SuggestSource> {
    source: S,
    debouncer: Debouncer,
    suggestions: SuggestionList,
    query: String,
}

impl<S: SuggestSource> SearchBox<S> {
    pub fn new(source: S, delay: Duration) -> Self {
        Self {
            source,
            debouncer: Debouncer::new(delay),
            suggestions: SuggestionList::default(),
            query: String::new(),
        }
    }

    pub fn from_settings(source: S, settings: &Settings) -> Self {
        Self::new(source, Duration::from_millis(settings.debounce_ms))
    }

    pub fn delay(&self) -> Duration {
        self.debouncer.delay
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn suggestions(&self) -> &[String] {
        self.suggestions.items()
    }

    /// Record a keystroke. Clearing the box hides suggestions immediately.
    pub fn on_input(&mut self, query: &str, now: Instant) {
        self.query = query.to_string();
        if query.trim().is_empty() {
            self.debouncer.cancel();
            self.suggestions.clear();
        } else {
            self.debouncer.input(query, now);
        }
    }

    /// Fetch suggestions when the debounce delay has elapsed. Returns `true`
    /// when the visible list changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(pending) => {
                let items = self.source.suggest(&pending.query);
                self.suggestions.apply(pending.seq, items)
            }
            None => false,
        }
    }

    /// Url to open for the current query.
    pub fn submit(&self) -> Option<String> {
        search_url(&self.query)
    }
}

fn looks_like_url(query: &str) -> bool {
    if query.chars().any(char::is_whitespace) {
        return false;
    }
    if query.contains("://") {
        return true;
    }
    let host = query.split('/').next().unwrap_or("");
    host.contains('.') && !host.starts_with('.') && !host.ends_with('.')
}

/// Url for a search box submission: the query itself when it looks like an
/// address, otherwise a web search for it.
pub fn search_url(query: &str) -> Option<String> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    if looks_like_url(query) {
        return normalize_url(query).ok();
    }
    Some(format!("{WEB_SEARCH_URL}{}", urlencoding::encode(query)))
}

/// Shortcuts fuzzily matching `query` by name or url, best match first.
pub fn matching_shortcuts<'a>(shortcuts: &'a [Shortcut], query: &str) -> Vec<&'a Shortcut> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }
    let mut scored: Vec<(i64, &Shortcut)> = shortcuts
        .iter()
        .filter_map(|s| {
            let name = MATCHER.fuzzy_match(&s.name, query);
            let url = MATCHER.fuzzy_match(&s.url, query);
            name.max(url).map(|score| (score, s))
        })
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, s)| s).collect()
}
