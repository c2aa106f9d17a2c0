use crate::store::{get_json, set_json, KeyValueStore};
use url::Url;

const FAVICON_SERVICE: &str = "https://www.google.com/s2/favicons";

pub fn cache_key(host: &str) -> String {
    format!("favicon_{host}")
}

fn host_of(site_url: &str) -> Option<String> {
    let parsed = Url::parse(site_url).ok()?;
    parsed.host_str().map(str::to_ascii_lowercase)
}

/// Favicon urls cached per site host under `favicon_<host>`.
pub struct FaviconCache<'a, S: KeyValueStore> {
    store: &'a mut S,
}

impl<'a, S: KeyValueStore> FaviconCache<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// Cached icon url for `site_url`, deriving and storing one on a miss.
    pub fn lookup(&mut self, site_url: &str) -> anyhow::Result<Option<String>> {
        let Some(host) = host_of(site_url) else {
            return Ok(None);
        };
        let key = cache_key(&host);
        if let Some(cached) = get_json::<String>(&*self.store, &key)? {
            return Ok(Some(cached));
        }
        let icon = format!("{FAVICON_SERVICE}?domain={}&sz=64", urlencoding::encode(&host));
        set_json(&mut *self.store, &key, &icon)?;
        tracing::debug!(%host, "cached favicon");
        Ok(Some(icon))
    }

    pub fn forget(&mut self, site_url: &str) -> anyhow::Result<()> {
        if let Some(host) = host_of(site_url) {
            let key = cache_key(&host);
            self.store.remove(&[key.as_str()])?;
        }
        Ok(())
    }
}
