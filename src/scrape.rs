use core::time::Duration;

use compact_str::CompactString;
use rand::seq::IndexedRandom;
use reqwest::Client as Request;
use scraper::{Html, Selector};

use crate::{config, util};

pub const USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64; rv:127.0) Gecko/20100101 Firefox/127.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
];

pub fn basic(timeout: Duration) -> reqwest::Result<Request> {
    let user_agent = USER_AGENTS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(USER_AGENTS[0]);

    Request::builder()
        .timeout(timeout)
        .connect_timeout(config::CONNECT_TIMEOUT.min(timeout))
        .user_agent(user_agent)
        .build()
}

/// Anything that can turn a term into result titles.
pub trait Search {
    fn search(&self, term: &str) -> impl Future<Output = Vec<CompactString>>;
}

pub struct Fetcher {
    pub client: Request,
    pub sources: Vec<String>,
    pub limit: usize,
    pub delay: Duration,
    pub sel_title: Selector,
}

impl Fetcher {
    pub fn new(client: Request, sources: Vec<String>) -> Self {
        Self {
            client,
            sources,
            limit: config::LIMIT,
            delay: config::DELAY,
            sel_title: default_selector(),
        }
    }

    async fn fetch_source(&self, url: &str) -> reqwest::Result<Vec<CompactString>> {
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(extract_titles(&body, &self.sel_title, self.limit))
    }
}

impl Search for Fetcher {
    async fn search(&self, term: &str) -> Vec<CompactString> {
        let query = util::query_segment(term);
        let mut results = Vec::new();

        for (idx, source) in self.sources.iter().enumerate() {
            if idx != 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            let url = format!("{source}{query}");
            match self.fetch_source(&url).await {
                Ok(mut titles) => {
                    tracing::debug!(target: "fetch", "{url}: {} titles", titles.len());
                    results.append(&mut titles);
                }
                Err(e) => {
                    tracing::warn!(target: "fetch", "\x1b[33m{url} skipped: {e}\x1b[0m");
                }
            }
        }

        results
    }
}

#[allow(clippy::unwrap_used)]
fn default_selector() -> Selector {
    Selector::parse(config::SELECTOR).unwrap()
}

pub fn parse_selector(css: &str) -> anyhow::Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow::anyhow!("bad selector {css:?}: {e:?}"))
}

/// Pulls at most `limit` titles out of a result page.
///
/// Markup that does not match yields nothing rather than an error.
pub fn extract_titles(body: &str, sel_title: &Selector, limit: usize) -> Vec<CompactString> {
    let html = Html::parse_document(body);

    html.select(sel_title)
        .take(limit)
        .filter_map(|dt| util::trim_title(&dt.text().collect::<String>()))
        .collect()
}
