//! Attraction search over DuckDuckGo's HTML endpoint
//!
//! The endpoint needs no key. Each organic result becomes an [`Attraction`];
//! sponsored entries are dropped and DuckDuckGo's redirect links are unwrapped
//! to the real target.

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

use super::error::ToolError;
use super::trait_def::{destination_arg, destination_schema, Tool};
use crate::config::TravelConfig;

const PROVIDER: &str = "DuckDuckGo";
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";
const SLOW_RESPONSE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attraction {
    pub title: String,
    pub snippet: String,
    pub link: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttractionResults {
    pub destination: String,
    pub query: String,
    pub results: Vec<Attraction>,
}

pub struct AttractionsTool {
    client: reqwest::Client,
    base_url: String,
    max_results: usize,
}

impl AttractionsTool {
    pub fn new(
        base_url: impl Into<String>,
        max_results: usize,
        timeout: Duration,
    ) -> Result<Self, ToolError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ToolError::provider(PROVIDER, format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_results,
        })
    }

    pub fn from_config(config: &TravelConfig) -> Result<Self, ToolError> {
        Self::new(
            config.search_base_url.clone(),
            config.max_results,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn query_for(destination: &str) -> String {
        format!("top attractions in {}", destination)
    }

    pub async fn search(&self, destination: &str) -> Result<AttractionResults, ToolError> {
        let query = Self::query_for(destination);
        let url = format!("{}/html/", self.base_url);
        info!(destination, query = %query, "Searching attractions");

        let start = Instant::now();
        let response = self
            .client
            .get(&url)
            .query(&[("q", query.as_str())])
            .send()
            .await
            .map_err(|e| ToolError::provider(PROVIDER, e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ToolError::provider(PROVIDER, e.to_string()))?;

        let elapsed = start.elapsed();
        debug!(
            destination,
            status = status.as_u16(),
            elapsed_ms = elapsed.as_millis() as u64,
            bytes = body.len(),
            "Search response received"
        );
        if elapsed > SLOW_RESPONSE {
            warn!(
                destination,
                elapsed_secs = elapsed.as_secs_f64(),
                "Slow response from search provider"
            );
        }

        if !status.is_success() {
            let snippet: String = body.chars().take(200).collect();
            return Err(ToolError::provider_status(PROVIDER, status.as_u16(), snippet));
        }

        let results = parse_results(&body, self.max_results)?;
        if results.is_empty() {
            warn!(destination, "Search returned no attractions");
        }

        Ok(AttractionResults {
            destination: destination.to_string(),
            query,
            results,
        })
    }
}

#[async_trait]
impl Tool for AttractionsTool {
    fn name(&self) -> &'static str {
        "search_attractions"
    }

    fn description(&self) -> &'static str {
        "Search the web (DuckDuckGo) for top attractions in a destination. \
         Returns an ordered list of results with title, snippet and link."
    }

    fn schema(&self) -> Value {
        destination_schema("Destination name, e.g. 'Paris' or 'Tokyo'")
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let destination = destination_arg(&arguments)?;
        let results = self.search(&destination).await?;

        serde_json::to_value(results)
            .map_err(|e| ToolError::provider(PROVIDER, format!("Failed to encode results: {}", e)))
    }
}

fn selector(css: &str) -> Result<Selector, ToolError> {
    Selector::parse(css)
        .map_err(|e| ToolError::provider(PROVIDER, format!("Invalid selector '{}': {}", css, e)))
}

/// Extracts organic results from a DuckDuckGo HTML page, in page order
pub fn parse_results(html: &str, max_results: usize) -> Result<Vec<Attraction>, ToolError> {
    let result_sel = selector("div.result")?;
    let title_sel = selector("a.result__a")?;
    let snippet_sel = selector(".result__snippet")?;

    let document = Html::parse_document(html);
    let mut attractions = Vec::new();

    for result in document.select(&result_sel) {
        if attractions.len() >= max_results {
            break;
        }
        if result.value().classes().any(|c| c == "result--ad") {
            continue;
        }

        let Some(anchor) = result.select(&title_sel).next() else {
            continue;
        };
        let title = collapse_text(anchor);
        if title.is_empty() {
            continue;
        }

        let link = anchor
            .value()
            .attr("href")
            .map(decode_redirect)
            .unwrap_or_default();
        let snippet = result
            .select(&snippet_sel)
            .next()
            .map(collapse_text)
            .unwrap_or_default();

        attractions.push(Attraction {
            title,
            snippet,
            link,
        });
    }

    Ok(attractions)
}

fn collapse_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Unwraps `//duckduckgo.com/l/?uddg=<target>` into `<target>`
pub fn decode_redirect(href: &str) -> String {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    };

    let Ok(parsed) = Url::parse(&absolute) else {
        return href.to_string();
    };

    let is_redirect = parsed
        .host_str()
        .is_some_and(|host| host.ends_with("duckduckgo.com"))
        && parsed.path().starts_with("/l/");

    if is_redirect {
        if let Some((_, target)) = parsed.query_pairs().find(|(key, _)| key == "uddg") {
            return target.into_owned();
        }
    }

    absolute
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn result_block(class: &str, title: &str, href: &str, snippet: &str) -> String {
        format!(
            r#"<div class="{class}">
                 <h2 class="result__title"><a class="result__a" href="{href}">{title}</a></h2>
                 <a class="result__snippet" href="{href}">{snippet}</a>
               </div>"#
        )
    }

    fn results_page() -> String {
        let blocks = [
            result_block(
                "result results_links result--ad",
                "Cheap Paris Tours",
                "https://ads.example.com/paris",
                "Sponsored",
            ),
            result_block(
                "result results_links results_links_deep web-result",
                "Eiffel Tower - Official Site",
                "//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.toureiffel.paris%2Fen&amp;rut=abc",
                "Iconic <b>iron</b> tower on the\n Champ de Mars.",
            ),
            result_block(
                "result results_links web-result",
                "Louvre Museum",
                "https://www.louvre.fr/en",
                "The world's most-visited museum.",
            ),
            result_block("result results_links web-result", "  ", "https://blank.example", "no title"),
            result_block(
                "result results_links web-result",
                "Musée d'Orsay",
                "https://www.musee-orsay.fr/en",
                "Impressionist masterpieces.",
            ),
        ];
        format!("<html><body><div id=\"links\">{}</div></body></html>", blocks.join("\n"))
    }

    #[test]
    fn test_parse_skips_ads_and_untitled_results() {
        let results = parse_results(&results_page(), 8).unwrap();

        let titles: Vec<_> = results.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Eiffel Tower - Official Site", "Louvre Museum", "Musée d'Orsay"]
        );
    }

    #[test]
    fn test_parse_decodes_redirect_and_collapses_snippet() {
        let results = parse_results(&results_page(), 8).unwrap();

        assert_eq!(results[0].link, "https://www.toureiffel.paris/en");
        assert_eq!(results[0].snippet, "Iconic iron tower on the Champ de Mars.");
        assert_eq!(results[1].link, "https://www.louvre.fr/en");
    }

    #[test]
    fn test_parse_respects_max_results() {
        let results = parse_results(&results_page(), 2).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[1].title, "Louvre Museum");
    }

    #[test]
    fn test_parse_empty_page() {
        let results = parse_results("<html><body>No results.</body></html>", 8).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_decode_redirect_passthrough() {
        assert_eq!(
            decode_redirect("https://example.com/page?a=1"),
            "https://example.com/page?a=1"
        );
        assert_eq!(decode_redirect("not a url"), "not a url");
        assert_eq!(
            decode_redirect("//duckduckgo.com/l/?uddg=https%3A%2F%2Fa.example%2F"),
            "https://a.example/"
        );
    }

    #[tokio::test]
    async fn test_search_sends_query_and_parses_page() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/html/")
            .match_query(Matcher::UrlEncoded(
                "q".into(),
                "top attractions in Paris".into(),
            ))
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(results_page())
            .create_async()
            .await;

        let tool = AttractionsTool::new(server.url(), 8, Duration::from_secs(5)).unwrap();
        let results = tool.search("Paris").await.unwrap();

        mock.assert_async().await;
        assert_eq!(results.destination, "Paris");
        assert_eq!(results.query, "top attractions in Paris");
        assert_eq!(results.results.len(), 3);
    }

    #[tokio::test]
    async fn test_search_empty_results_is_ok() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/html/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html><body><div class=\"no-results\">No results.</div></body></html>")
            .create_async()
            .await;

        let tool = AttractionsTool::new(server.url(), 8, Duration::from_secs(5)).unwrap();
        let value = tool
            .execute(json!({"destination": "Nowhere"}))
            .await
            .unwrap();

        assert_eq!(value["results"], json!([]));
    }

    #[tokio::test]
    async fn test_search_status_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/html/")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body("blocked")
            .create_async()
            .await;

        let tool = AttractionsTool::new(server.url(), 8, Duration::from_secs(5)).unwrap();
        let err = tool.search("Paris").await.unwrap_err();

        assert!(matches!(
            err,
            ToolError::Provider {
                status_code: Some(403),
                ..
            }
        ));
    }
}
