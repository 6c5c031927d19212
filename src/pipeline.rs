//! # Crawl Pipeline
//!
//! Runs the fetch, extract and enrich phases over a site list. Every phase is
//! sequential with a fixed pause between consecutive network calls. A site
//! that cannot be fetched still yields a record so it can be stored with its
//! configured fields.

use std::time::Duration;

use rig::completion::CompletionModel;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::crawler::{Fetcher, SiteInfo, extract_site_info};
use crate::enrich::Enricher;
use crate::sites::SiteConfig;

/// Collected metadata for one site together with its configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlRecord {
    #[serde(flatten)]
    pub info: SiteInfo,
    pub config: SiteConfig,
}

/// Fetch and extract one site
///
/// Fetch failures produce a degraded record whose name is the slug.
#[instrument(skip(fetcher, site), fields(slug = %site.slug))]
pub async fn crawl_site(fetcher: &Fetcher, site: &SiteConfig) -> CrawlRecord {
    let info = match fetcher.fetch(&site.url).await {
        Ok(page) => {
            let info = extract_site_info(&site.url, &page.origin, &page.body);
            println!("✓ {} - {}", info.name, site.url);
            info
        }
        Err(e) => {
            debug!("Fetch failed: {:?}", e);
            println!("✗ {} - {} (using configured defaults)", site.url, e);
            SiteInfo::failed(&site.url, &site.slug, e.to_string())
        }
    };

    CrawlRecord {
        info,
        config: site.clone(),
    }
}

/// Crawl every site in order, pausing `delay` between fetches
pub async fn crawl_all(fetcher: &Fetcher, sites: &[SiteConfig], delay: Duration) -> Vec<CrawlRecord> {
    info!("Crawling {} sites", sites.len());
    let mut records = Vec::with_capacity(sites.len());

    for (i, site) in sites.iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(delay).await;
        }
        records.push(crawl_site(fetcher, site).await);
    }
    records
}

/// Attach generated summaries to successfully fetched records
///
/// Returns the number of summaries produced. Failed records are skipped and
/// an empty summary leaves `ai_description` unset.
pub async fn enrich_all<M: CompletionModel>(enricher: &Enricher<M>, records: &mut [CrawlRecord]) -> usize {
    if !enricher.is_enabled() {
        info!("Enrichment disabled");
        return 0;
    }

    let delay = enricher.config().rate_limit();
    let mut produced = 0;
    let mut first = true;

    for record in records.iter_mut().filter(|r| r.info.is_success()) {
        if !first {
            tokio::time::sleep(delay).await;
        }
        first = false;

        let summary = enricher.enrich(&record.info).await;
        if !summary.is_empty() {
            record.info.ai_description = Some(summary);
            produced += 1;
        }
    }

    info!("Generated {} summaries", produced);
    produced
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars).collect();
    format!("{}...", head)
}

fn or_none(text: &str) -> &str {
    if text.is_empty() { "(none)" } else { text }
}

/// Human-readable summary block for one record
pub fn format_summary(record: &CrawlRecord) -> String {
    let info = &record.info;
    let config = &record.config;
    let tags = config.tags.join(", ");

    let mut lines = vec![
        format!("[{}] {}", config.slug, info.name),
        format!("  URL:         {}", info.url),
        format!("  Title:       {}", or_none(&truncate(&info.title, 60))),
        format!("  Description: {}", or_none(&truncate(&info.description, 80))),
        format!("  Keywords:    {}", or_none(&truncate(&info.keywords, 60))),
        format!("  Icon:        {}", or_none(&info.icon)),
        format!(
            "  OG Image:    {}",
            or_none(info.og_image.as_deref().unwrap_or_default())
        ),
    ];
    if let Some(summary) = &info.ai_description {
        lines.push(format!("  AI Summary:  {}", summary));
    }
    lines.push(format!(
        "  Category:    {}  Level: {}  Tags: {}",
        config.category.as_deref().unwrap_or("-"),
        config.level,
        or_none(&tags)
    ));
    if let Some(error) = &info.error {
        lines.push(format!("  Error:       {}", error));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::memory::MemoryCatalog;
    use crate::crawler::CrawlerConfig;
    use crate::enrich::EnricherConfig;
    use crate::model::mock_model::MockCompletionModel;
    use crate::upsert::upsert_all;
    use mockito::Server;

    const PAGE: &str = r#"<html><head>
        <title>Code Box - Online IDE</title>
        <meta name="description" content="Write code in the browser">
        <meta name="keywords" content="ide, editor">
        <link rel="icon" href="/icon.png">
        <meta property="og:image" content="/og.png">
    </head><body></body></html>"#;

    fn fast_fetcher() -> Fetcher {
        let config = CrawlerConfig::builder().timeout_ms(2_000).rate_limit_ms(0).build();
        Fetcher::new(&config).unwrap()
    }

    fn fast_enricher(mock: &MockCompletionModel) -> Enricher<MockCompletionModel> {
        let config = EnricherConfig::builder().rate_limit_ms(0).build();
        Enricher::new(Some(mock.clone()), config)
    }

    #[tokio::test]
    async fn test_crawl_site_extracts_metadata() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(PAGE)
            .create_async()
            .await;

        let site = SiteConfig::new(format!("{}/", server.url()), "codebox");
        let record = crawl_site(&fast_fetcher(), &site).await;

        mock.assert_async().await;
        assert!(record.info.is_success());
        assert_eq!(record.info.name, "Code Box");
        assert_eq!(record.info.description, "Write code in the browser");
        assert_eq!(record.info.icon, format!("{}/icon.png", server.url()));
        assert_eq!(record.info.og_image, Some(format!("{}/og.png", server.url())));
        assert_eq!(record.config.slug, "codebox");
    }

    #[tokio::test]
    async fn test_unreachable_site_degrades_and_is_still_stored() {
        let site = SiteConfig::new("http://127.0.0.1:1/", "offline");
        let records = crawl_all(&fast_fetcher(), &[site], Duration::ZERO).await;

        let record = &records[0];
        assert_eq!(record.info.name, "offline");
        assert!(!record.info.error.as_deref().unwrap_or_default().is_empty());

        let store = MemoryCatalog::new();
        let report = upsert_all(&store, &records).await.unwrap();
        assert_eq!(report.created(), 1);
        let entry = &store.entries()["offline"];
        assert_eq!(entry.description, "");
        assert_eq!(entry.logo, None);
    }

    #[tokio::test]
    async fn test_fetch_timeout_degrades_and_is_still_stored() {
        // Accepts connections and never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });

        let config = CrawlerConfig::builder().timeout_ms(200).rate_limit_ms(0).build();
        let fetcher = Fetcher::new(&config).unwrap();
        let site = SiteConfig::new(format!("http://{}/", addr), "ex");
        let record = crawl_site(&fetcher, &site).await;
        server.abort();

        assert_eq!(record.info.name, "ex");
        assert!(!record.info.error.as_deref().unwrap_or_default().is_empty());

        let store = MemoryCatalog::new();
        let report = upsert_all(&store, &[record]).await.unwrap();
        assert_eq!(report.created(), 1);
        let entry = &store.entries()["ex"];
        assert_eq!(entry.name, "ex");
        assert_eq!(entry.description, "");
        assert_eq!(entry.logo, None);
    }

    #[tokio::test]
    async fn test_enrich_all_skips_failed_records() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/")
            .with_status(200)
            .with_body(PAGE)
            .create_async()
            .await;

        let sites = vec![
            SiteConfig::new(format!("{}/", server.url()), "codebox"),
            SiteConfig::new("http://127.0.0.1:1/", "offline"),
        ];
        let mut records = crawl_all(&fast_fetcher(), &sites, Duration::ZERO).await;

        let model = MockCompletionModel::new();
        model.set_text_response("An online IDE for quick experiments.").await;
        let produced = enrich_all(&fast_enricher(&model), &mut records).await;

        assert_eq!(produced, 1);
        assert_eq!(model.calls(), 1);
        assert_eq!(
            records[0].info.ai_description.as_deref(),
            Some("An online IDE for quick experiments.")
        );
        assert_eq!(records[1].info.ai_description, None);
    }

    #[tokio::test]
    async fn test_enrich_all_empty_summary_leaves_field_unset() {
        let model = MockCompletionModel::new();
        model.set_error("quota exceeded").await;
        let mut records = vec![CrawlRecord {
            info: SiteInfo {
                title: "Something".to_string(),
                ..SiteInfo::new("https://example.com")
            },
            config: SiteConfig::new("https://example.com", "ex"),
        }];

        assert_eq!(enrich_all(&fast_enricher(&model), &mut records).await, 0);
        assert_eq!(records[0].info.ai_description, None);
    }

    #[test]
    fn test_record_json_is_flattened() {
        let record = CrawlRecord {
            info: SiteInfo::failed("https://example.com", "ex", "timeout"),
            config: SiteConfig::new("https://example.com", "ex"),
        };
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["name"], "ex");
        assert_eq!(json["error"], "timeout");
        assert_eq!(json["config"]["slug"], "ex");
        assert_eq!(json["config"]["learnCost"], 3);
    }

    #[test]
    fn test_format_summary() {
        let mut record = CrawlRecord {
            info: SiteInfo {
                name: "Example".to_string(),
                title: "t".repeat(70),
                ..SiteInfo::new("https://example.com")
            },
            config: SiteConfig::new("https://example.com", "ex"),
        };

        let summary = format_summary(&record);
        assert!(summary.contains(&format!("{}...", "t".repeat(60))));
        assert!(summary.contains("Keywords:    (none)"));
        assert!(summary.contains("Category:    -"));
        assert!(summary.contains("Tags: (none)"));
        assert!(!summary.contains("Error:"));

        record.info.keywords = "ai, tools".to_string();
        record.info.error = Some("HTTP 503".to_string());
        let summary = format_summary(&record);
        assert!(summary.contains("Keywords:    ai, tools"));
        assert!(summary.contains("Error:       HTTP 503"));
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("短文本", 60), "短文本");
        assert_eq!(truncate("一二三四", 2), "一二...");
    }
}
