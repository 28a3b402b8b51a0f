// src/pipeline/orchestrator.rs

//! Crawl orchestrator.
//!
//! Runs every `(outlet, keyword)` pair concurrently and returns one
//! [`CrawlResult`] per pair, in outlet-major order. A pair that cannot be
//! set up or whose task fails still yields a result carrying the error.

use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::fetch::{BrowserLauncher, ChromiumLauncher, FetchKind, PageRenderer};
use crate::models::{CrawlResult, Settings};
use crate::pipeline::OutletRegistry;
use crate::utils::http::create_async_client;

/// Owns the shared clients of a run and schedules the crawl tasks.
#[derive(Clone)]
pub struct CrawlOrchestrator {
    settings: Arc<Settings>,
    registry: Arc<OutletRegistry>,
    launcher: Arc<dyn BrowserLauncher>,
}

impl CrawlOrchestrator {
    /// Orchestrator over the standard outlets, launching a local Chromium
    /// when needed.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Arc::new(settings),
            registry: Arc::new(OutletRegistry::standard()),
            launcher: Arc::new(ChromiumLauncher),
        }
    }

    pub fn with_registry(mut self, registry: OutletRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    pub fn with_launcher(mut self, launcher: impl BrowserLauncher + 'static) -> Self {
        self.launcher = Arc::new(launcher);
        self
    }

    /// Crawl each of `keywords` on each of `outlets` (all registered outlets
    /// when `None` or empty).
    ///
    /// Only failing to build the HTTP client is an error; everything else is
    /// reported inside the returned results.
    pub async fn run(
        &self,
        keywords: &[String],
        outlets: Option<&[String]>,
    ) -> Result<Vec<CrawlResult>> {
        let targets: Vec<String> = match outlets {
            Some(outlets) if !outlets.is_empty() => outlets.to_vec(),
            _ => self
                .registry
                .list_outlets()
                .into_iter()
                .map(String::from)
                .collect(),
        };

        log::info!(
            "Crawling {} outlet(s) x {} keyword(s): {}",
            targets.len(),
            keywords.len(),
            targets.join(", ")
        );

        let client = create_async_client(&self.settings.crawler)?;
        let (browser, launch_error) = if self.registry.any_requires_dynamic_fetch(&targets) {
            match self.launch_browser().await {
                Ok(browser) => (Some(browser), None),
                Err(e) => (None, Some(Arc::<str>::from(e.to_string()))),
            }
        } else {
            (None, None)
        };

        let results = self
            .crawl_all(&targets, keywords, client, browser.clone(), launch_error)
            .await;

        if let Some(browser) = browser {
            if let Err(e) = browser.shutdown().await {
                log::warn!("Browser shutdown failed: {e}");
            }
        }

        let articles: usize = results.iter().map(|r| r.articles.len()).sum();
        let errors: usize = results.iter().map(|r| r.errors.len()).sum();
        log::info!(
            "Crawl finished: {} results, {articles} articles, {errors} errors",
            results.len()
        );

        Ok(results)
    }

    async fn launch_browser(&self) -> Result<Arc<dyn PageRenderer>> {
        self.launcher
            .launch(&self.settings)
            .await
            .inspect_err(|e| {
                log::error!("Browser session unavailable, dynamic outlets will fail: {e}")
            })
    }

    async fn crawl_all(
        &self,
        targets: &[String],
        keywords: &[String],
        client: reqwest::Client,
        browser: Option<Arc<dyn PageRenderer>>,
        launch_error: Option<Arc<str>>,
    ) -> Vec<CrawlResult> {
        let mut tasks = Vec::with_capacity(targets.len() * keywords.len());

        for outlet in targets {
            for keyword in keywords {
                let registry = Arc::clone(&self.registry);
                let settings = Arc::clone(&self.settings);
                let client = client.clone();
                let browser = browser.clone();
                let launch_error = launch_error.clone();
                let task_outlet = outlet.clone();
                let task_keyword = keyword.clone();

                let handle = tokio::spawn(async move {
                    let crawler = registry
                        .create_crawler(&task_outlet, &settings, &client, browser.as_ref())
                        .map_err(|e| match (e, launch_error) {
                            (AppError::Configuration(message), Some(cause))
                                if registry
                                    .get(&task_outlet)
                                    .is_some_and(|d| d.kind() == FetchKind::Dynamic) =>
                            {
                                AppError::configuration(format!("{message} ({cause})"))
                            }
                            (e, _) => e,
                        })?;
                    Ok::<_, AppError>(crawler.crawl(&task_keyword).await)
                });
                tasks.push((outlet, keyword, handle));
            }
        }

        // Await in launch order so results keep the (outlet, keyword) order.
        let mut results = Vec::with_capacity(tasks.len());
        for (outlet, keyword, handle) in tasks {
            let error = match handle.await {
                Ok(Ok(result)) => {
                    results.push(result);
                    continue;
                }
                Ok(Err(e)) => e,
                Err(e) => AppError::Task(e.to_string()),
            };
            log::error!("[{outlet}] '{keyword}' failed: {error}");
            results.push(CrawlResult::failed(outlet, keyword, error));
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::error::BoxError;
    use crate::fetch::FetchKind;
    use crate::models::{Article, SearchResult};
    use crate::outlets::OutletAdapter;
    use crate::pipeline::OutletDescriptor;

    /// Search pages list `title|url` per line; article pages are their body.
    struct LineAdapter {
        channel: &'static str,
        base: String,
    }

    impl OutletAdapter for LineAdapter {
        fn channel_name(&self) -> &'static str {
            self.channel
        }

        fn build_search_url(&self, keyword: &str, page: u32) -> String {
            format!("{}/search?q={keyword}&page={page}", self.base)
        }

        fn parse_search_results(&self, html: &str) -> Result<Vec<SearchResult>> {
            Ok(html
                .lines()
                .filter_map(|line| line.split_once('|'))
                .map(|(title, url)| SearchResult::new(title, url))
                .collect())
        }

        fn parse_article(
            &self,
            html: &str,
            result: &SearchResult,
            keyword: &str,
        ) -> Result<Article> {
            Ok(Article::new(result, html, self.channel, keyword))
        }
    }

    fn line_outlet(channel: &'static str, kind: FetchKind, base: &str) -> OutletDescriptor {
        let base = base.to_string();
        OutletDescriptor::new(channel, kind, move || {
            Box::new(LineAdapter {
                channel,
                base: base.clone(),
            }) as Box<dyn OutletAdapter>
        })
    }

    /// Serves `story|{base}/article` for search pages, `rendered` otherwise.
    #[derive(Default)]
    struct FakeRenderer {
        fail_search: bool,
        shutdowns: AtomicUsize,
    }

    #[async_trait]
    impl PageRenderer for FakeRenderer {
        async fn render(
            &self,
            url: &str,
            _wait_for: Option<&str>,
        ) -> std::result::Result<String, BoxError> {
            if url.contains("/search") && self.fail_search {
                Err("net::ERR_CONNECTION_RESET".into())
            } else if url.contains("/search") {
                Ok("story|https://beta.test/article".to_string())
            } else {
                Ok("rendered".to_string())
            }
        }

        async fn shutdown(&self) -> Result<()> {
            self.shutdowns.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[derive(Default, Clone)]
    struct FakeLauncher {
        renderer: Option<Arc<FakeRenderer>>,
        launches: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl BrowserLauncher for FakeLauncher {
        async fn launch(&self, _settings: &Settings) -> Result<Arc<dyn PageRenderer>> {
            self.launches.fetch_add(1, Ordering::SeqCst);
            match &self.renderer {
                Some(renderer) => Ok(renderer.clone() as Arc<dyn PageRenderer>),
                None => Err(AppError::Browser("chromium not found".into())),
            }
        }
    }

    fn test_settings() -> Settings {
        let mut settings = Settings::default();
        settings.crawler.max_pages = 1;
        settings.crawler.request_delay_secs = 0.0;
        settings.retry.max_retries = 0;
        settings
    }

    async fn static_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(format!("story|{}/article", server.uri())),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/article"))
            .respond_with(ResponseTemplate::new(200).set_body_string("static body"))
            .mount(&server)
            .await;
        server
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn pairs(results: &[CrawlResult]) -> Vec<(&str, &str)> {
        results
            .iter()
            .map(|r| (r.channel.as_str(), r.keyword.as_str()))
            .collect()
    }

    #[tokio::test]
    async fn test_missing_browser_degrades_dynamic_outlets() {
        let server = static_server().await;
        let registry = OutletRegistry::empty()
            .with_outlet(line_outlet("alpha", FetchKind::Static, &server.uri()))
            .with_outlet(line_outlet("beta", FetchKind::Dynamic, "https://beta.test"));
        let launcher = FakeLauncher::default();
        let orchestrator = CrawlOrchestrator::new(test_settings())
            .with_registry(registry)
            .with_launcher(launcher.clone());

        let outlets = strings(&["alpha", "beta", "nope"]);
        let results = orchestrator
            .run(&strings(&["k1", "k2"]), Some(&outlets))
            .await
            .unwrap();

        assert_eq!(
            pairs(&results),
            [
                ("alpha", "k1"),
                ("alpha", "k2"),
                ("beta", "k1"),
                ("beta", "k2"),
                ("nope", "k1"),
                ("nope", "k2"),
            ]
        );
        assert_eq!(launcher.launches.load(Ordering::SeqCst), 1);

        for result in &results[..2] {
            assert!(result.is_clean());
            assert_eq!(result.articles.len(), 1);
            assert_eq!(result.articles[0].content, "static body");
            assert_eq!(result.articles[0].keyword, result.keyword);
        }
        for result in &results[2..4] {
            assert!(result.articles.is_empty());
            assert_eq!(result.errors.len(), 1);
            assert!(result.errors[0].contains("requires a browser session"));
            assert!(result.errors[0].contains("chromium not found"));
        }
        for result in &results[4..] {
            assert!(result.errors[0].contains("unknown outlet 'nope'"));
            assert!(!result.errors[0].contains("chromium not found"));
        }
    }

    /// Panics while building its first search URL.
    struct ExplodingAdapter;

    impl OutletAdapter for ExplodingAdapter {
        fn channel_name(&self) -> &'static str {
            "boom"
        }

        fn build_search_url(&self, _keyword: &str, _page: u32) -> String {
            panic!("adapter exploded")
        }

        fn parse_search_results(&self, _html: &str) -> Result<Vec<SearchResult>> {
            Ok(Vec::new())
        }

        fn parse_article(
            &self,
            html: &str,
            result: &SearchResult,
            keyword: &str,
        ) -> Result<Article> {
            Ok(Article::new(result, html, "boom", keyword))
        }
    }

    #[tokio::test]
    async fn test_panicking_task_keeps_its_position() {
        let server = static_server().await;
        let registry = OutletRegistry::empty()
            .with_outlet(line_outlet("alpha", FetchKind::Static, &server.uri()))
            .with_outlet(OutletDescriptor::new("boom", FetchKind::Static, || {
                Box::new(ExplodingAdapter) as Box<dyn OutletAdapter>
            }));
        let orchestrator = CrawlOrchestrator::new(test_settings())
            .with_registry(registry)
            .with_launcher(FakeLauncher::default());

        let outlets = strings(&["nope", "boom", "alpha"]);
        let results = orchestrator
            .run(&strings(&["a", "b"]), Some(&outlets))
            .await
            .unwrap();

        assert_eq!(
            pairs(&results),
            [
                ("nope", "a"),
                ("nope", "b"),
                ("boom", "a"),
                ("boom", "b"),
                ("alpha", "a"),
                ("alpha", "b"),
            ]
        );
        for result in &results[2..4] {
            assert!(result.articles.is_empty());
            assert_eq!(result.errors.len(), 1);
            assert!(result.errors[0].starts_with("task failed: "));
            assert!(result.errors[0].contains("adapter exploded"));
        }
        for result in &results[4..] {
            assert!(result.is_clean());
            assert_eq!(result.articles.len(), 1);
        }
    }

    #[tokio::test]
    async fn test_failed_dynamic_search_beside_static_outlet() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!(
                "first|{uri}/article/1\nsecond|{uri}/article/2",
                uri = server.uri()
            )))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/article/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("one"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/article/2"))
            .respond_with(ResponseTemplate::new(200).set_body_string("two"))
            .mount(&server)
            .await;

        let renderer = Arc::new(FakeRenderer {
            fail_search: true,
            ..Default::default()
        });
        let launcher = FakeLauncher {
            renderer: Some(renderer.clone()),
            ..Default::default()
        };
        let registry = OutletRegistry::empty()
            .with_outlet(line_outlet("A", FetchKind::Static, &server.uri()))
            .with_outlet(line_outlet("B", FetchKind::Dynamic, "https://b.test"));
        let orchestrator = CrawlOrchestrator::new(test_settings())
            .with_registry(registry)
            .with_launcher(launcher);

        let results = orchestrator.run(&strings(&["x"]), None).await.unwrap();

        assert_eq!(pairs(&results), [("A", "x"), ("B", "x")]);
        assert!(results[0].is_clean());
        let bodies: Vec<_> = results[0]
            .articles
            .iter()
            .map(|a| a.content.as_str())
            .collect();
        assert_eq!(bodies, ["one", "two"]);
        assert!(results[1].articles.is_empty());
        assert_eq!(results[1].errors.len(), 1);
        assert!(results[1].errors[0].starts_with("page 1 search failed: "));
        assert_eq!(renderer.shutdowns.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_outlet_keeps_its_position() {
        let server = static_server().await;
        let registry = OutletRegistry::empty()
            .with_outlet(line_outlet("alpha", FetchKind::Static, &server.uri()));
        let orchestrator = CrawlOrchestrator::new(test_settings())
            .with_registry(registry)
            .with_launcher(FakeLauncher::default());

        let outlets = strings(&["nope", "alpha"]);
        let results = orchestrator
            .run(&strings(&["k"]), Some(&outlets))
            .await
            .unwrap();

        assert_eq!(pairs(&results), [("nope", "k"), ("alpha", "k")]);
        assert!(results[0].errors[0].contains("unknown outlet 'nope'"));
        assert_eq!(results[1].articles.len(), 1);
    }

    #[tokio::test]
    async fn test_order_independent_of_completion() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("")
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "fast"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&server)
            .await;

        let registry = OutletRegistry::empty()
            .with_outlet(line_outlet("alpha", FetchKind::Static, &server.uri()));
        let orchestrator = CrawlOrchestrator::new(test_settings())
            .with_registry(registry)
            .with_launcher(FakeLauncher::default());

        let results = orchestrator
            .run(&strings(&["slow", "fast"]), None)
            .await
            .unwrap();

        assert_eq!(pairs(&results), [("alpha", "slow"), ("alpha", "fast")]);
        assert!(results.iter().all(CrawlResult::is_clean));
    }

    #[tokio::test]
    async fn test_browser_shared_and_shut_down() {
        let renderer = Arc::new(FakeRenderer::default());
        let launcher = FakeLauncher {
            renderer: Some(renderer.clone()),
            ..Default::default()
        };
        let registry = OutletRegistry::empty()
            .with_outlet(line_outlet("beta", FetchKind::Dynamic, "https://beta.test"))
            .with_outlet(line_outlet("gamma", FetchKind::Dynamic, "https://gamma.test"));
        let orchestrator = CrawlOrchestrator::new(test_settings())
            .with_registry(registry)
            .with_launcher(launcher.clone());

        let results = orchestrator.run(&strings(&["k"]), None).await.unwrap();

        assert_eq!(pairs(&results), [("beta", "k"), ("gamma", "k")]);
        assert!(results.iter().all(|r| r.articles.len() == 1));
        assert_eq!(results[1].articles[0].content, "rendered");
        assert_eq!(launcher.launches.load(Ordering::SeqCst), 1);
        assert_eq!(renderer.shutdowns.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_static_only_run_skips_browser() {
        let server = static_server().await;
        let registry = OutletRegistry::empty()
            .with_outlet(line_outlet("alpha", FetchKind::Static, &server.uri()))
            .with_outlet(line_outlet("beta", FetchKind::Dynamic, "https://beta.test"));
        let launcher = FakeLauncher::default();
        let orchestrator = CrawlOrchestrator::new(test_settings())
            .with_registry(registry)
            .with_launcher(launcher.clone());

        let outlets = strings(&["alpha"]);
        let results = orchestrator
            .run(&strings(&["k"]), Some(&outlets))
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(launcher.launches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_keywords_yields_no_results() {
        let orchestrator = CrawlOrchestrator::new(test_settings())
            .with_registry(OutletRegistry::empty())
            .with_launcher(FakeLauncher::default());
        let results = orchestrator.run(&[], None).await.unwrap();
        assert!(results.is_empty());
    }
}
