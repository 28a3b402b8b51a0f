// src/pipeline/registry.rs

//! Outlet registry.
//!
//! Maps outlet ids to an adapter constructor and the fetch variant the outlet
//! needs, and assembles ready-to-run [`OutletCrawler`]s from the run's shared
//! clients. Registration order is the order outlets are listed and crawled.

use std::fmt;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::fetch::{DirectFetch, FetchKind, FetchStrategy, PageRenderer, RenderedFetch};
use crate::models::Settings;
use crate::outlets::{
    ChosunAdapter, HaniAdapter, MaeililboAdapter, MkAdapter, NaverNewsAdapter, OutletAdapter,
    chosun, hani, maeililbo, mk, naver_news,
};
use crate::pipeline::RetryPolicy;
use crate::services::OutletCrawler;

type AdapterConstructor = Arc<dyn Fn() -> Box<dyn OutletAdapter> + Send + Sync>;

/// One registered outlet.
#[derive(Clone)]
pub struct OutletDescriptor {
    id: String,
    kind: FetchKind,
    constructor: AdapterConstructor,
}

impl OutletDescriptor {
    pub fn new<F>(id: impl Into<String>, kind: FetchKind, constructor: F) -> Self
    where
        F: Fn() -> Box<dyn OutletAdapter> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            kind,
            constructor: Arc::new(constructor),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> FetchKind {
        self.kind
    }

    /// A fresh adapter instance.
    pub fn adapter(&self) -> Box<dyn OutletAdapter> {
        (self.constructor)()
    }
}

impl fmt::Debug for OutletDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutletDescriptor")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Ordered, read-only table of known outlets.
#[derive(Debug, Clone)]
pub struct OutletRegistry {
    outlets: Vec<OutletDescriptor>,
}

impl OutletRegistry {
    /// A registry with no outlets.
    pub fn empty() -> Self {
        Self {
            outlets: Vec::new(),
        }
    }

    /// The built-in Korean news outlets.
    pub fn standard() -> Self {
        Self::empty()
            .with_outlet(OutletDescriptor::new(
                mk::CHANNEL,
                FetchKind::Dynamic,
                boxed::<MkAdapter>,
            ))
            .with_outlet(OutletDescriptor::new(
                maeililbo::CHANNEL,
                FetchKind::Static,
                boxed::<MaeililboAdapter>,
            ))
            .with_outlet(OutletDescriptor::new(
                chosun::CHANNEL,
                FetchKind::Dynamic,
                boxed::<ChosunAdapter>,
            ))
            .with_outlet(OutletDescriptor::new(
                hani::CHANNEL,
                FetchKind::Dynamic,
                boxed::<HaniAdapter>,
            ))
            .with_outlet(OutletDescriptor::new(
                naver_news::CHANNEL,
                FetchKind::Static,
                boxed::<NaverNewsAdapter>,
            ))
    }

    /// Add an outlet, replacing any outlet registered under the same id.
    pub fn with_outlet(mut self, descriptor: OutletDescriptor) -> Self {
        match self.outlets.iter_mut().find(|d| d.id == descriptor.id) {
            Some(existing) => *existing = descriptor,
            None => self.outlets.push(descriptor),
        }
        self
    }

    /// Registered ids in registration order.
    pub fn list_outlets(&self) -> Vec<&str> {
        self.outlets.iter().map(OutletDescriptor::id).collect()
    }

    pub fn get(&self, id: &str) -> Option<&OutletDescriptor> {
        self.outlets.iter().find(|d| d.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Whether any of `ids` needs the browser. Unknown ids are ignored.
    pub fn any_requires_dynamic_fetch<S: AsRef<str>>(&self, ids: &[S]) -> bool {
        ids.iter()
            .filter_map(|id| self.get(id.as_ref()))
            .any(|d| d.kind == FetchKind::Dynamic)
    }

    /// Build a crawler for `id` bound to the matching shared client.
    ///
    /// Fails with a configuration error if `id` is unknown or the outlet
    /// needs a browser and `browser` is `None`.
    pub fn create_crawler(
        &self,
        id: &str,
        settings: &Settings,
        http_client: &reqwest::Client,
        browser: Option<&Arc<dyn PageRenderer>>,
    ) -> Result<OutletCrawler> {
        let descriptor = self.get(id).ok_or_else(|| {
            AppError::configuration(format!(
                "unknown outlet '{id}' (available: {})",
                self.list_outlets().join(", ")
            ))
        })?;

        let fetcher: Arc<dyn FetchStrategy> = match descriptor.kind {
            FetchKind::Static => Arc::new(DirectFetch::new(http_client.clone())),
            FetchKind::Dynamic => {
                let renderer = browser.ok_or_else(|| {
                    AppError::configuration(format!(
                        "outlet '{id}' requires a browser session but none is available"
                    ))
                })?;
                Arc::new(RenderedFetch::new(Arc::clone(renderer)))
            }
        };

        Ok(OutletCrawler::new(
            descriptor.adapter(),
            fetcher,
            settings.crawler.clone(),
            RetryPolicy::from_settings(&settings.retry),
        ))
    }
}

impl Default for OutletRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

fn boxed<A: OutletAdapter + Default + 'static>() -> Box<dyn OutletAdapter> {
    Box::new(A::default())
}
