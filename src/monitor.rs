use chrono::Utc;
use futures::{future, stream, StreamExt};
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use url::Url;

use crate::config::AppConfig;
use crate::detector::ChangeDetector;
use crate::fetcher::{PageFetcher, DEFAULT_FETCH_TIMEOUT};
use crate::filter::SearchTerms;
use crate::formatter::NotificationFormatter;
use crate::models::{Candidate, Product, ProductDetails};
use crate::plugins::extractors::{FallbackListingExtractor, PageDetailExtractor};
use crate::plugins::traits::{DetailExtractor, ListingExtractor, NotificationMessage};
use crate::plugins::{DispatchReport, NotifierManager};
use crate::utils::error::Result;

/// Upper bound on the wait after a failed cycle, in seconds.
pub const MAX_ERROR_DELAY_SECS: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MonitorPhase {
    Idle,
    Fetching,
    Filtering,
    Detailing,
    Deciding,
    Notifying,
    Sleeping,
    Finished,
}

/// What one cycle saw and did.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub products: Vec<Product>,
    pub message: Option<NotificationMessage>,
    pub dispatch: Option<DispatchReport>,
}

impl CycleReport {
    pub fn notified(&self) -> bool {
        self.dispatch.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub cycles: u64,
    pub failed_cycles: u64,
    pub notifications: u64,
    pub interrupted: bool,
}

pub struct Monitor {
    config: AppConfig,
    fetcher: PageFetcher,
    listing: Box<dyn ListingExtractor>,
    detail: Box<dyn DetailExtractor>,
    terms: SearchTerms,
    detector: ChangeDetector,
    formatter: NotificationFormatter,
    dispatcher: NotifierManager,
    phase: watch::Sender<MonitorPhase>,
}

impl Monitor {
    pub fn new(config: AppConfig, dispatcher: NotifierManager, detector: ChangeDetector) -> Result<Self> {
        let listing = FallbackListingExtractor::from_patterns(&config.extraction)?;
        let detail = PageDetailExtractor::new(&config.extraction)?;
        Self::with_extractors(config, dispatcher, detector, Box::new(listing), Box::new(detail))
    }

    pub fn with_extractors(
        config: AppConfig,
        dispatcher: NotifierManager,
        detector: ChangeDetector,
        listing: Box<dyn ListingExtractor>,
        detail: Box<dyn DetailExtractor>,
    ) -> Result<Self> {
        let fetcher = PageFetcher::new(&config.user_agent, DEFAULT_FETCH_TIMEOUT)?;
        let terms = SearchTerms::new(&config.search_terms);
        let formatter = NotificationFormatter::new(config.alerts.clone());
        let (phase, _) = watch::channel(MonitorPhase::Idle);

        Ok(Self {
            config,
            fetcher,
            listing,
            detail,
            terms,
            detector,
            formatter,
            dispatcher,
            phase,
        })
    }

    pub fn phase(&self) -> MonitorPhase {
        *self.phase.borrow()
    }

    pub fn subscribe_phase(&self) -> watch::Receiver<MonitorPhase> {
        self.phase.subscribe()
    }

    fn enter(&self, phase: MonitorPhase) {
        tracing::trace!("Monitor phase: {:?}", phase);
        self.phase.send_replace(phase);
    }

    /// Fetch the listing, keep matching candidates and enrich them from their
    /// detail pages. Products without sizes or a purchase button are dropped.
    /// A listing that cannot be fetched or parsed yields no products.
    pub async fn check_availability(&self) -> Result<Vec<Product>> {
        let base_url = Url::parse(&self.config.target_url)?.join("/")?;

        self.enter(MonitorPhase::Fetching);
        tracing::info!("Checking {}", self.config.target_url);
        let html = match self.fetcher.fetch_page(&self.config.target_url).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Failed to fetch listing page: {}", e);
                return Ok(Vec::new());
            }
        };

        self.enter(MonitorPhase::Filtering);
        let candidates = match self.listing.extract(&html, &base_url) {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!("Failed to parse listing page: {}", e);
                return Ok(Vec::new());
            }
        };
        let total = candidates.len();
        let matched: Vec<Candidate> = candidates
            .into_iter()
            .filter(|c| self.terms.matches(&c.name))
            .collect();
        tracing::info!("Found {} product(s), {} matching search terms", total, matched.len());

        self.enter(MonitorPhase::Detailing);
        let products: Vec<Product> = stream::iter(matched)
            .map(|candidate| async move {
                let details = self.fetch_details(&candidate.link).await;
                Product::assemble(candidate, details)
            })
            .buffered(self.config.detail_concurrency.max(1))
            .filter(|product| future::ready(product.is_purchasable()))
            .collect()
            .await;

        for product in &products {
            tracing::info!("Available: {} ({}) sizes [{}]", product.name, product.price, product.sizes.join(", "));
        }
        Ok(products)
    }

    /// Detail page data for one link; every failure reads as an empty record.
    async fn fetch_details(&self, link: &str) -> ProductDetails {
        let html = match self.fetcher.fetch_page(link).await {
            Ok(html) => html,
            Err(e) => {
                tracing::debug!("No detail page for '{}': {}", link, e);
                return ProductDetails::default();
            }
        };

        self.detail.extract(&html).unwrap_or_else(|e| {
            tracing::debug!("{} could not read {}: {}", self.detail.name(), link, e);
            ProductDetails::default()
        })
    }

    pub async fn run_cycle(&self) -> Result<CycleReport> {
        let products = self.check_availability().await?;

        self.enter(MonitorPhase::Deciding);
        if !self.detector.should_notify(&products) {
            tracing::info!("No changes since last notification");
            return Ok(CycleReport {
                products,
                message: None,
                dispatch: None,
            });
        }

        // The status message goes out on every empty cycle; it is not deduplicated
        if products.is_empty() {
            tracing::info!("No matching products available, sending status message");
        }

        self.enter(MonitorPhase::Notifying);
        let message = self.formatter.format(&products, Utc::now());
        let dispatch = self.dispatcher.dispatch(&message).await;
        tracing::info!(
            "Notification dispatched: {} sent, {} failed, {} skipped",
            dispatch.sent(),
            dispatch.failed(),
            dispatch.skipped()
        );

        Ok(CycleReport {
            products,
            message: Some(message),
            dispatch: Some(dispatch),
        })
    }

    /// Run cycles until `shutdown` resolves, or once in single-run mode.
    pub async fn run<F>(&self, shutdown: F) -> RunSummary
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut summary = RunSummary::default();
        let interval = self.config.check_interval;

        tracing::info!(
            "Monitor started: interval {}s, {} notifier(s) [{}]",
            interval,
            self.dispatcher.notifier_types().len(),
            self.dispatcher.notifier_types().join(", ")
        );

        loop {
            let outcome = tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested during cycle");
                    summary.interrupted = true;
                    break;
                }
                outcome = self.run_cycle() => outcome,
            };

            summary.cycles += 1;
            let delay = match outcome {
                Ok(report) => {
                    if report.notified() {
                        summary.notifications += 1;
                    }
                    Duration::from_secs(interval)
                }
                Err(e) => {
                    tracing::error!("Cycle failed: {}", e);
                    summary.failed_cycles += 1;
                    Duration::from_secs(interval.min(MAX_ERROR_DELAY_SECS))
                }
            };

            if self.config.single_run {
                tracing::info!("Single run complete");
                break;
            }

            self.enter(MonitorPhase::Sleeping);
            tracing::info!("Next check in {}s", delay.as_secs());
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested");
                    summary.interrupted = true;
                    break;
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }

        self.enter(MonitorPhase::Finished);
        summary
    }
}
