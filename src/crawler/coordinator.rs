//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the breadth-first crawl loop, including:
//! - Seeding the frontier or resuming it from a checkpoint
//! - Dispatching capacity-bounded batches to a bounded worker pool
//! - Merging discovered links into the next level
//! - Emitting product records and checkpointing after every batch

use crate::config::Config;
use crate::crawler::classifier::is_product_page;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::{extract_fields, extract_links};
use crate::output::{CrawlStatistics, ProductRecord, RecordWriter};
use crate::state::{CrawlPhase, PageState};
use crate::storage::{open_state_store, StateStore};
use crate::url::SiteScope;
use crate::CrawlError;
use futures::stream::{self, StreamExt};
use std::collections::BTreeSet;
use std::path::Path;
use url::Url;

/// What a worker found on one page
#[derive(Debug, Clone)]
pub struct PageReport {
    /// The requested URL
    pub url: String,

    /// How the visit ended
    pub state: PageState,

    /// Present only for product pages with complete markup
    pub record: Option<ProductRecord>,

    /// On-site links found on the page
    pub links: BTreeSet<String>,
}

impl PageReport {
    fn fetch_failed(url: String) -> Self {
        Self {
            url,
            state: PageState::FetchFailed,
            record: None,
            links: BTreeSet::new(),
        }
    }
}

/// Visits a single page
///
/// Fetch (with retry), classify, extract the product fields when the page
/// is a product page, and extract links unconditionally. Workers only read
/// shared state; the report is merged by the coordinator.
pub async fn visit_page(
    fetcher: &Fetcher,
    scope: &SiteScope,
    product_suffix: &str,
    url: String,
) -> PageReport {
    let page = match fetcher.fetch_with_retry(&url).await {
        Some(page) => page,
        None => return PageReport::fetch_failed(url),
    };

    let is_product = match is_product_page(&url, &page.final_url, product_suffix) {
        Ok(is_product) => is_product,
        Err(e) => {
            tracing::error!("Cannot classify {}: {}", url, e);
            false
        }
    };

    let (state, record) = if is_product {
        match extract_fields(&page.html) {
            Ok(fields) => (
                PageState::Product,
                Some(ProductRecord {
                    product_name: fields.product_name,
                    page_title: fields.page_title,
                    url: url.clone(),
                }),
            ),
            Err(e) => {
                tracing::warn!("Couldn't find product fields for page {}: {}", url, e);
                (PageState::ExtractionFailed, None)
            }
        }
    } else {
        if page.final_url != url {
            tracing::debug!("{} was served from {} ({})", url, page.final_url, page.status);
        }
        (PageState::Page, None)
    };

    let links = extract_links(&page.html, scope);

    PageReport {
        url,
        state,
        record,
        links,
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    scope: SiteScope,
    fetcher: Fetcher,
    frontier: Frontier,
    seed: Url,
    max_depth: u32,
    writer: RecordWriter,
    store: Option<Box<dyn StateStore + Send>>,
    stats: CrawlStatistics,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `seed` - Absolute URL the crawl starts from
    /// * `max_depth` - Deepest level visited; the seed is level 0
    /// * `writer` - Destination for product records
    ///
    /// # Errors
    ///
    /// `CrawlError::Config` if the seed is not on the configured site, or
    /// `CrawlError::Reqwest` if the HTTP client cannot be built.
    pub fn new(
        config: Config,
        seed: Url,
        max_depth: u32,
        writer: RecordWriter,
    ) -> Result<Self, CrawlError> {
        let scope = SiteScope::new(&config.site.base_url)?;
        let seed = scope.resolve_seed(seed.as_str())?;
        let fetcher = Fetcher::from_config(&config)?;

        Ok(Self {
            config,
            scope,
            fetcher,
            frontier: Frontier::default(),
            seed,
            max_depth,
            writer,
            store: None,
            stats: CrawlStatistics::new(),
        })
    }

    /// Enables checkpointing to (and resuming from) the given store
    pub fn with_state_store(mut self, store: Box<dyn StateStore + Send>) -> Self {
        self.store = Some(store);
        self
    }

    /// Runs the crawl to completion
    ///
    /// Page-level failures never end the crawl; only checkpoint or output
    /// I/O errors do.
    pub async fn run(&mut self) -> Result<CrawlStatistics, CrawlError> {
        let mut phase = CrawlPhase::Seeding;
        let mut batch = Vec::new();

        while !phase.is_done() {
            tracing::trace!("Crawl phase: {}", phase);

            phase = match phase {
                CrawlPhase::Seeding => {
                    self.seed_frontier()?;
                    CrawlPhase::LevelActive
                }

                CrawlPhase::LevelActive => {
                    if self.frontier.depth() > self.max_depth {
                        tracing::info!("Maximum depth {} reached", self.max_depth);
                        CrawlPhase::Done
                    } else {
                        batch = self.frontier.next_batch(self.config.crawler.batch_capacity);
                        if batch.is_empty() {
                            tracing::info!("No more links to visit.");
                            CrawlPhase::Done
                        } else {
                            CrawlPhase::LevelDraining
                        }
                    }
                }

                CrawlPhase::LevelDraining => {
                    self.drain_batch(std::mem::take(&mut batch)).await?;

                    if !self.frontier.has_pending() {
                        self.frontier.advance_level();
                        self.stats.levels_completed += 1;
                        tracing::info!(
                            "Advancing to depth {} with {} urls",
                            self.frontier.depth(),
                            self.frontier.horizon().len()
                        );
                    }

                    self.checkpoint()?;
                    CrawlPhase::LevelActive
                }

                CrawlPhase::Done => CrawlPhase::Done,
            };
        }

        self.checkpoint()?;
        self.writer.flush()?;

        tracing::info!(
            "Crawl finished at depth {}: {} urls visited in total",
            self.frontier.depth(),
            self.frontier.visited_len()
        );

        Ok(self.stats.clone())
    }

    /// Loads the checkpoint if one exists, otherwise seeds from the start URL
    fn seed_frontier(&mut self) -> Result<(), CrawlError> {
        let checkpoint = match &self.store {
            Some(store) => store.load()?,
            None => None,
        };

        self.frontier = match checkpoint {
            Some(checkpoint) => {
                tracing::info!(
                    "Resuming crawl at depth {}: {} visited, {} pending",
                    checkpoint.depth,
                    checkpoint.visited.len(),
                    checkpoint.horizon.len()
                );
                self.stats.resumed = true;
                Frontier::from_checkpoint(checkpoint)
            }
            None => {
                tracing::info!("Starting crawl from {}", self.seed);
                Frontier::seeded(self.seed.as_str())
            }
        };

        Ok(())
    }

    /// Visits one batch in parallel and merges the results
    async fn drain_batch(&mut self, batch: Vec<String>) -> Result<(), CrawlError> {
        tracing::info!(
            "Depth {}: visiting {} urls ({} more pending at this depth)",
            self.frontier.depth(),
            batch.len(),
            self.frontier.horizon().len()
        );

        let fetcher = &self.fetcher;
        let scope = &self.scope;
        let suffix = self.config.site.product_suffix.as_str();

        let reports: Vec<PageReport> = stream::iter(batch.iter().cloned())
            .map(|url| visit_page(fetcher, scope, suffix, url))
            .buffer_unordered(self.config.crawler.worker_count())
            .collect()
            .await;

        self.frontier.mark_visited(&batch);
        self.stats.batches += 1;

        for report in reports {
            self.stats.record_page(report.state);
            self.frontier.extend_next(report.links);

            if let Some(record) = report.record {
                tracing::info!(
                    "Product page found. Extracted {} ({})",
                    record.product_name,
                    record.url
                );
                self.writer.write(&record)?;
                self.stats.records_written += 1;
            }
        }

        self.writer.flush()?;
        Ok(())
    }

    /// Saves the frontier if checkpointing is enabled
    fn checkpoint(&mut self) -> Result<(), CrawlError> {
        if let Some(store) = self.store.as_mut() {
            store.save(&self.frontier.to_checkpoint())?;
            tracing::debug!(
                "Checkpoint saved at depth {} ({} visited, {} queued for the next depth)",
                self.frontier.depth(),
                self.frontier.visited_len(),
                self.frontier.next_horizon().count()
            );
        }
        Ok(())
    }
}

/// Runs a complete crawl
///
/// Opens the output and, when `resume` is given, the checkpoint store, then
/// drives a [`Coordinator`] to completion. Without a resume file the output
/// is truncated; with one it accumulates across runs. The seed is checked
/// before the output is touched, so an off-site seed leaves it intact.
///
/// # Example
///
/// ```no_run
/// use product_crawler::config::Config;
/// use product_crawler::crawler::run_crawl;
/// use product_crawler::url::SiteScope;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let seed = SiteScope::new(&config.site.base_url)?.resolve_seed("/")?;
/// let stats = run_crawl(config, seed, 1, Path::new("crawl_output.csv"), None).await?;
/// println!("{} records", stats.records_written);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: Config,
    seed: Url,
    max_depth: u32,
    output: &Path,
    resume: Option<&Path>,
) -> Result<CrawlStatistics, CrawlError> {
    SiteScope::new(&config.site.base_url)?.resolve_seed(seed.as_str())?;

    let writer = RecordWriter::create(output, resume.is_some())?;
    let mut coordinator = Coordinator::new(config, seed, max_depth, writer)?;

    if let Some(path) = resume {
        coordinator = coordinator.with_state_store(open_state_store(path)?);
    }

    coordinator.run().await
}
