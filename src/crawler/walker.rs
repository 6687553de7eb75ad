//! Catalogue walker - hierarchical traversal and batch orchestration
//!
//! The walker descends root → manufacturer → category → model, optionally
//! hopping through model subsections, and collects one [`PartRow`] per part
//! link. Each manufacturer's rows form a batch that is normalized and loaded
//! before the next manufacturer is visited.

use crate::catalogue::{normalize_batch, PartRow};
use crate::config::{Config, FailurePolicy};
use crate::crawler::extract::{CatalogueMarkup, Container, Document, ModelListing, PartEntry};
use crate::crawler::{build_http_client, fetch_url, FetchResult};
use crate::output::{BatchOutcome, CrawlReport};
use crate::storage::{CatalogueStore, LoadSummary};
use crate::url::{catalogue_url, parse_base_url};
use crate::CatalogueError;
use chrono::Utc;
use reqwest::Client;
use std::time::Instant;
use url::Url;

/// Walks the catalogue and feeds manufacturer batches into storage
pub struct Harvester {
    client: Client,
    base_url: Url,
    markup: CatalogueMarkup,
    on_failure: FailurePolicy,
    only: Vec<String>,
}

impl Harvester {
    /// Creates a harvester from a validated configuration
    pub fn new(config: &Config) -> Result<Self, CatalogueError> {
        Ok(Self {
            client: build_http_client(&config.user_agent, &config.crawler)?,
            base_url: parse_base_url(&config.crawler.base_url)?,
            markup: CatalogueMarkup::from_config(&config.selectors)?,
            on_failure: config.crawler.on_failure,
            only: config.crawler.manufacturers.clone(),
        })
    }

    /// Runs the whole harvest
    ///
    /// A failure on the root page ends the run. A failure inside one
    /// manufacturer's subtree either abandons that manufacturer's batch and
    /// moves on, or ends the run, depending on the configured
    /// [`FailurePolicy`]. A batch is only written once its whole subtree has
    /// been harvested, so a manufacturer abandoned because of a fetch or
    /// markup failure leaves nothing behind. A storage failure part way
    /// through a load keeps the tables already appended unless the store
    /// writes batches atomically.
    pub async fn run(&self, store: &mut dyn CatalogueStore) -> Result<CrawlReport, CatalogueError> {
        let started_at = Utc::now();
        let start = Instant::now();

        let manufacturers = self.select_manufacturers(self.list_manufacturers().await?);
        tracing::info!("Harvesting {} manufacturers", manufacturers.len());

        let mut outcomes = Vec::with_capacity(manufacturers.len());

        for manufacturer in &manufacturers {
            tracing::info!("Harvest started for manufacturer {}", manufacturer);

            match self.process_manufacturer(manufacturer, store).await {
                Ok(summary) => {
                    tracing::info!(
                        "Loaded {}: {} parts, {} categories, {} models, {} part categories (elapsed {:?})",
                        manufacturer,
                        summary.facts,
                        summary.categories,
                        summary.models,
                        summary.part_categories,
                        start.elapsed()
                    );
                    outcomes.push(BatchOutcome::loaded(manufacturer, summary));
                }
                Err(e) => match self.on_failure {
                    FailurePolicy::AbortRun => {
                        tracing::error!("Harvest of {} failed, aborting run: {}", manufacturer, e);
                        return Err(e);
                    }
                    FailurePolicy::SkipManufacturer => {
                        tracing::error!("Harvest of {} failed, skipping: {}", manufacturer, e);
                        outcomes.push(BatchOutcome::failed(manufacturer, &e));
                    }
                },
            }
        }

        tracing::info!("Harvest completed in {:?}", start.elapsed());

        Ok(CrawlReport {
            started_at,
            finished_at: Utc::now(),
            outcomes,
        })
    }

    /// Manufacturer labels listed on the catalogue root
    pub async fn list_manufacturers(&self) -> Result<Vec<String>, CatalogueError> {
        let manufacturers = self.required_labels(&[], Container::Makes).await?;
        tracing::info!("Found {} manufacturers", manufacturers.len());
        Ok(manufacturers)
    }

    /// Harvests every part row below one manufacturer
    pub async fn harvest_manufacturer(
        &self,
        manufacturer: &str,
    ) -> Result<Vec<PartRow>, CatalogueError> {
        let categories = self
            .required_labels(&[manufacturer], Container::Categories)
            .await?;
        tracing::info!("{}: {} categories", manufacturer, categories.len());

        let mut rows = Vec::new();

        for category in &categories {
            let models = self
                .required_labels(&[manufacturer, category.as_str()], Container::Models)
                .await?;
            tracing::debug!("{}/{}: {} models", manufacturer, category, models.len());

            for model in &models {
                self.harvest_model(manufacturer, category, model, &mut rows)
                    .await?;
            }
        }

        tracing::info!("{}: {} parts harvested", manufacturer, rows.len());
        Ok(rows)
    }

    /// Crawl, normalize and load one manufacturer
    async fn process_manufacturer(
        &self,
        manufacturer: &str,
        store: &mut dyn CatalogueStore,
    ) -> Result<LoadSummary, CatalogueError> {
        let rows = self.harvest_manufacturer(manufacturer).await?;
        let batch = normalize_batch(rows)?;
        Ok(store.load_batch(&batch)?)
    }

    /// Harvests the parts of one model page, following subsections if present
    ///
    /// Rows are tagged with the model; subsection labels are only used to
    /// build URLs.
    async fn harvest_model(
        &self,
        manufacturer: &str,
        category: &str,
        model: &str,
        rows: &mut Vec<PartRow>,
    ) -> Result<(), CatalogueError> {
        let url = catalogue_url(&self.base_url, &[manufacturer, category, model])?;
        let listing = self.markup.model_listing(&self.fetch_document(&url).await?);

        match listing {
            ModelListing::Sections(sections) => {
                for section in &sections {
                    let url = catalogue_url(
                        &self.base_url,
                        &[manufacturer, category, model, section.as_str()],
                    )?;
                    let document = self.fetch_document(&url).await?;

                    match self.markup.parts(&document) {
                        Some(parts) => push_parts(rows, manufacturer, category, model, parts),
                        None => tracing::debug!("No '{}' container on {}", Container::Parts, url),
                    }
                }
            }
            ModelListing::Parts(parts) => push_parts(rows, manufacturer, category, model, parts),
            ModelListing::Empty => {
                tracing::debug!(
                    "No '{}' or '{}' container on {}",
                    Container::Sections,
                    Container::Parts,
                    url
                );
            }
        }

        Ok(())
    }

    /// Fetches the page at `segments` and extracts the labels of a container
    /// the page must have
    async fn required_labels(
        &self,
        segments: &[&str],
        container: Container,
    ) -> Result<Vec<String>, CatalogueError> {
        let url = if segments.is_empty() {
            self.base_url.clone()
        } else {
            catalogue_url(&self.base_url, segments)?
        };

        let document = self.fetch_document(&url).await?;
        self.markup
            .labels(&document, container)
            .ok_or_else(|| CatalogueError::MissingContainer {
                url: url.to_string(),
                container,
            })
    }

    /// Fetches and parses a page; any unsuccessful fetch is an error
    async fn fetch_document(&self, url: &Url) -> Result<Document, CatalogueError> {
        tracing::debug!("Fetching {}", url);

        match fetch_url(&self.client, url.as_str()).await {
            FetchResult::Success {
                final_url, body, ..
            } => {
                if final_url != url.as_str() {
                    tracing::debug!("{} redirected to {}", url, final_url);
                }
                Ok(Document::parse(&body))
            }
            failure => {
                let reason = failure
                    .failure_reason()
                    .unwrap_or_else(|| "unknown failure".to_string());
                tracing::warn!("Fetch failed for {}: {}", url, reason);
                Err(CatalogueError::Fetch {
                    url: url.to_string(),
                    reason,
                })
            }
        }
    }

    /// Applies the configured manufacturer allow-list, keeping root page order
    fn select_manufacturers(&self, manufacturers: Vec<String>) -> Vec<String> {
        if self.only.is_empty() {
            return manufacturers;
        }

        for wanted in &self.only {
            if !manufacturers.contains(wanted) {
                tracing::warn!("Manufacturer {} is not listed in the catalogue", wanted);
            }
        }

        manufacturers
            .into_iter()
            .filter(|m| self.only.contains(m))
            .collect()
    }
}

fn push_parts(
    rows: &mut Vec<PartRow>,
    manufacturer: &str,
    category: &str,
    model: &str,
    parts: Vec<PartEntry>,
) {
    rows.extend(parts.into_iter().map(|entry| PartRow {
        manufacturer: manufacturer.to_string(),
        category: category.to_string(),
        model: model.to_string(),
        part: entry.part,
        part_category: entry.part_category,
    }));
}
