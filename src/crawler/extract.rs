//! Catalogue markup adapter
//!
//! The catalogue marks each list of "next level" links with a container
//! element carrying a marker class. This module is the only place that knows
//! those markers; the walker asks for labels or part entries and gets an
//! explicit `Option` back when a container is missing.

use crate::config::{compile_selector, SelectorConfig};
use crate::ConfigError;
use scraper::{node::Node, ElementRef, Html, Selector};
use std::fmt;

/// A parsed catalogue page
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses an HTML body
    ///
    /// Parsing is lenient: malformed markup still yields a document, and
    /// missing structure shows up as missing containers.
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }
}

/// Marker containers of the catalogue markup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    /// Manufacturer links on the root page
    Makes,
    /// Category links on a manufacturer page
    Categories,
    /// Model links on a category page
    Models,
    /// Optional subsection links on a model page
    Sections,
    /// Part links on a model or subsection page
    Parts,
}

impl Container {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Makes => "all-makes",
            Self::Categories => "all-categories",
            Self::Models => "all-models",
            Self::Sections => "model-sections",
            Self::Parts => "all-parts",
        }
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A part link harvested from an "all-parts" container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartEntry {
    /// Leading text of the link
    pub part: String,
    /// Text of the nested label element, if any
    pub part_category: Option<String>,
}

/// What a model page leads to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelListing {
    /// The page is split into subsections, each listing its own parts
    Sections(Vec<String>),
    /// The page lists its parts directly
    Parts(Vec<PartEntry>),
    /// Neither subsections nor parts
    Empty,
}

/// Compiled selectors for the catalogue markup
#[derive(Debug, Clone)]
pub struct CatalogueMarkup {
    makes: Selector,
    categories: Selector,
    models: Selector,
    sections: Selector,
    parts: Selector,
    part_label: Selector,
    anchor: Selector,
}

impl CatalogueMarkup {
    pub fn from_config(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            makes: compile_selector("makes", &config.makes)?,
            categories: compile_selector("categories", &config.categories)?,
            models: compile_selector("models", &config.models)?,
            sections: compile_selector("sections", &config.sections)?,
            parts: compile_selector("parts", &config.parts)?,
            part_label: compile_selector("part-label", &config.part_label)?,
            anchor: compile_selector("anchor", "a")?,
        })
    }

    /// Trimmed link texts inside the first matching `container`
    ///
    /// Returns `None` when the page has no such container. Links with no text
    /// are skipped, since they cannot name a catalogue page.
    pub fn labels(&self, document: &Document, container: Container) -> Option<Vec<String>> {
        let element = self.container(document, container)?;

        let labels = element
            .select(&self.anchor)
            .filter_map(|anchor| {
                let label = anchor.text().collect::<String>().trim().to_string();
                if label.is_empty() {
                    tracing::debug!("Skipping empty link in '{}' container", container);
                    None
                } else {
                    Some(label)
                }
            })
            .collect();

        Some(labels)
    }

    /// Part entries inside the "all-parts" container, `None` if it is missing
    ///
    /// The part identifier is the text before the first child element of the
    /// link; the label element's text is the part category. Links without an
    /// identifier are skipped.
    pub fn parts(&self, document: &Document) -> Option<Vec<PartEntry>> {
        let element = self.container(document, Container::Parts)?;

        let entries = element
            .select(&self.anchor)
            .filter_map(|anchor| {
                let part = leading_text(anchor);
                if part.is_empty() {
                    tracing::warn!("Skipping part link without an identifier");
                    return None;
                }

                let part_category = anchor
                    .select(&self.part_label)
                    .next()
                    .map(|label| label.text().collect::<String>().trim().to_string())
                    .filter(|label| !label.is_empty());

                Some(PartEntry {
                    part,
                    part_category,
                })
            })
            .collect();

        Some(entries)
    }

    /// Classifies a model page: subsections take precedence over parts
    pub fn model_listing(&self, document: &Document) -> ModelListing {
        if let Some(sections) = self.labels(document, Container::Sections) {
            return ModelListing::Sections(sections);
        }

        match self.parts(document) {
            Some(parts) => ModelListing::Parts(parts),
            None => ModelListing::Empty,
        }
    }

    fn container<'a>(&self, document: &'a Document, container: Container) -> Option<ElementRef<'a>> {
        let selector = match container {
            Container::Makes => &self.makes,
            Container::Categories => &self.categories,
            Container::Models => &self.models,
            Container::Sections => &self.sections,
            Container::Parts => &self.parts,
        };
        document.html.select(selector).next()
    }
}

/// Text nodes of `element` up to its first child element, trimmed
fn leading_text(element: ElementRef<'_>) -> String {
    let mut text = String::new();
    for child in element.children() {
        match child.value() {
            Node::Text(t) => text.push_str(t),
            Node::Element(_) => break,
            _ => {}
        }
    }
    text.trim().to_string()
}
