//! Fetched-document extraction
//!
//! Helpers for pulling the pieces the engine needs out of server-rendered
//! markup: the named region to splice, the document title, and per-item
//! metadata snapshots used to build summarization requests. Extraction is
//! tolerant by construction; anything missing degrades to a fallback value
//! rather than an error.

use crate::markup::strip_read_more_suffix;
use scraper::{ElementRef, Html, Selector};

/// Placeholder meaning "no source text available for this item".
pub const SENTINEL_ABSTRACT: &str = "No abstract available for this paper.";

/// Rendered marker for items whose stored summary is absent server-side.
const UNAVAILABLE_SUMMARY: &str = "Summary not available.";

/// Title assigned to items without a usable heading link.
const UNKNOWN_TITLE: &str = "Unknown Title";

/// A parsed server response document.
///
/// Parsing happens once; region and title lookups borrow the parsed tree.
/// The value is created and consumed between suspension points and never
/// held across an await.
pub struct FetchedDocument {
    html: Html,
}

impl FetchedDocument {
    /// Parses a response body.
    #[must_use]
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    /// Inner markup of the element with the given id, if present.
    #[must_use]
    pub fn region_inner(&self, region_id: &str) -> Option<String> {
        let selector = Selector::parse(&format!("#{region_id}")).ok()?;
        self.html
            .select(&selector)
            .next()
            .map(|element| element.inner_html())
    }

    /// Text of the document title element, if the document carries one.
    #[must_use]
    pub fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        self.html
            .select(&selector)
            .next()
            .map(|element| element.text().collect::<String>())
    }
}

/// Metadata snapshot of one visible result item, captured at the moment a
/// summarization action triggers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperSnapshot {
    /// Identifier derived from the item's source link.
    pub id: String,
    /// Item heading text.
    pub title: String,
    /// Abstract text, or [`SENTINEL_ABSTRACT`] when none is available.
    pub abstract_text: String,
    /// Source document address, `#` when the item has none.
    pub pdf_link: String,
}

impl PaperSnapshot {
    /// Whether the snapshot carries real source text rather than the
    /// sentinel placeholder.
    #[must_use]
    pub fn has_real_abstract(&self) -> bool {
        self.abstract_text != SENTINEL_ABSTRACT
    }
}

/// Collects snapshots of the first `limit` result items in region markup.
///
/// The full abstract slot is preferred over the truncated one; the
/// truncated text loses its trailing "Read more" label; items with neither
/// slot populated carry the sentinel abstract and are later excluded from
/// summarization requests.
#[must_use]
pub fn collect_snapshots(region_markup: &str, limit: usize) -> Vec<PaperSnapshot> {
    let fragment = Html::parse_fragment(region_markup);
    let Ok(item_selector) = Selector::parse(".paper-item") else {
        return Vec::new();
    };

    fragment
        .select(&item_selector)
        .take(limit)
        .enumerate()
        .map(|(index, item)| snapshot_item(item, index))
        .collect()
}

fn snapshot_item(item: ElementRef<'_>, index: usize) -> PaperSnapshot {
    let title_link = Selector::parse("h3 a")
        .ok()
        .and_then(|selector| item.select(&selector).next());

    let title = title_link
        .map(|link| link.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

    let href = title_link.and_then(|link| link.value().attr("href"));
    let id = match href {
        Some(href) if !href.is_empty() => id_from_href(href, index),
        _ => format!("unknown_id_{index}"),
    };
    let pdf_link = href.filter(|h| !h.is_empty()).unwrap_or("#").to_string();

    let abstract_text = abstract_from_item(item);

    PaperSnapshot {
        id,
        title,
        abstract_text,
        pdf_link,
    }
}

/// Last path segment of a source link, used as the paper identifier.
fn id_from_href(href: &str, index: usize) -> String {
    let path = href
        .split(|c| c == '?' || c == '#')
        .next()
        .unwrap_or(href);
    match path.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => segment.to_string(),
        _ => format!("unknown_id_{index}"),
    }
}

fn abstract_from_item(item: ElementRef<'_>) -> String {
    if let Some(text) = slot_text(item, ".paper-summary-full .summary-content") {
        return text;
    }
    if let Some(text) = slot_text(item, ".paper-summary-short .summary-content") {
        return strip_read_more_suffix(&text);
    }
    SENTINEL_ABSTRACT.to_string()
}

/// Trimmed text of an abstract slot, filtered of empty and unavailable
/// placeholders.
fn slot_text(item: ElementRef<'_>, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    let text = item
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())?;
    if text.is_empty() || text == UNAVAILABLE_SUMMARY {
        None
    } else {
        Some(text)
    }
}

/// Addresses of pagination links inside region markup.
#[must_use]
pub fn collect_page_links(region_markup: &str) -> Vec<String> {
    let fragment = Html::parse_fragment(region_markup);
    let Ok(selector) = Selector::parse(".pagination-nav a.page-link") else {
        return Vec::new();
    };
    fragment
        .select(&selector)
        .filter_map(|link| link.value().attr("href"))
        .map(str::to_string)
        .collect()
}

/// Metadata carried by a rendered single-paper summary link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryLinkData {
    /// `data-paper-id` attribute.
    pub id: Option<String>,
    /// `data-paper-title` attribute.
    pub title: Option<String>,
    /// `data-paper-abstract` attribute.
    pub abstract_text: Option<String>,
    /// `data-paper-pdf-link` attribute.
    pub pdf_link: Option<String>,
}

/// Collects the metadata of every single-paper summary link in markup.
#[must_use]
pub fn collect_summary_links(markup: &str) -> Vec<SummaryLinkData> {
    let fragment = Html::parse_fragment(markup);
    let Ok(selector) = Selector::parse("a.single-paper-summary-link") else {
        return Vec::new();
    };
    fragment
        .select(&selector)
        .map(|link| {
            let attr = |name: &str| link.value().attr(name).map(str::to_string);
            SummaryLinkData {
                id: attr("data-paper-id"),
                title: attr("data-paper-title"),
                abstract_text: attr("data-paper-abstract"),
                pdf_link: attr("data-paper-pdf-link"),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RESULTS_PAGE: &str = r#"
        <html><head><title>Search Results for "ml"</title></head><body>
        <div id="search-content-area">
          <div id="search-results-block">
            <div class="paper-item">
              <h3><a href="https://arxiv.org/abs/2401.001">First Paper</a></h3>
              <div class="paper-summary-container">
                <div class="paper-summary-full"><span class="summary-content">Full abstract text.</span></div>
              </div>
            </div>
            <div class="paper-item">
              <h3><a href="https://arxiv.org/abs/2401.002">Second Paper</a></h3>
              <div class="paper-summary-container">
                <div class="paper-summary-short"><span class="summary-content">Short text... Read more</span></div>
              </div>
            </div>
            <div class="paper-item">
              <h3><a href="https://arxiv.org/abs/2401.003">Third Paper</a></h3>
              <div class="paper-summary-container">
                <div class="paper-summary-full"><span class="summary-content">Summary not available.</span></div>
              </div>
            </div>
            <div class="pagination-nav">
              <a class="page-link" href="/search?query=ml&amp;page=2">2</a>
            </div>
          </div>
        </div>
        </body></html>"#;

    #[test]
    fn region_and_title_extraction() {
        let doc = FetchedDocument::parse(RESULTS_PAGE);
        let inner = doc.region_inner("search-results-block").unwrap();
        assert!(inner.contains("First Paper"));
        assert_eq!(doc.title().unwrap(), r#"Search Results for "ml""#);
        assert!(doc.region_inner("absent-region").is_none());
    }

    #[test]
    fn snapshots_prefer_full_and_clean_short_abstracts() {
        let doc = FetchedDocument::parse(RESULTS_PAGE);
        let region = doc.region_inner("search-results-block").unwrap();
        let snapshots = collect_snapshots(&region, 5);
        assert_eq!(snapshots.len(), 3);

        assert_eq!(snapshots[0].id, "2401.001");
        assert_eq!(snapshots[0].title, "First Paper");
        assert_eq!(snapshots[0].abstract_text, "Full abstract text.");
        assert!(snapshots[0].has_real_abstract());

        assert_eq!(snapshots[1].abstract_text, "Short text...");

        assert_eq!(snapshots[2].abstract_text, SENTINEL_ABSTRACT);
        assert!(!snapshots[2].has_real_abstract());
    }

    #[test]
    fn snapshot_limit_is_respected() {
        let doc = FetchedDocument::parse(RESULTS_PAGE);
        let region = doc.region_inner("search-results-block").unwrap();
        assert_eq!(collect_snapshots(&region, 2).len(), 2);
    }

    #[test]
    fn item_without_link_gets_fallbacks() {
        let markup = r#"<div class="paper-item"><h3>No link</h3></div>"#;
        let snapshots = collect_snapshots(markup, 5);
        assert_eq!(snapshots[0].id, "unknown_id_0");
        assert_eq!(snapshots[0].title, "Unknown Title");
        assert_eq!(snapshots[0].pdf_link, "#");
        assert_eq!(snapshots[0].abstract_text, SENTINEL_ABSTRACT);
    }

    #[test]
    fn page_links_are_collected() {
        let doc = FetchedDocument::parse(RESULTS_PAGE);
        let region = doc.region_inner("search-results-block").unwrap();
        assert_eq!(collect_page_links(&region), vec!["/search?query=ml&page=2"]);
    }

    #[test]
    fn summary_link_metadata_is_collected() {
        let markup = concat!(
            r##"<h5><a href="#" class="single-paper-summary-link" data-paper-id="1" "##,
            r#"data-paper-title="T" data-paper-abstract="A" data-paper-pdf-link="/pdf/1">T</a></h5>"#
        );
        let links = collect_summary_links(markup);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].id.as_deref(), Some("1"));
        assert_eq!(links[0].abstract_text.as_deref(), Some("A"));
    }
}
