//! Self-contained demo backend
//!
//! Serves a small fixed catalog through all three backend seams so the
//! binary can exercise every flow without a server. Responses are
//! deterministic, and rendered pages use the same document structure the
//! extraction layer reads from the real server.

use async_trait::async_trait;
use pvs_net::{
    ApiError, MailingBackend, MailingOutcome, PaperEntry, SearchTransport,
    SingleSummarizeRequest, SummaryBackend, TakeawayEntry, TestEmailRequest,
};
use url::form_urlencoded;
use url::Url;

/// Result items rendered per page.
pub const DEMO_PAGE_SIZE: usize = 3;

struct CatalogEntry {
    id: &'static str,
    title: &'static str,
    abstract_text: &'static str,
}

const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        id: "2403.01001",
        title: "Sparse Attention Patterns in Long-Context Language Models",
        abstract_text: "We study how attention concentrates on a small set of anchor tokens \
            as context length grows. Pruning heads by anchor coverage retains 98% of task \
            accuracy while reducing inference cost by a third.",
    },
    CatalogEntry {
        id: "2403.01542",
        title: "Surface Codes Under Correlated Noise: A Quantum Error Correction Study",
        abstract_text: "Quantum error correction thresholds are usually reported for \
            independent noise. We simulate surface codes under spatially correlated errors \
            and find the threshold degrades gracefully until correlation lengths exceed the \
            code distance.",
    },
    CatalogEntry {
        id: "2404.00317",
        title: "Diffusion Models as Implicit Texture Priors for Inverse Rendering",
        abstract_text: "Inverse rendering is ill-posed when surface texture and lighting are \
            jointly unknown. We show a frozen diffusion model supplies a usable texture prior, \
            halving albedo reconstruction error on synthetic scenes.",
    },
    CatalogEntry {
        id: "2404.02210",
        title: "Gradient Routing Stabilizes Mixture-of-Experts Training",
        abstract_text: "Expert collapse remains the dominant failure mode when scaling \
            mixture-of-experts language models. Routing gradients through a shared bottleneck \
            keeps expert utilization balanced without auxiliary losses.",
    },
    CatalogEntry {
        id: "2404.03877",
        title: "Benchmarking Retrieval Augmentation for Scientific Question Answering",
        abstract_text: "We release a benchmark of 12,000 questions grounded in research \
            papers. Retrieval augmentation helps most on questions requiring numeric claims, \
            and least on questions requiring cross-paper synthesis.",
    },
    CatalogEntry {
        id: "2405.00094",
        title: "Variational Bounds for Quantum Circuit Expressivity",
        abstract_text: "Expressivity of parameterized quantum circuits is commonly measured \
            empirically. We derive variational bounds that predict trainability plateaus from \
            circuit topology alone.",
    },
    CatalogEntry {
        id: "2405.01463",
        title: "Self-Distillation Narrows the Sim-to-Real Gap in Robotic Grasping",
        abstract_text: "Policies trained in simulation degrade on physical robots. Iterated \
            self-distillation on unlabeled real rollouts recovers most of the gap without \
            reward instrumentation.",
    },
];

fn lead_sentence(text: &str) -> &str {
    match text.find('.') {
        Some(index) => &text[..=index],
        None => text,
    }
}

fn encoded(query: &str) -> String {
    form_urlencoded::byte_serialize(query.as_bytes()).collect()
}

fn item_markup(paper: &CatalogEntry) -> String {
    format!(
        concat!(
            r#"<div class="paper-item"><h3><a href="https://arxiv.org/abs/{id}">{title}</a></h3>"#,
            r#"<div class="paper-summary-container">"#,
            r##"<div class="paper-summary-short"><span class="summary-content">{lead} Read more</span> <a href="#" class="read-more-link">Read more</a></div>"##,
            r##"<div class="paper-summary-full"><span class="summary-content">{full}</span> <a href="#" class="read-less-link">Read less</a></div>"##,
            "</div></div>"
        ),
        id = paper.id,
        title = paper.title,
        lead = lead_sentence(paper.abstract_text),
        full = paper.abstract_text,
    )
}

fn page_markup(query: &str, page: usize) -> String {
    let needle = query.to_lowercase();
    let matches: Vec<&CatalogEntry> = CATALOG
        .iter()
        .filter(|paper| {
            paper.title.to_lowercase().contains(&needle)
                || paper.abstract_text.to_lowercase().contains(&needle)
        })
        .collect();

    let total_pages = matches.len().div_ceil(DEMO_PAGE_SIZE).max(1);
    let start = (page - 1) * DEMO_PAGE_SIZE;
    let visible = matches.iter().skip(start).take(DEMO_PAGE_SIZE);

    let mut items = String::new();
    for paper in visible {
        items.push_str(&item_markup(paper));
    }
    if items.is_empty() {
        items = format!(r#"<p>No results found for "{query}".</p>"#);
    }

    let mut pagination = String::new();
    if total_pages > 1 {
        pagination.push_str(r#"<div class="pagination-nav">"#);
        for p in 1..=total_pages {
            if p == page {
                pagination.push_str(&format!(r#"<span class="current-page">{p}</span>"#));
            } else {
                pagination.push_str(&format!(
                    r#"<a class="page-link" href="/search?query={query}&amp;page={p}">{p}</a>"#,
                    query = encoded(query),
                ));
            }
        }
        pagination.push_str("</div>");
    }

    format!(
        concat!(
            r#"<html><head><title>Search Results for "{query}"</title></head><body>"#,
            r#"<div id="search-content-area"><div id="search-results-block">"#,
            "{items}{pagination}",
            "</div></div></body></html>"
        ),
        query = query,
        items = items,
        pagination = pagination,
    )
}

/// Deterministic in-process stand-in for all three backend seams.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoBackend;

impl DemoBackend {
    /// Creates the demo backend.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SearchTransport for DemoBackend {
    async fn fetch_document(&self, address: &Url) -> Result<String, ApiError> {
        let mut query = String::new();
        let mut page = 1usize;
        for (name, value) in address.query_pairs() {
            match name.as_ref() {
                "query" => query = value.into_owned(),
                "page" => page = value.parse().unwrap_or(1).max(1),
                _ => {}
            }
        }
        Ok(page_markup(&query, page))
    }
}

#[async_trait]
impl SummaryBackend for DemoBackend {
    async fn summarize_batch(
        &self,
        papers: &[PaperEntry],
    ) -> Result<Vec<TakeawayEntry>, ApiError> {
        Ok(papers
            .iter()
            .map(|paper| TakeawayEntry {
                id: paper.id.clone(),
                title: paper.title.clone(),
                takeaways_text: format!(
                    "1. {}\n2. The finding is developed in \"{}\".\n3. Numbers and caveats are in the full paper.",
                    lead_sentence(&paper.abstract_text),
                    paper.title,
                ),
            })
            .collect())
    }

    async fn summarize_single(
        &self,
        request: &SingleSummarizeRequest,
    ) -> Result<String, ApiError> {
        Ok(format!(
            "{}\n\nKey points:\n1. {}\n2. Identifier {} resolves to the source PDF.",
            request.abstract_text,
            lead_sentence(&request.abstract_text),
            request.paper_id,
        ))
    }

    async fn summarize_combined(&self, abstracts: &[String]) -> Result<String, ApiError> {
        Ok(format!(
            "1. Digest of {} abstracts from the current results.\n2. Each abstract contributed its lead finding to this summary.",
            abstracts.len(),
        ))
    }
}

#[async_trait]
impl MailingBackend for DemoBackend {
    async fn subscribe(&self, _email: &str) -> Result<MailingOutcome, ApiError> {
        // No message, so the form renders its own success fallback.
        Ok(MailingOutcome {
            ok: true,
            message: None,
        })
    }

    async fn send_test_email(
        &self,
        request: &TestEmailRequest,
    ) -> Result<MailingOutcome, ApiError> {
        Ok(MailingOutcome {
            ok: true,
            message: Some(format!("Demo mailer accepted a test email for {}.", request.email)),
        })
    }
}
