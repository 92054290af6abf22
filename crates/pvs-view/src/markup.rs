//! Markup fragments and text formatting
//!
//! Builders for the fixed fragments the engine renders into regions, the
//! panel, and the modal, plus the takeaway formatting rules: newline
//! conversion, list detection, and reformatting of numbered or bulleted
//! lines into proper list markup.

use regex::Regex;
use std::sync::OnceLock;

/// Trailing label appended to truncated abstracts in the rendered page.
const READ_MORE_LABEL: &str = "Read more";

fn leading_list_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^\s*<ol>|<ul").expect("list tag regex must compile"))
}

fn leading_any_list_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^\s*<[uo]l>").expect("list tag regex must compile"))
}

fn numbered_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+[.)]?\s+").expect("numbered line regex must compile"))
}

fn bullet_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[-*+]\s+").expect("bullet line regex must compile"))
}

fn list_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+[.)]?\s+|^[-*+]\s+").expect("marker regex must compile"))
}

/// Replaces literal newlines with break tags.
#[must_use]
pub fn newlines_to_breaks(text: &str) -> String {
    text.replace('\n', "<br>")
}

/// Formats raw takeaway text for panel rendering.
///
/// Newlines become breaks first. Text that does not already carry list
/// markup and spans several lines is inspected line by line: if every
/// non-empty line opens with a numbered marker, or every line opens with a
/// bullet marker, the lines are rewrapped as an unordered list with the
/// markers stripped. Anything else is wrapped as a paragraph.
#[must_use]
pub fn format_takeaways(text: &str) -> String {
    let converted = newlines_to_breaks(text);

    if !leading_list_tag_re().is_match(&converted) && converted.contains("<br>") {
        let lines: Vec<&str> = converted
            .split("<br>")
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let all_numbered = lines.iter().all(|line| numbered_line_re().is_match(line));
        let all_bulleted = lines.iter().all(|line| bullet_line_re().is_match(line));
        if all_numbered || all_bulleted {
            let items: String = lines
                .iter()
                .map(|line| format!("<li>{}</li>", list_marker_re().replace(line, "")))
                .collect();
            format!("<ul>{items}</ul>")
        } else {
            format!("<p>{converted}</p>")
        }
    } else if !leading_any_list_re().is_match(&converted) {
        format!("<p>{converted}</p>")
    } else {
        converted
    }
}

/// Strips the trailing "Read more" label from a truncated abstract.
#[must_use]
pub fn strip_read_more_suffix(text: &str) -> String {
    let trimmed = text.trim();
    let stripped = trimmed.strip_suffix(READ_MORE_LABEL).unwrap_or(trimmed);
    stripped.trim().to_string()
}

/// Escapes text for element content.
#[must_use]
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escapes text for a double-quoted attribute value.
#[must_use]
pub fn escape_attr(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}

/// Loading placeholder for the results region.
#[must_use]
pub fn loading_results_block() -> String {
    r#"<div class="loading-indicator"><p>Loading results...</p></div>"#.to_string()
}

/// Inline failure fragment for a failed search navigation.
#[must_use]
pub fn search_failure_block(description: &str) -> String {
    format!(r#"<p class="alert alert-danger">Search failed: {description}. Please try again.</p>"#)
}

/// Terminal fragment when a fetched document carries no usable region.
#[must_use]
pub fn parse_failure_block() -> String {
    "<p>Error: Could not parse search results.</p>".to_string()
}

/// Working indicator shown in the panel while a batch request is in flight.
#[must_use]
pub fn panel_working_block() -> String {
    concat!(
        r#"<div class="summary-spinner"></div>"#,
        r#"<span class="loading-indicator-text" role="status" aria-live="assertive">"#,
        "Summarizing key takeaways, please wait...</span>"
    )
    .to_string()
}

/// Working indicator shown in the modal while a single request is in flight.
#[must_use]
pub fn modal_working_block() -> String {
    concat!(
        r#"<div class="summary-spinner"></div>"#,
        r#"<span class="loading-indicator-text" role="status" aria-live="assertive">"#,
        "Generating detailed summary...</span>"
    )
    .to_string()
}

/// Error fragment for panel and modal bodies.
#[must_use]
pub fn summary_error_block(text: &str) -> String {
    format!(r#"<p class="summary-error-text">{text}</p>"#)
}

/// Plain paragraph fragment.
#[must_use]
pub fn paragraph_block(text: &str) -> String {
    format!("<p>{text}</p>")
}

/// One rendered takeaway block: a heading that doubles as the single-paper
/// trigger, carrying the metadata the detail flow needs, followed by the
/// formatted takeaway body.
#[must_use]
pub fn takeaway_block(id: &str, title: &str, abstract_text: &str, body: &str) -> String {
    format!(
        concat!(
            r#"<div class="paper-takeaways-block" style="margin-bottom: 15px;">"#,
            r##"<h5><a href="#" class="single-paper-summary-link" data-paper-id="{id}" "##,
            r#"data-paper-title="{title_attr}" data-paper-abstract="{abstract_attr}" "#,
            r#"data-paper-pdf-link="/pdf/{id}">{title_text}</a></h5>{body}</div>"#
        ),
        id = escape_attr(id),
        title_attr = escape_attr(title),
        abstract_attr = escape_attr(abstract_text),
        title_text = escape_text(title),
        body = body,
    )
}

/// Modal body with an optional source-document link header.
///
/// The header is emitted only when the link is usable, i.e. not the `#`
/// placeholder carried by items without a resolvable source address.
#[must_use]
pub fn modal_body_with_link(pdf_link: &str, content: &str) -> String {
    if pdf_link.is_empty() || pdf_link == "#" {
        content.to_string()
    } else {
        format!(
            concat!(
                r#"<p style="margin-bottom: 10px; font-size: 0.9em;">"#,
                r#"<a href="{link}" target="_blank" rel="noopener noreferrer">"#,
                "<strong>View Original Paper (PDF)</strong></a></p>",
                r#"<hr style="margin-top: 5px; margin-bottom: 15px;">{content}"#
            ),
            link = escape_attr(pdf_link),
            content = content,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn newlines_become_breaks() {
        assert_eq!(newlines_to_breaks("a\nb\nc"), "a<br>b<br>c");
    }

    #[test]
    fn numbered_lines_reformat_as_list() {
        let text = "1. First point\n2. Second point\n3. Third point";
        assert_eq!(
            format_takeaways(text),
            "<ul><li>First point</li><li>Second point</li><li>Third point</li></ul>"
        );
    }

    #[test]
    fn numbered_variants_with_paren_and_bare() {
        let text = "1) Alpha\n2 Beta";
        assert_eq!(format_takeaways(text), "<ul><li>Alpha</li><li>Beta</li></ul>");
    }

    #[test]
    fn bulleted_lines_reformat_as_list() {
        let text = "- one\n* two\n+ three";
        assert_eq!(
            format_takeaways(text),
            "<ul><li>one</li><li>two</li><li>three</li></ul>"
        );
    }

    #[test]
    fn mixed_lines_fall_back_to_paragraph() {
        let text = "1. First\nplain continuation";
        assert_eq!(
            format_takeaways(text),
            "<p>1. First<br>plain continuation</p>"
        );
    }

    #[test]
    fn single_line_wraps_as_paragraph() {
        assert_eq!(format_takeaways("just a sentence"), "<p>just a sentence</p>");
    }

    #[test]
    fn preformatted_list_passes_through() {
        let text = "<ul><li>already done</li></ul>";
        assert_eq!(format_takeaways(text), text);
    }

    #[test]
    fn read_more_suffix_is_stripped() {
        assert_eq!(
            strip_read_more_suffix("Short abstract text... Read more"),
            "Short abstract text..."
        );
        assert_eq!(strip_read_more_suffix("No label here"), "No label here");
    }

    #[test]
    fn attr_escaping_covers_quotes() {
        assert_eq!(
            escape_attr(r#"A "quoted" <title> & co"#),
            "A &quot;quoted&quot; &lt;title&gt; &amp; co"
        );
    }

    #[test]
    fn takeaway_block_carries_detail_metadata() {
        let block = takeaway_block("2401.1", "Attention", "An abstract", "<p>body</p>");
        assert!(block.contains(r#"data-paper-id="2401.1""#));
        assert!(block.contains(r#"data-paper-title="Attention""#));
        assert!(block.contains(r#"data-paper-abstract="An abstract""#));
        assert!(block.contains(r#"data-paper-pdf-link="/pdf/2401.1""#));
        assert!(block.ends_with("<p>body</p></div>"));
    }

    #[test]
    fn modal_body_skips_header_for_placeholder_link() {
        assert_eq!(modal_body_with_link("#", "<p>x</p>"), "<p>x</p>");
        let with_header = modal_body_with_link("https://arxiv.org/abs/1", "<p>x</p>");
        assert!(with_header.contains("View Original Paper (PDF)"));
        assert!(with_header.ends_with("<p>x</p>"));
    }
}
