// src/checker/html.rs
// =============================================================================
// This module reads HTML pages.
//
// Two jobs:
// - Collect the href of every <a> tag and split them into internal and
//   external links relative to the root URL
// - Measure the length of a page's rendered text (used for internal links)
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// hrefs are kept exactly as written in the page. They are NOT resolved
// against the root URL, so a relative link like "/about" has no origin and
// ends up in the external list (see domain.rs).
// =============================================================================

use scraper::{Html, Selector};

use super::domain::is_same_origin;

// The links found on a page, split by origin
//
// Both lists keep document order and keep duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedLinks {
    pub internal: Vec<String>,
    pub external: Vec<String>,
}

// Extracts all anchor links from HTML content and classifies them
//
// Parameters:
//   html: the HTML content to parse
//   root_url: the URL the page was requested with (the reference origin)
//
// Anchors without an href attribute are skipped.
pub fn extract_links(html: &str, root_url: &str) -> ClassifiedLinks {
    let document = Html::parse_document(html);

    // "a[href]" only matches anchors that actually carry an href,
    // so <a name="top"> never reaches the loop body
    let selector = Selector::parse("a[href]").expect("static selector is valid");

    let mut links = ClassifiedLinks::default();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if is_same_origin(href, root_url) {
            log::debug!("internal link: {}", href);
            links.internal.push(href.to_string());
        } else {
            log::debug!("external link: {}", href);
            links.external.push(href.to_string());
        }
    }

    links
}

// Counts the characters of a page's rendered text
//
// This is every text node of the document concatenated, measured in
// characters (not bytes). Script and style contents are text nodes too.
pub fn text_length(html: &str) -> usize {
    let document = Html::parse_document(html);
    document
        .root_element()
        .text()
        .map(|chunk| chunk.chars().count())
        .sum()
}
