// src/crawl/report.rs
// =============================================================================
// The report returned for one crawl.
//
// Assembling a report does no I/O and changes nothing: the link lists are
// kept in the order they were probed, duplicates included.
// =============================================================================

use serde::Serialize;

use crate::checker::{InternalLinkRecord, LinkRecord};

// Everything we know about one crawl
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlReport {
    /// The root URL as it was requested
    pub url: String,
    /// Wall-clock time of the whole crawl in milliseconds
    #[serde(rename = "analysisDuration")]
    pub analysis_duration_ms: u64,
    #[serde(rename = "redirectedURLs")]
    pub root_redirect_chain: Vec<String>,
    #[serde(rename = "responseCode")]
    pub root_status_code: u16,
    #[serde(rename = "responseMessage")]
    pub root_status_message: String,
    #[serde(rename = "internalLinks")]
    pub internal_links: Vec<InternalLinkRecord>,
    #[serde(rename = "externalLinks")]
    pub external_links: Vec<LinkRecord>,
}

impl CrawlReport {
    // Builds the report from the root page's probe and the probed links
    pub fn assemble(
        url: String,
        root: &LinkRecord,
        internal_links: Vec<InternalLinkRecord>,
        external_links: Vec<LinkRecord>,
        analysis_duration_ms: u64,
    ) -> Self {
        Self {
            url,
            analysis_duration_ms,
            root_redirect_chain: root.redirect_chain().to_vec(),
            root_status_code: root.status_code(),
            root_status_message: root.status_message().to_string(),
            internal_links,
            external_links,
        }
    }
}
