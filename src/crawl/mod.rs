// src/crawl/mod.rs
// =============================================================================
// This module handles a whole crawl of one root URL.
//
// Features:
// - Fetches the root page and classifies its links
// - Probes every link sequentially
// - Assembles the CrawlReport returned to the caller
//
// Only the root page is crawled: links found on other pages are never
// followed.
// =============================================================================

mod analyze;
mod report;

pub use analyze::analyze;
pub use report::CrawlReport;
