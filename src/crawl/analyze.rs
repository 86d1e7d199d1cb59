// src/crawl/analyze.rs
// =============================================================================
// This module runs one crawl from start to finish.
//
// How it works:
// 1. Fetch the root page (same probe and failure handling as any link)
// 2. Extract the page's links and split them into internal / external
// 3. Probe every internal link, then every external link, one at a time
// 4. Assemble the report
//
// Everything is sequential. Each probe is awaited before the next one starts,
// so a crawl takes at most (timeout x number of links) plus the root fetch.
// There is no crawl-level timeout and no way to cancel a crawl once started,
// other than dropping the future.
// =============================================================================

use std::time::Instant;

use crate::checker::{
    extract_links, probe, probe_external, probe_internal, BodyPolicy, ClassifiedLinks,
    InternalLinkRecord, LinkRecord, ProbeConfig,
};

use super::report::CrawlReport;

// Crawls a root URL and probes every link found on it
//
// Parameters:
//   url: the root URL, used as given (an empty or invalid URL is reported
//        through the normal failure codes, it does not fail the crawl)
//   config: timeout and redirect limit applied to every request
//
// Never fails: a root page that cannot be fetched yields a report with the
// failure status and no links.
pub async fn analyze(url: &str, config: &ProbeConfig) -> CrawlReport {
    let started = Instant::now();
    log::info!("Analyzing {}", url);

    let root = probe(url, config, BodyPolicy::Always).await;

    // Links are read from the page whatever its status code
    let ClassifiedLinks { internal, external } = match root.body.as_deref() {
        Some(html) => extract_links(html, url),
        None => ClassifiedLinks::default(),
    };

    log::info!(
        "{} returned {}: {} internal and {} external link(s)",
        url,
        root.record.status_code(),
        internal.len(),
        external.len()
    );

    let mut internal_links = Vec::with_capacity(internal.len());
    for link in &internal {
        let record = probe_internal(link, config).await;
        log::debug!(
            "internal {} -> {} in {}ms, {} chars",
            record.link().requested_url(),
            record.link().status_code(),
            record.link().duration_ms(),
            record.content_length()
        );
        internal_links.push(record);
    }

    let mut external_links = Vec::with_capacity(external.len());
    for link in &external {
        let record = probe_external(link, config).await;
        log::debug!(
            "external {} -> {} in {}ms",
            record.requested_url(),
            record.status_code(),
            record.duration_ms()
        );
        external_links.push(record);
    }

    let analysis_duration_ms = started.elapsed().as_millis() as u64;
    log_summary(url, &internal_links, &external_links, analysis_duration_ms);

    CrawlReport::assemble(
        url.to_string(),
        &root.record,
        internal_links,
        external_links,
        analysis_duration_ms,
    )
}

// One line per crawl: how many links are broken or served without HTTPS
fn log_summary(url: &str, internal: &[InternalLinkRecord], external: &[LinkRecord], duration_ms: u64) {
    let all: Vec<&LinkRecord> = internal
        .iter()
        .map(InternalLinkRecord::link)
        .chain(external.iter())
        .collect();
    let unreachable = all.iter().filter(|link| !link.reachable()).count();
    let insecure = all.iter().filter(|link| !link.secured()).count();

    log::info!(
        "Finished {} in {}ms: {} link(s), {} unreachable, {} without HTTPS",
        url,
        duration_ms,
        all.len(),
        unreachable,
        insecure
    );
}
