// src/checker/mod.rs
// =============================================================================
// This module contains the per-link logic of a crawl.
//
// Submodules:
// - domain: Decides whether a link is on the root's origin
// - html: Extracts and classifies links, measures rendered text
// - http: Probes a single URL and turns the outcome into a record
// - record: The LinkRecord / InternalLinkRecord result types
//
// This file (mod.rs) is the module root - it re-exports the public API that
// the crawl pipeline uses.
// =============================================================================

mod domain;
mod html;
mod http;
mod record;

pub use html::{extract_links, ClassifiedLinks};
pub use http::{probe, probe_external, probe_internal, BodyPolicy, ProbeConfig};
pub use record::{InternalLinkRecord, LinkRecord};
