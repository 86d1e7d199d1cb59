// src/checker/record.rs
// =============================================================================
// The per-link results that end up in the report.
//
// LinkRecord is the shape shared by every probed link. Internal links wrap it
// and add a content length, instead of being a different kind of record.
//
// `secured` and `reachable` are derived in the constructor from the final URL
// and the status code, so they can never disagree with them.
// =============================================================================

use serde::Serialize;

// The outcome of probing a single URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkRecord {
    /// The URL as it was written in the source page
    #[serde(rename = "parsedUrl")]
    requested_url: String,
    /// Where we ended up after redirects (the requested URL if nothing was sent)
    #[serde(rename = "finalUrl")]
    final_url: String,
    secured: bool,
    reachable: bool,
    /// Wall-clock time of the probe in whole milliseconds
    #[serde(rename = "totalAccessDuration")]
    duration_ms: u64,
    /// Real HTTP status, or a synthetic code for failures (see ProbeFailure)
    #[serde(rename = "responseCode")]
    status_code: u16,
    #[serde(rename = "responseMessage")]
    status_message: String,
    /// Intermediate URLs visited before `final_url`
    #[serde(rename = "redirectedURLs")]
    redirect_chain: Vec<String>,
}

impl LinkRecord {
    pub fn new(
        requested_url: String,
        final_url: String,
        status_code: u16,
        status_message: String,
        redirect_chain: Vec<String>,
        duration_ms: u64,
    ) -> Self {
        let secured = final_url.starts_with("https");
        let reachable = status_code == 200;
        Self {
            requested_url,
            final_url,
            secured,
            reachable,
            duration_ms,
            status_code,
            status_message,
            redirect_chain,
        }
    }

    pub fn requested_url(&self) -> &str {
        &self.requested_url
    }

    pub fn final_url(&self) -> &str {
        &self.final_url
    }

    pub fn secured(&self) -> bool {
        self.secured
    }

    pub fn reachable(&self) -> bool {
        self.reachable
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn redirect_chain(&self) -> &[String] {
        &self.redirect_chain
    }
}

// A probed link on the same origin as the root, with its text length
//
// Serializes as the flattened LinkRecord plus "contentLength".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InternalLinkRecord {
    #[serde(flatten)]
    link: LinkRecord,
    /// Rendered text length, or -1 when the link is not reachable
    #[serde(rename = "contentLength")]
    content_length: i64,
}

impl InternalLinkRecord {
    // Sentinel reported for pages we did not measure
    pub const NOT_MEASURED: i64 = -1;

    // Builds the record, forcing the sentinel when the link is unreachable
    //
    // `text_length` is ignored for unreachable links.
    pub fn new(link: LinkRecord, text_length: Option<usize>) -> Self {
        let content_length = if link.reachable() {
            text_length.map_or(0, |len| len as i64)
        } else {
            Self::NOT_MEASURED
        };
        Self {
            link,
            content_length,
        }
    }

    pub fn link(&self) -> &LinkRecord {
        &self.link
    }

    pub fn content_length(&self) -> i64 {
        self.content_length
    }
}
