// src/checker/http.rs
// =============================================================================
// This module probes URLs: one GET request per link, with a bounded timeout
// and a bounded number of redirects.
//
// Key functionality:
// - Builds a fresh HTTP client for each probe from an explicit ProbeConfig
// - Records the redirect chain while reqwest follows redirects
// - Turns every failure into a typed ProbeFailure with a synthetic status
// - Never returns an error: every outcome becomes a LinkRecord
//
// Failure taxonomy (no real response was obtained):
//
//   Timeout              -> 310 "Timeout"
//   Too many redirects   -> 310 "Too Many Redirects"
//   Connection failed    -> 404 "Not Found"
//   Bad / unsupported URL-> 400 "Bad Request"
//   Anything else        -> 999 "Invalid Content Type"
//
// Rust concepts:
// - Result<T, E>: the probe works with Result<ProbeResponse, ProbeFailure>
//   internally and folds it into a record at the end
// - Arc<Mutex<..>>: shares the redirect chain between the redirect policy
//   closure and the probe
// =============================================================================

use reqwest::{redirect, Client, StatusCode};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use thiserror::Error;

use super::html::text_length;
use super::record::{InternalLinkRecord, LinkRecord};

// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

// Default number of redirects followed before giving up
pub const DEFAULT_MAX_REDIRECTS: usize = 3;

// Settings for a single probe
//
// Passed into every probe call, there is no global client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Total time allowed for one request, body included
    pub timeout: Duration,
    /// How many redirects the client follows automatically
    pub max_redirects: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

// Why a probe got no HTTP response
//
// The Display text is the status message written into the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProbeFailure {
    #[error("Timeout")]
    Timeout,
    #[error("Too Many Redirects")]
    TooManyRedirects,
    #[error("Not Found")]
    ConnectionFailed,
    #[error("Bad Request")]
    InvalidUrl,
    #[error("Invalid Content Type")]
    Other,
}

impl ProbeFailure {
    // The synthetic status code reported for this failure
    pub fn status_code(self) -> u16 {
        match self {
            ProbeFailure::Timeout | ProbeFailure::TooManyRedirects => 310,
            ProbeFailure::ConnectionFailed => 404,
            ProbeFailure::InvalidUrl => 400,
            ProbeFailure::Other => 999,
        }
    }

    // Categorizes a reqwest error
    //
    // Order matters: a connect timeout is both a timeout and a connect
    // error, and it is reported as a timeout.
    fn from_error(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            ProbeFailure::Timeout
        } else if error.is_redirect() {
            ProbeFailure::TooManyRedirects
        } else if error.is_connect() {
            ProbeFailure::ConnectionFailed
        } else if error.is_builder() {
            // Unparseable URL, relative URL, or a scheme other than http(s)
            ProbeFailure::InvalidUrl
        } else {
            ProbeFailure::Other
        }
    }
}

// Returned to reqwest from the redirect policy once the limit is passed
#[derive(Debug, Error)]
#[error("exceeded the limit of {limit} redirects")]
struct RedirectLimitExceeded {
    limit: usize,
}

// When the probe should keep the response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyPolicy {
    /// Never read the body (external links)
    Skip,
    /// Read it only for a 200 response (internal links)
    WhenReachable,
    /// Always read it (the root page)
    Always,
}

// What we learned from a request that got a response
#[derive(Debug)]
struct ProbeResponse {
    final_url: String,
    status: StatusCode,
    redirect_chain: Vec<String>,
    body: Option<String>,
}

// A finished probe: the record plus the body, if one was kept
#[derive(Debug)]
pub struct Probe {
    pub record: LinkRecord,
    pub body: Option<String>,
}

// Probes a single URL
//
// Parameters:
//   url: the URL exactly as found (may be relative or garbage)
//   config: timeout and redirect limit
//   body: whether to keep the response body
//
// Never fails. If no response was obtained, the record carries the
// synthetic status of the failure, `finalUrl` is the requested URL and the
// redirect chain is empty.
pub async fn probe(url: &str, config: &ProbeConfig, body: BodyPolicy) -> Probe {
    let started = Instant::now();
    let outcome = send(url, config, body).await;
    let duration_ms = started.elapsed().as_millis() as u64;

    match outcome {
        Ok(response) => {
            log::debug!(
                "{} -> {} ({}) in {}ms",
                url,
                response.status.as_u16(),
                response.final_url,
                duration_ms
            );
            let record = LinkRecord::new(
                url.to_string(),
                response.final_url,
                response.status.as_u16(),
                reason_phrase(response.status),
                response.redirect_chain,
                duration_ms,
            );
            Probe {
                record,
                body: response.body,
            }
        }
        Err(failure) => {
            log::info!("{} failed after {}ms: {}", url, duration_ms, failure);
            let record = LinkRecord::new(
                url.to_string(),
                url.to_string(),
                failure.status_code(),
                failure.to_string(),
                Vec::new(),
                duration_ms,
            );
            Probe { record, body: None }
        }
    }
}

// Probes an external link (the body is never read)
pub async fn probe_external(url: &str, config: &ProbeConfig) -> LinkRecord {
    probe(url, config, BodyPolicy::Skip).await.record
}

// Probes an internal link and measures its rendered text
//
// The body of the probe response is reused. If it could not be read, the
// final URL is fetched once more. Unreachable links are never re-fetched.
pub async fn probe_internal(url: &str, config: &ProbeConfig) -> InternalLinkRecord {
    let Probe { record, body } = probe(url, config, BodyPolicy::WhenReachable).await;

    if !record.reachable() {
        return InternalLinkRecord::new(record, None);
    }

    let body = match body {
        Some(body) => Some(body),
        None => fetch_text(record.final_url(), config).await,
    };

    InternalLinkRecord::new(record, body.as_deref().map(text_length))
}

// Fetches a page body, or None on any failure
async fn fetch_text(url: &str, config: &ProbeConfig) -> Option<String> {
    let client = build_client(config, Arc::new(Mutex::new(Vec::new()))).ok()?;
    let result = match client.get(url).send().await {
        Ok(response) => response.text().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(text) => Some(text),
        Err(e) => {
            log::warn!("could not re-fetch body of {}: {}", url, e);
            None
        }
    }
}

// Sends the request and reads the body if asked to
async fn send(
    url: &str,
    config: &ProbeConfig,
    policy: BodyPolicy,
) -> Result<ProbeResponse, ProbeFailure> {
    let visited = Arc::new(Mutex::new(Vec::new()));

    let client = build_client(config, Arc::clone(&visited)).map_err(|e| {
        log::warn!("could not build HTTP client: {}", e);
        ProbeFailure::Other
    })?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ProbeFailure::from_error(&e))?;

    let final_url = response.url().to_string();
    let status = response.status();
    let redirect_chain = visited
        .lock()
        .map(|chain| chain.clone())
        .unwrap_or_default();

    let wants_body = match policy {
        BodyPolicy::Skip => false,
        BodyPolicy::WhenReachable => status == StatusCode::OK,
        BodyPolicy::Always => true,
    };

    let body = if wants_body {
        match response.text().await {
            Ok(text) => Some(text),
            Err(e) => {
                log::warn!("could not read body of {}: {}", final_url, e);
                None
            }
        }
    } else {
        None
    };

    Ok(ProbeResponse {
        final_url,
        status,
        redirect_chain,
        body,
    })
}

// Creates a client for exactly one request
//
// The redirect policy writes every URL visited before the current redirect
// into `visited`, so after the request it holds the full redirect chain.
fn build_client(config: &ProbeConfig, visited: Arc<Mutex<Vec<String>>>) -> reqwest::Result<Client> {
    let limit = config.max_redirects;

    let policy = redirect::Policy::custom(move |attempt| {
        // previous() holds the original URL and every redirect target so far,
        // but not the URL we are being redirected to now
        let previous: Vec<String> = attempt.previous().iter().map(|u| u.to_string()).collect();
        let exceeded = previous.len() > limit;

        if let Ok(mut chain) = visited.lock() {
            *chain = previous;
        }

        if exceeded {
            attempt.error(RedirectLimitExceeded { limit })
        } else {
            attempt.follow()
        }
    });

    Client::builder()
        .timeout(config.timeout)
        .redirect(policy)
        .build()
}

// The canonical reason phrase for a status code, empty if there is none
fn reason_phrase(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or("").to_string()
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why a fresh client per probe?
//    - The redirect chain is recorded through the client's redirect policy,
//      so each client is tied to one request
//    - Nothing is shared between probes, so one crawl cannot affect another
//
// 2. Why is the duration measured around send() and not around the whole
//    probe_internal()?
//    - The duration is the cost of reaching the link. Re-fetching a body for
//      the content length is extra work done by us, not by the link.
//
// 3. What does is_builder() mean on a reqwest error?
//    - The request could not even be built: the URL failed to parse
//      ("", "/about") or used a scheme reqwest does not speak ("mailto:")
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_config() -> ProbeConfig {
        ProbeConfig {
            timeout: Duration::from_millis(500),
            max_redirects: 3,
        }
    }

    // A local port with nothing listening on it
    fn closed_port() -> u16 {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    }

    // Mounts /r0 -> /r1 -> ... -> /r{hops} where the last one answers 200
    async fn mount_redirect_chain(server: &MockServer, hops: usize) {
        for hop in 0..hops {
            Mock::given(method("GET"))
                .and(path(format!("/r{}", hop)))
                .respond_with(
                    ResponseTemplate::new(302)
                        .insert_header("Location", format!("{}/r{}", server.uri(), hop + 1)),
                )
                .mount(server)
                .await;
        }
        Mock::given(method("GET"))
            .and(path(format!("/r{}", hops)))
            .respond_with(ResponseTemplate::new(200))
            .mount(server)
            .await;
    }

    // Answers successive connections with the given raw HTTP responses, in order
    //
    // Each connection gets its request read, one response written, and is
    // then closed. Returns the base URL.
    async fn serve_raw(responses: Vec<&'static str>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            for response in responses {
                let (mut stream, _) = listener.accept().await.unwrap();

                let mut request = Vec::new();
                let mut chunk = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut chunk).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&chunk[..n]),
                    }
                }

                stream.write_all(response.as_bytes()).await.unwrap();
                let _ = stream.shutdown().await;
            }
        });

        format!("http://{}", addr)
    }

    // Promises 100 bytes, sends 12, then hangs up
    const TRUNCATED: &str =
        "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 100\r\nConnection: close\r\n\r\n<p>Hello</p>";

    const COMPLETE: &str =
        "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 12\r\nConnection: close\r\n\r\n<p>Hello</p>";

    #[test]
    fn test_default_config() {
        let config = ProbeConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.max_redirects, 3);
    }

    #[test]
    fn test_failure_codes_and_messages() {
        let table = [
            (ProbeFailure::Timeout, 310, "Timeout"),
            (ProbeFailure::TooManyRedirects, 310, "Too Many Redirects"),
            (ProbeFailure::ConnectionFailed, 404, "Not Found"),
            (ProbeFailure::InvalidUrl, 400, "Bad Request"),
            (ProbeFailure::Other, 999, "Invalid Content Type"),
        ];
        for (failure, code, message) in table {
            assert_eq!(failure.status_code(), code);
            assert_eq!(failure.to_string(), message);
        }
    }

    #[tokio::test]
    async fn test_probe_ok() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
            .mount(&server)
            .await;

        let url = format!("{}/ok", server.uri());
        let probe = probe(&url, &fast_config(), BodyPolicy::Always).await;

        assert_eq!(probe.record.status_code(), 200);
        assert_eq!(probe.record.status_message(), "OK");
        assert!(probe.record.reachable());
        assert!(!probe.record.secured());
        assert_eq!(probe.record.final_url(), url);
        assert!(probe.record.redirect_chain().is_empty());
        assert_eq!(probe.body.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_probe_not_found_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = format!("{}/missing", server.uri());
        let record = probe_external(&url, &fast_config()).await;

        assert_eq!(record.status_code(), 404);
        assert_eq!(record.status_message(), "Not Found");
        assert!(!record.reachable());
    }

    #[tokio::test]
    async fn test_probe_follows_redirects_and_records_chain() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/start"))
            .respond_with(
                ResponseTemplate::new(302).insert_header("Location", format!("{}/middle", server.uri())),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/middle"))
            .respond_with(
                ResponseTemplate::new(301).insert_header("Location", format!("{}/end", server.uri())),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/end"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let start = format!("{}/start", server.uri());
        let record = probe_external(&start, &fast_config()).await;

        assert_eq!(record.requested_url(), start);
        assert_eq!(record.final_url(), format!("{}/end", server.uri()));
        assert_eq!(
            record.redirect_chain(),
            &[start.clone(), format!("{}/middle", server.uri())]
        );
        assert!(record.reachable());
    }

    #[tokio::test]
    async fn test_probe_too_many_redirects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/loop"))
            .respond_with(
                ResponseTemplate::new(302).insert_header("Location", format!("{}/loop", server.uri())),
            )
            .mount(&server)
            .await;

        let url = format!("{}/loop", server.uri());
        let record = probe_external(&url, &fast_config()).await;

        assert_eq!(record.status_code(), 310);
        assert_eq!(record.status_message(), "Too Many Redirects");
        assert_eq!(record.final_url(), url);
        assert!(record.redirect_chain().is_empty());
    }

    #[tokio::test]
    async fn test_probe_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let config = ProbeConfig {
            timeout: Duration::from_millis(200),
            max_redirects: 3,
        };
        let url = format!("{}/slow", server.uri());
        let record = probe_external(&url, &config).await;

        assert_eq!(record.status_code(), 310);
        assert_eq!(record.status_message(), "Timeout");
        assert!(!record.reachable());
    }

    #[tokio::test]
    async fn test_probe_connection_refused() {
        let url = format!("http://127.0.0.1:{}/", closed_port());
        let record = probe_external(&url, &fast_config()).await;

        assert_eq!(record.status_code(), 404);
        assert_eq!(record.status_message(), "Not Found");
        assert!(!record.reachable());
        assert_eq!(record.final_url(), url);
        assert!(record.redirect_chain().is_empty());
    }

    #[tokio::test]
    async fn test_probe_invalid_urls() {
        for url in ["", "/about", "mailto:test@example.com", "ftp://example.com/file"] {
            let record = probe_external(url, &fast_config()).await;
            assert_eq!(record.status_code(), 400, "url: {:?}", url);
            assert_eq!(record.status_message(), "Bad Request");
            assert_eq!(record.final_url(), url);
            assert!(!record.secured());
        }
    }

    #[tokio::test]
    async fn test_probe_internal_measures_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html><body><p>Hello</p></body></html>"))
            .mount(&server)
            .await;

        let url = format!("{}/page", server.uri());
        let internal = probe_internal(&url, &fast_config()).await;

        assert!(internal.link().reachable());
        assert_eq!(internal.content_length(), 5);
    }

    #[tokio::test]
    async fn test_probe_internal_unreachable_is_not_measured() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<p>error page</p>"))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/broken", server.uri());
        let internal = probe_internal(&url, &fast_config()).await;

        assert!(!internal.link().reachable());
        assert_eq!(internal.content_length(), -1);
    }

    #[tokio::test]
    async fn test_skip_policy_does_not_keep_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("body"))
            .mount(&server)
            .await;

        let probe = probe(&server.uri(), &fast_config(), BodyPolicy::Skip).await;
        assert!(probe.body.is_none());
    }

    #[tokio::test]
    async fn test_three_redirects_are_followed() {
        let server = MockServer::start().await;
        mount_redirect_chain(&server, 3).await;

        let start = format!("{}/r0", server.uri());
        let record = probe_external(&start, &ProbeConfig::default()).await;

        assert_eq!(record.status_code(), 200);
        assert!(record.reachable());
        assert_eq!(record.final_url(), format!("{}/r3", server.uri()));
        assert_eq!(
            record.redirect_chain(),
            &[
                format!("{}/r0", server.uri()),
                format!("{}/r1", server.uri()),
                format!("{}/r2", server.uri()),
            ]
        );
    }

    #[tokio::test]
    async fn test_fourth_redirect_is_refused() {
        let server = MockServer::start().await;
        mount_redirect_chain(&server, 4).await;

        let start = format!("{}/r0", server.uri());
        let record = probe_external(&start, &ProbeConfig::default()).await;

        assert_eq!(record.status_code(), 310);
        assert_eq!(record.status_message(), "Too Many Redirects");
        assert_eq!(record.final_url(), start);
        assert!(record.redirect_chain().is_empty());
    }

    #[tokio::test]
    async fn test_truncated_body_is_fetched_again() {
        let base = serve_raw(vec![TRUNCATED, COMPLETE]).await;

        let internal = probe_internal(&format!("{}/page", base), &fast_config()).await;

        assert_eq!(internal.link().status_code(), 200);
        assert!(internal.link().reachable());
        assert_eq!(internal.content_length(), "Hello".len() as i64);
    }

    #[tokio::test]
    async fn test_unreadable_body_counts_as_empty() {
        let base = serve_raw(vec![TRUNCATED, TRUNCATED]).await;

        let internal = probe_internal(&format!("{}/page", base), &fast_config()).await;

        assert!(internal.link().reachable());
        assert_eq!(internal.content_length(), 0);
    }
}
