// src/checker/domain.rs
// =============================================================================
// This module decides whether a link belongs to the same site as the root.
//
// The "origin" of a link here is purely textual:
//   "http://example.com/about"  -> Some("example.com")
//   "https://a.b:8080/x/y"      -> Some("a.b:8080")
//   "/relative/path"            -> None (no "//" in the string)
//   "mailto:someone@x.org"      -> None
//
// Two links share an origin only when both origins exist and are equal as
// strings. There is no lowercasing, no default-port handling and no scheme
// comparison: "http://a.com" and "https://a.com" share the origin "a.com",
// while "a.com" and "A.com" do not.
// =============================================================================

// Extracts the authority part of a URL string
//
// Takes everything after the first "//" up to the next '/'.
// Returns None when the string has no "//" at all.
pub fn origin(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("//")?;
    rest.split('/').next()
}

// Checks if a link lives on the same origin as the root URL
//
// A link with no origin never matches, not even a root with no origin.
pub fn is_same_origin(link: &str, root: &str) -> bool {
    match (origin(link), origin(root)) {
        (Some(link_origin), Some(root_origin)) => link_origin == root_origin,
        _ => false,
    }
}
