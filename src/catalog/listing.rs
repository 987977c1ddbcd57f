//! Link extraction from static-server directory listings.
//!
//! Listings are plain HTML; the only contract is that every entry is an
//! anchor whose `href` resolves to the entry's URL.

use scraper::{Html, Selector};
use url::Url;

/// Every anchor `href` in document order.
pub(super) fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    document
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect()
}

/// Resolve anchors against `base`, keeping only links on the same origin.
fn resolve_links(base: &Url, html: &str) -> Vec<Url> {
    extract_hrefs(html)
        .iter()
        .filter_map(|href| base.join(href.trim()).ok())
        .filter(|u| u.origin() == base.origin())
        .collect()
}

/// The decoded part of `link`'s path below `base`'s path, if `link` lives under it.
///
/// Both paths are compared decoded: servers differ in which characters they
/// escape (`(`, `'`, `&` and friends), so `%28` and `(` must match.
fn relative_path(base: &Url, link: &Url) -> Option<String> {
    let base = decode(base.path());
    decode(link.path())
        .strip_prefix(base.as_str())
        .filter(|rest| !rest.is_empty())
        .map(str::to_string)
}

fn decode(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

/// Case-insensitive match of `name`'s extension against `extensions`
/// (given without the dot).
pub(super) fn has_audio_extension(name: &str, extensions: &[String]) -> bool {
    let Some((_, ext)) = name.rsplit_once('.') else {
        return false;
    };
    extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.'))
        .filter(|e| !e.is_empty())
        .any(|e| e.eq_ignore_ascii_case(ext))
}

/// Decoded names of the audio files listed directly inside `folder_url`.
///
/// Listing order and duplicates are preserved.
pub(super) fn track_names(folder_url: &Url, html: &str, extensions: &[String]) -> Vec<String> {
    resolve_links(folder_url, html)
        .iter()
        .filter_map(|link| relative_path(folder_url, link))
        .filter(|rest| !rest.contains('/'))
        .filter(|rest| has_audio_extension(rest, extensions))
        .collect()
}

/// Decoded names of the sub-folders listed directly inside `root`.
///
/// Housekeeping entries (dot-names) and links back to the root itself or
/// above it are skipped.
pub(super) fn album_folders(root: &Url, html: &str) -> Vec<String> {
    resolve_links(root, html)
        .iter()
        .filter_map(|link| relative_path(root, link))
        .filter_map(|rest| rest.strip_suffix('/').map(str::to_string))
        .filter(|name| !name.is_empty() && !name.contains('/'))
        .filter(|name| !name.starts_with('.'))
        .collect()
}
