//! Link classification and small text utilities shared by the parsers.
//!
//! All regexes are process-wide immutable constants; they have no lifecycle
//! and are safe to share across parse invocations.

use once_cell::sync::Lazy;
use regex::Regex;

/// Base URL of the published site; chart and explorer links live under it.
pub const SITE_BASE_URL: &str = "https://galleypress.org";
const CHART_PATH_PREFIX: &str = "/charts/";
const EXPLORER_PATH_PREFIX: &str = "/explorers/";

/// Share-link form of the external editor. Matches with and without a
/// trailing `/edit` segment and tolerates `u/0/`-style user prefixes.
pub static DOCUMENT_URL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https://docs\.google\.com/.+?/d/([-\w]+)/?(edit)?#?").unwrap());

/// Detail-on-demand anchor, e.g. `#dod:energy-mix`.
pub static DOD_ANCHOR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#dod:([\w-]+)$").unwrap());

/// Ref anchor, e.g. `#ref:note-3`.
pub static REF_ANCHOR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#ref:([\w-]+)$").unwrap());

/// An anchor tag wrapping a value, as the markup serializer sometimes
/// produces for link-valued fields.
static ANCHOR_HREF_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r#"<a[^>]*\shref="([^"]*)""#).unwrap());

/// What a URL points at, as far as the pipeline cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Another editor document.
    Document,
    /// A chart page on the site.
    Chart,
    /// A data explorer page on the site.
    Explorer,
    /// Anything else.
    External,
}

pub fn link_kind(url: &str) -> LinkKind {
    if DOCUMENT_URL_REGEX.is_match(url) {
        return LinkKind::Document;
    }
    let path = site_path(url);
    if let Some(path) = path {
        if path.starts_with(CHART_PATH_PREFIX) {
            return LinkKind::Chart;
        }
        if path.starts_with(EXPLORER_PATH_PREFIX) {
            return LinkKind::Explorer;
        }
    }
    LinkKind::External
}

/// Site-relative path of a URL, if it is on the site (absolute or
/// site-relative form).
fn site_path(url: &str) -> Option<&str> {
    if let Some(rest) = url.strip_prefix(SITE_BASE_URL) {
        return Some(rest);
    }
    if url.starts_with('/') {
        return Some(url);
    }
    None
}

/// Whether a URL resolves to content this pipeline knows how to link up
/// later (a document, chart, or explorer) rather than an external site.
pub fn is_internal_link(url: &str) -> bool {
    link_kind(url) != LinkKind::External
}

/// The lookup key a URL resolves to: the document id for document links,
/// the slug for chart/explorer links, the URL itself otherwise.
pub fn url_target(url: &str) -> String {
    if let Some(captures) = DOCUMENT_URL_REGEX.captures(url) {
        return captures[1].to_owned();
    }
    if let Some(path) = site_path(url) {
        let slug = path
            .strip_prefix(CHART_PATH_PREFIX)
            .or_else(|| path.strip_prefix(EXPLORER_PATH_PREFIX));
        if let Some(slug) = slug {
            let end = slug.find(['?', '#']).unwrap_or(slug.len());
            return slug[..end].trim_end_matches('/').to_owned();
        }
    }
    url.to_owned()
}

/// Link-valued fields sometimes arrive wrapped in an anchor tag
/// (`<a href="…">…</a>`); take the href in that case, the trimmed string
/// otherwise.
pub fn extract_url(value: &str) -> String {
    if let Some(captures) = ANCHOR_HREF_REGEX.captures(value) {
        return captures[1].to_owned();
    }
    value.trim().to_owned()
}

/// Headings may carry a supertitle before a vertical-tab separator:
/// `supertitle\u{0b}title`. Returns `(title, supertitle)`; an empty part
/// after the separator means there is no supertitle.
pub fn split_title_supertitle(text: &str) -> (&str, Option<&str>) {
    match text.split_once('\u{0b}') {
        Some((supertitle, title)) if !title.is_empty() => (title, Some(supertitle)),
        Some((before, _)) => (before, None),
        None => (text, None),
    }
}

/// Author fields arrive as one comma-separated string.
pub fn parse_authors(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|author| !author.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_document_links() {
        for url in [
            "https://docs.google.com/document/d/abcd1234",
            "https://docs.google.com/document/d/abcd-1234/edit",
            "https://docs.google.com/document/u/0/d/abcd-1234/edit?usp=sharing",
        ] {
            assert_eq!(link_kind(url), LinkKind::Document, "{url}");
        }
        assert_eq!(
            url_target("https://docs.google.com/document/d/abcd-1234/edit"),
            "abcd-1234"
        );
    }

    #[test]
    fn classifies_site_links() {
        assert_eq!(
            link_kind("https://galleypress.org/charts/life-expectancy"),
            LinkKind::Chart
        );
        assert_eq!(
            link_kind("/explorers/energy?country=FRA"),
            LinkKind::Explorer
        );
        assert_eq!(link_kind("https://example.com/charts/x"), LinkKind::External);
        assert_eq!(
            url_target("https://galleypress.org/charts/life-expectancy?tab=map"),
            "life-expectancy"
        );
    }

    #[test]
    fn extract_url_unwraps_anchors() {
        assert_eq!(
            extract_url("<a href=\"https://example.com/x\">https://example.com/x</a>"),
            "https://example.com/x"
        );
        assert_eq!(extract_url("  https://example.com/x "), "https://example.com/x");
    }

    #[test]
    fn supertitle_splits_on_vertical_tab() {
        assert_eq!(
            split_title_supertitle("Poverty\u{b}Global trends"),
            ("Global trends", Some("Poverty"))
        );
        assert_eq!(split_title_supertitle("Plain"), ("Plain", None));
        // empty part after the separator means no supertitle
        assert_eq!(split_title_supertitle("Poverty\u{b}"), ("Poverty", None));
    }

    #[test]
    fn authors_split_on_commas() {
        assert_eq!(
            parse_authors(" Ada Lovelace, Charles Babbage ,"),
            vec!["Ada Lovelace".to_owned(), "Charles Babbage".to_owned()]
        );
    }

    #[test]
    fn anchor_regexes_extract_ids() {
        assert_eq!(&REF_ANCHOR_REGEX.captures("#ref:note-3").unwrap()[1], "note-3");
        assert_eq!(&DOD_ANCHOR_REGEX.captures("#dod:energy_mix").unwrap()[1], "energy_mix");
        assert!(DOD_ANCHOR_REGEX.captures("#dod:").is_none());
    }
}
