//! Metadata extraction for the crawler module
//!
//! Every field is resolved through an ordered chain of `Option` producers;
//! the first non-blank value wins. Nothing here fails: missing markup just
//! yields empty strings and the conventional favicon path.

use crate::crawler::SiteInfo;
use scraper::{Html, Selector};
use tracing::{trace, warn};
use url::Url;

/// Icon links in priority order: vector first, then raster sizes from largest
/// down, then Apple touch icons, then the legacy forms.
const ICON_SELECTORS: &[&str] = &[
    r#"link[rel="icon"][type="image/svg+xml"]"#,
    r#"link[rel="icon"][sizes="192x192"]"#,
    r#"link[rel="icon"][sizes="180x180"]"#,
    r#"link[rel="icon"][sizes="128x128"]"#,
    r#"link[rel="icon"][sizes="96x96"]"#,
    r#"link[rel="icon"][sizes="32x32"]"#,
    r#"link[rel="apple-touch-icon"]"#,
    r#"link[rel="apple-touch-icon-precomposed"]"#,
    r#"link[rel="shortcut icon"]"#,
    r#"link[rel="icon"]"#,
];

/// Separators between the site name and the tagline in a `<title>`
const TITLE_SEPARATORS: [char; 4] = ['-', '|', '–', '—'];

/// Extract metadata from a fetched page
///
/// # Arguments
///
/// * `url` - The URL that was requested, stored verbatim on the result
/// * `origin` - Origin of the page (`scheme://host[:port]`), used to
///   resolve relative links
/// * `html` - The HTML of the page
///
/// # Returns
///
/// A populated `SiteInfo` without `ai_description`
pub fn extract_site_info(url: &str, origin: &str, html: &str) -> SiteInfo {
    let document = Html::parse_document(html);
    let mut info = SiteInfo::new(url);

    info.title = first_text(&document, "title")
        .map(|title| title.trim().to_string())
        .unwrap_or_default();
    info.og_title = meta_content(&document, r#"meta[property="og:title"]"#);
    info.og_site_name = meta_content(&document, r#"meta[property="og:site_name"]"#);
    info.twitter_title = meta_content(&document, r#"meta[name="twitter:title"]"#);

    info.description = meta_content(&document, r#"meta[name="description"]"#)
        .or_else(|| meta_content(&document, r#"meta[property="og:description"]"#))
        .or_else(|| meta_content(&document, r#"meta[name="twitter:description"]"#))
        .unwrap_or_default();

    info.keywords = meta_content(&document, r#"meta[name="keywords"]"#).unwrap_or_default();

    info.name = info
        .og_site_name
        .clone()
        .or_else(|| meta_content(&document, r#"meta[name="application-name"]"#))
        .or_else(|| title_name(&info.title))
        .unwrap_or_else(|| hostname(origin));

    info.icon = ICON_SELECTORS
        .iter()
        .find_map(|selector| attr(&document, selector, "href"))
        .map(|href| resolve_icon_href(origin, &href))
        .unwrap_or_else(|| format!("{}/favicon.ico", origin));

    info.og_image = meta_content(&document, r#"meta[property="og:image"]"#)
        .map(|src| resolve_og_image(origin, &src));

    trace!(name = %info.name, icon = %info.icon, "Extracted site info");
    info
}

/// Resolve an icon `href` against the page origin
///
/// Protocol-relative links get `https:`, root-relative links are appended to
/// the origin, absolute links pass through and anything else is treated as
/// relative to the site root.
pub fn resolve_icon_href(origin: &str, href: &str) -> String {
    if href.starts_with("//") {
        format!("https:{}", href)
    } else if href.starts_with('/') {
        format!("{}{}", origin, href)
    } else if href.starts_with("http") || href.starts_with("data:") {
        href.to_string()
    } else {
        format!("{}/{}", origin, href)
    }
}

/// Resolve an `og:image` value against the page origin
///
/// Only root-relative paths are rewritten; everything else is kept verbatim.
pub fn resolve_og_image(origin: &str, src: &str) -> String {
    if src.starts_with('/') && !src.starts_with("//") {
        format!("{}{}", origin, src)
    } else {
        src.to_string()
    }
}

/// First segment of a title like `Acme - The best widgets`
fn title_name(title: &str) -> Option<String> {
    title
        .split(TITLE_SEPARATORS)
        .next()
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

fn hostname(origin: &str) -> String {
    Url::parse(origin)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_else(|| origin.to_string())
}

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!("Failed to parse selector '{}': {}", selector, e);
            None
        }
    }
}

fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = parse_selector(selector)?;
    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>())
}

/// Attribute of the first element matching `selector`, if non-blank
fn attr(document: &Html, selector: &str, name: &str) -> Option<String> {
    let selector = parse_selector(selector)?;
    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr(name))
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
}

fn meta_content(document: &Html, selector: &str) -> Option<String> {
    attr(document, selector, "content")
}
