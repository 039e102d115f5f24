use scraper::{Html, Selector};
use std::collections::BTreeSet;
use url::Url;

/// Network location of a URL: lowercase host plus explicit port
///
/// Default ports are elided by the `url` crate, so `https://a.test:443/` and
/// `https://a.test/` share a location.
pub fn network_location(url: &Url) -> Option<(String, Option<u16>)> {
    url.host_str().map(|h| (h.to_lowercase(), url.port()))
}

/// Collects every anchor target that stays on the base URL's host
///
/// Each `href` is resolved against `base`. Only `http`/`https` results whose
/// network location equals the base's are kept, with the fragment stripped.
/// External hosts and `mailto:`, `tel:`, `javascript:` targets are dropped.
/// Missing or blank hrefs are skipped, and unparseable markup simply yields
/// fewer links.
///
/// # Example
///
/// ```
/// use site_sift::url::same_origin_links;
/// use url::Url;
///
/// let base = Url::parse("https://site.example.com").unwrap();
/// let html = r#"<a href="https://other.example.com/x">x</a><a href="/y">y</a>"#;
/// let links = same_origin_links(html, &base);
/// assert_eq!(links.len(), 1);
/// assert!(links.contains(&Url::parse("https://site.example.com/y").unwrap()));
/// ```
pub fn same_origin_links(html: &str, base: &Url) -> BTreeSet<Url> {
    let document = Html::parse_document(html);
    same_origin_links_in(&document, base)
}

/// Same as [`same_origin_links`] over an already parsed document
pub fn same_origin_links_in(document: &Html, base: &Url) -> BTreeSet<Url> {
    let mut links = BTreeSet::new();

    let Some(origin) = network_location(base) else {
        return links;
    };

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if let Some(url) = resolve_same_origin(href, base, &origin) {
            links.insert(url);
        }
    }

    links
}

fn resolve_same_origin(href: &str, base: &Url, origin: &(String, Option<u16>)) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let mut resolved = base.join(href).ok()?;
    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return None;
    }

    if network_location(&resolved).as_ref() != Some(origin) {
        return None;
    }

    resolved.set_fragment(None);
    Some(resolved)
}
