//! Contact signal extraction
//!
//! Turns the markup of one fetched page into [`PageSignals`]:
//! - email addresses found in the visible text
//! - phone numbers found in the visible text
//! - social profile links found in anchors, preferring the page footer
//!
//! Extraction is a pure function of the markup. Broken HTML is parsed as far as
//! the parser can go; whatever cannot be understood simply contributes nothing.

mod phone;
mod social;
mod text;

pub use phone::{find_phones, PhoneMatch};
pub use social::{SocialLinks, SocialPlatform};
pub use text::visible_text;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeSet;
use std::sync::OnceLock;

const EMAIL_PATTERN: &str = r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}";

/// Regions treated as the site footer
const FOOTER_ANCHORS: &str =
    "footer a[href], [role='contentinfo'] a[href], #footer a[href], .footer a[href]";

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"))
}

/// Signals extracted from a single page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSignals {
    pub emails: BTreeSet<String>,
    pub phones: BTreeSet<String>,
    pub social_links: SocialLinks,
}

impl PageSignals {
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.phones.is_empty() && self.social_links.is_empty()
    }
}

/// Extracts emails, phones and social links from page markup
///
/// # Example
///
/// ```
/// use site_sift::extract::{extract, SocialPlatform};
///
/// let html = r#"<p>Write to x@a.test or call 555-123-4567</p>
///     <footer><a href="https://facebook.com/acme">fb</a></footer>"#;
/// let signals = extract(html);
/// assert!(signals.emails.contains("x@a.test"));
/// assert!(signals.phones.contains("5551234567"));
/// assert_eq!(
///     signals.social_links.get(SocialPlatform::Facebook),
///     Some("https://facebook.com/acme")
/// );
/// ```
pub fn extract(html: &str) -> PageSignals {
    let document = Html::parse_document(html);
    extract_document(&document)
}

/// Same as [`extract`] over an already parsed document
pub fn extract_document(document: &Html) -> PageSignals {
    let text = visible_text(document);

    let emails: BTreeSet<String> = email_regex()
        .find_iter(&text)
        .map(|m| m.as_str().to_string())
        .collect();

    let phones: BTreeSet<String> = find_phones(&text).map(|phone| phone.compact()).collect();

    let social_links = extract_social_links(document);

    tracing::trace!(
        emails = ?emails,
        phones = ?phones,
        social = social_links.len(),
        "extracted page signals"
    );

    PageSignals {
        emails,
        phones,
        social_links,
    }
}

/// Footer anchors are authoritative; the whole page is scanned only when the
/// footer yields no platform at all.
fn extract_social_links(document: &Html) -> SocialLinks {
    if let Ok(footer) = Selector::parse(FOOTER_ANCHORS) {
        let links = collect_social(document.select(&footer));
        if !links.is_empty() {
            return links;
        }
    }

    match Selector::parse("a[href]") {
        Ok(all) => collect_social(document.select(&all)),
        Err(_) => SocialLinks::new(),
    }
}

fn collect_social<'a>(anchors: impl Iterator<Item = ElementRef<'a>>) -> SocialLinks {
    let mut links = SocialLinks::new();
    for anchor in anchors {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        if let Some(platform) = SocialPlatform::detect(href) {
            links.record(platform, href);
        }
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emails_deduplicated() {
        let html = r#"<p>sales@acme.test</p><p>Again: sales@acme.test, help@acme.test</p>"#;
        let signals = extract(html);
        let emails: Vec<_> = signals.emails.iter().map(String::as_str).collect();
        assert_eq!(emails, vec!["help@acme.test", "sales@acme.test"]);
    }

    #[test]
    fn test_emails_in_scripts_ignored() {
        let html = r#"<script>const a = "bot@acme.test";</script><p>none here</p>"#;
        assert!(extract(html).emails.is_empty());
    }

    #[test]
    fn test_phones_normalized_to_parts() {
        let html = r#"<p>Call (555) 123-4567 or 555.123.4567 or +44 20 7946 0958</p>"#;
        let signals = extract(html);
        assert!(signals.phones.contains("5551234567"));
        assert_eq!(
            signals.phones.iter().filter(|p| p.as_str() == "5551234567").count(),
            1
        );
    }

    #[test]
    fn test_contacts_split_by_inline_tags() {
        let html = "<p>info<span>@</span>acme.test</p><p>Call <b>555</b>-123-4567</p>";
        let signals = extract(html);
        assert!(signals.emails.contains("info@acme.test"));
        assert_eq!(
            signals.phones.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["5551234567"]
        );
    }

    #[test]
    fn test_footer_link_wins_over_body() {
        let html = r#"
            <body>
              <a href="https://facebook.com/body-page">Body FB</a>
              <footer><a href="https://facebook.com/footer-page">Footer FB</a></footer>
            </body>
        "#;
        let signals = extract(html);
        assert_eq!(
            signals.social_links.get(SocialPlatform::Facebook),
            Some("https://facebook.com/footer-page")
        );
    }

    #[test]
    fn test_body_fallback_without_footer_matches() {
        let html = r#"
            <body>
              <a href="https://instagram.com/acme">IG</a>
              <footer><a href="/privacy">Privacy</a></footer>
            </body>
        "#;
        let signals = extract(html);
        assert_eq!(
            signals.social_links.get(SocialPlatform::Instagram),
            Some("https://instagram.com/acme")
        );
    }

    #[test]
    fn test_footer_hit_skips_body_scan() {
        let html = r#"
            <body>
              <a href="https://x.com/acme">X</a>
              <div role="contentinfo"><a href="https://linkedin.com/company/acme">In</a></div>
            </body>
        "#;
        let signals = extract(html);
        assert_eq!(signals.social_links.len(), 1);
        assert!(signals.social_links.get(SocialPlatform::Twitter).is_none());
    }

    #[test]
    fn test_first_anchor_per_platform_wins() {
        let html = r#"
            <footer>
              <a href="https://twitter.com/first">1</a>
              <a href="https://x.com/second">2</a>
            </footer>
        "#;
        let signals = extract(html);
        assert_eq!(
            signals.social_links.get(SocialPlatform::Twitter),
            Some("https://twitter.com/first")
        );
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let html = r#"
            <p>x@a.test 555-123-4567</p>
            <footer><a href="https://facebook.com/a">f</a></footer>
        "#;
        assert_eq!(extract(html), extract(html));
    }

    #[test]
    fn test_malformed_markup_degrades() {
        let html = "<html><body><p>hi@a.test<div><<<</footer><a href=";
        let signals = extract(html);
        assert!(signals.emails.contains("hi@a.test"));
        assert!(signals.social_links.is_empty());
    }

    #[test]
    fn test_empty_markup() {
        assert!(extract("").is_empty());
    }
}
