use crate::extract::{PageSignals, SocialLinks, SocialPlatform};
use std::collections::BTreeSet;

/// Signals merged across every page fetched for one seed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedResult {
    pub emails: BTreeSet<String>,
    pub phones: BTreeSet<String>,
    pub social_links: SocialLinks,
}

impl AggregatedResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one page into the result
    ///
    /// Emails and phones are unioned. A social platform keeps the first URL
    /// recorded for it; later pages never replace it.
    pub fn merge(&mut self, page: PageSignals) {
        self.emails.extend(page.emails);
        self.phones.extend(page.phones);
        self.social_links.merge_missing(&page.social_links);
    }

    pub fn social(&self, platform: SocialPlatform) -> Option<&str> {
        self.social_links.get(platform)
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.phones.is_empty() && self.social_links.is_empty()
    }

    /// Emails joined for display, in sorted order
    pub fn emails_joined(&self) -> String {
        join(&self.emails)
    }

    /// Phones joined for display, in sorted order
    pub fn phones_joined(&self) -> String {
        join(&self.phones)
    }
}

fn join(values: &BTreeSet<String>) -> String {
    values
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
