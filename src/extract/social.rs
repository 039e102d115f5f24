use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

/// Social networks whose profile links are collected
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SocialPlatform {
    Facebook,
    Instagram,
    /// Twitter, including `x.com` links
    Twitter,
    LinkedIn,
}

impl SocialPlatform {
    /// All platforms, in the order an href is tested against them
    pub const ALL: [SocialPlatform; 4] = [
        SocialPlatform::Facebook,
        SocialPlatform::Instagram,
        SocialPlatform::Twitter,
        SocialPlatform::LinkedIn,
    ];

    /// Lowercase name used for output columns
    pub fn name(&self) -> &'static str {
        match self {
            Self::Facebook => "facebook",
            Self::Instagram => "instagram",
            Self::Twitter => "twitter",
            Self::LinkedIn => "linkedin",
        }
    }

    fn pattern(&self) -> &'static str {
        match self {
            Self::Facebook => r"https?://(?:www\.|m\.)?facebook\.com/[a-zA-Z0-9_.-]+",
            Self::Instagram => r"https?://(?:www\.)?instagram\.com/[a-zA-Z0-9_.-]+",
            Self::Twitter => r"https?://(?:www\.)?(?:x|twitter)\.com/[a-zA-Z0-9_.-]+",
            Self::LinkedIn => r"https?://(?:[a-z]{2,3}\.|www\.)?linkedin\.com/(?:in|company)/[a-zA-Z0-9_.%-]+",
        }
    }

    fn regex(&self) -> &'static Regex {
        static RES: OnceLock<[Regex; 4]> = OnceLock::new();
        let all = RES.get_or_init(|| {
            SocialPlatform::ALL.map(|platform| {
                Regex::new(platform.pattern()).expect("social pattern is valid")
            })
        });
        &all[*self as usize]
    }

    /// Returns true if the href points at a profile on this platform
    pub fn matches(&self, href: &str) -> bool {
        self.regex().is_match(href)
    }

    /// The first platform whose pattern matches the href
    pub fn detect(href: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|platform| platform.matches(href))
    }
}

impl fmt::Display for SocialPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One profile URL per platform; the first one recorded is kept
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocialLinks {
    links: BTreeMap<SocialPlatform, String>,
}

impl SocialLinks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `url` for `platform` unless one is already present
    ///
    /// Returns true if the link was stored.
    pub fn record(&mut self, platform: SocialPlatform, url: impl Into<String>) -> bool {
        if self.links.contains_key(&platform) {
            return false;
        }
        self.links.insert(platform, url.into());
        true
    }

    /// Takes every platform from `other` that is still missing here
    pub fn merge_missing(&mut self, other: &SocialLinks) {
        for (platform, url) in &other.links {
            self.record(*platform, url.as_str());
        }
    }

    pub fn get(&self, platform: SocialPlatform) -> Option<&str> {
        self.links.get(&platform).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SocialPlatform, &str)> {
        self.links.iter().map(|(p, url)| (*p, url.as_str()))
    }
}
