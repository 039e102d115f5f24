use regex::{Captures, Regex};
use std::fmt;
use std::sync::OnceLock;

/// Optional country code, optional area code (parens allowed), then a
/// three-digit exchange and four-digit line number. Separators are `-`, `.`,
/// a space or a tab and may be omitted. Digits are ASCII only.
const PHONE_PATTERN: &str = r"(?:(?P<country>\+[0-9]{1,3})[-. \t]?)?(?:\(?(?P<area>[0-9]{3})\)?[-. \t]?)?(?P<exchange>[0-9]{3})[-. \t]?(?P<line>[0-9]{4})(?-u:\b)";

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PHONE_PATTERN).expect("phone pattern is valid"))
}

/// A phone number found in page text, split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneMatch {
    pub country_code: Option<String>,
    pub area_code: Option<String>,
    pub exchange: String,
    pub line: String,
}

impl PhoneMatch {
    fn from_captures(caps: &Captures<'_>) -> Option<Self> {
        let group = |name: &str| caps.name(name).map(|m| m.as_str().to_string());
        Some(Self {
            country_code: group("country"),
            area_code: group("area"),
            exchange: group("exchange")?,
            line: group("line")?,
        })
    }

    /// Storage form: the present parts concatenated in order
    pub fn compact(&self) -> String {
        [
            self.country_code.as_deref(),
            self.area_code.as_deref(),
            Some(self.exchange.as_str()),
            Some(self.line.as_str()),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

impl fmt::Display for PhoneMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.compact())
    }
}

/// Finds every phone-shaped number in `text`
pub fn find_phones(text: &str) -> impl Iterator<Item = PhoneMatch> + '_ {
    phone_regex()
        .captures_iter(text)
        .filter_map(|caps| PhoneMatch::from_captures(&caps))
}
