use anyhow::{bail, Result};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Federation {
    #[default]
    Ipf,
    Uspal,
    Rps,
    Spf,
    Ipa,
    Nasa,
}

impl Federation {
    pub const ALL: [Federation; 6] = [
        Federation::Ipf,
        Federation::Uspal,
        Federation::Rps,
        Federation::Spf,
        Federation::Ipa,
        Federation::Nasa,
    ];

    pub fn parse(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        match Self::ALL.iter().find(|f| f.code() == upper) {
            Some(f) => Ok(*f),
            None => bail!(
                "Unknown federation '{}' (expected one of {})",
                s,
                Self::ALL.map(|f| f.code()).join(", ")
            ),
        }
    }

    /// Like [`Federation::parse`] but falls back to IPF for unknown names.
    pub fn parse_or_default(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }

    pub fn code(&self) -> &'static str {
        match self {
            Federation::Ipf => "IPF",
            Federation::Uspal => "USPAL",
            Federation::Rps => "RPS",
            Federation::Spf => "SPF",
            Federation::Ipa => "IPA",
            Federation::Nasa => "NASA",
        }
    }

    /// Technical rules / rulebook page
    pub fn rules_url(&self) -> &'static str {
        match self {
            Federation::Ipf => "https://www.powerlifting.sport/rules/codes/info/technical-rules",
            Federation::Uspal => "https://www.usapowerlifting.com/rules-bylaws/",
            Federation::Rps => "https://www.revolutionpowerlifting.com/rulebook/",
            Federation::Spf => "https://www.southernpowerlifting.com/spf-rule-book/",
            Federation::Ipa => "https://ipapower.com/ipa-rules/",
            Federation::Nasa => "https://nasa-sports.com/rulebook/",
        }
    }
}

impl fmt::Display for Federation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
