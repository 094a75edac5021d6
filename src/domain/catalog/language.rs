//! Language variant lexicon.
//!
//! Business-tier personalization localizes component copy for the
//! business's declared English variant. Two variants share the American
//! convention (spelling plus month-first dates) and two share the British
//! convention (spelling plus day-first dates). Anything else is rejected
//! with `UnsupportedVariant` rather than silently defaulting.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::DomainError;

/// Spelling/terminology pairs, American form first.
///
/// Longer words are listed before their prefixes so replacement never
/// clobbers a partial match (e.g. "personalized" before "personal").
const LEXICON: &[(&str, &str)] = &[
    ("personalized", "personalised"),
    ("personalize", "personalise"),
    ("optimization", "optimisation"),
    ("optimized", "optimised"),
    ("optimize", "optimise"),
    ("customized", "customised"),
    ("customize", "customise"),
    ("analyzed", "analysed"),
    ("analyze", "analyse"),
    ("colors", "colours"),
    ("color", "colour"),
    ("center", "centre"),
    ("program", "programme"),
    ("inquiry", "enquiry"),
];

/// A supported English language variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LanguageVariant {
    /// United States: American spelling, month-first dates.
    #[serde(rename = "en-US")]
    EnUs,
    /// Philippines: American spelling, month-first dates.
    #[serde(rename = "en-PH")]
    EnPh,
    /// United Kingdom: British spelling, day-first dates.
    #[serde(rename = "en-GB")]
    EnGb,
    /// Australia: British spelling, day-first dates.
    #[serde(rename = "en-AU")]
    EnAu,
}

impl LanguageVariant {
    /// Parses a declared variant, accepting both the BCP 47 tag and the
    /// bare region code the assessment collects ("US", "UK", ...).
    ///
    /// # Errors
    ///
    /// `UnsupportedVariant` for anything outside the four supported
    /// variants, including recognizable-but-unsupported regions like "CA".
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw.trim() {
            "en-US" | "US" | "us" => Ok(Self::EnUs),
            "en-PH" | "PH" | "ph" => Ok(Self::EnPh),
            "en-GB" | "GB" | "gb" | "UK" | "uk" => Ok(Self::EnGb),
            "en-AU" | "AU" | "au" => Ok(Self::EnAu),
            other => Err(DomainError::unsupported_variant(other)),
        }
    }

    /// Returns true if this variant uses British spelling and day-first dates.
    pub fn uses_british_convention(&self) -> bool {
        matches!(self, Self::EnGb | Self::EnAu)
    }

    /// Strftime-style date format for this variant.
    pub fn date_format(&self) -> &'static str {
        if self.uses_british_convention() {
            "%d/%m/%Y"
        } else {
            "%m/%d/%Y"
        }
    }

    /// Localizes text for this variant.
    ///
    /// Catalog copy is authored in American English; British-convention
    /// variants get the lexicon applied, American-convention variants get
    /// the text unchanged.
    pub fn localize(&self, text: &str) -> String {
        if !self.uses_british_convention() {
            return text.to_string();
        }
        let mut out = text.to_string();
        for (american, british) in LEXICON {
            out = out.replace(american, british);
            // Preserve sentence-initial capitalization.
            out = out.replace(&capitalize(american), &capitalize(british));
        }
        out
    }

    /// The BCP 47 tag for this variant.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::EnPh => "en-PH",
            Self::EnGb => "en-GB",
            Self::EnAu => "en-AU",
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

impl fmt::Display for LanguageVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}
