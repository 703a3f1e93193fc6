//! Domain-specific shared validations and small numeric helpers

use crate::errors::AppError;

pub const TOP_RESULTS_LIMIT: usize = 5;
pub const RELATIONS_LIMIT: usize = 10;
pub const SPEAKING_DISTRIBUTION_LIMIT: usize = 10;
pub const VALID_GENDERS: [&str; 3] = ["MALE", "FEMALE", "UNKNOWN"];
pub const DRACOR_WEB_BASE_URL: &str = "https://dracor.org";

/// Trims a required identifier such as a corpus, play or character id.
pub fn require_identifier(field: &'static str, value: &str) -> Result<String, AppError> {
    let normalized = value.trim();
    if normalized.is_empty() {
        return Err(AppError::bad_request(
            "invalid_argument",
            format!("{field} must not be empty"),
        ));
    }

    Ok(normalized.to_string())
}

pub fn normalize_optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn normalize_gender(gender: Option<String>) -> Result<Option<String>, AppError> {
    let Some(value) = normalize_optional_text(gender) else {
        return Ok(None);
    };

    let normalized = value.to_ascii_uppercase();
    if !VALID_GENDERS.contains(&normalized.as_str()) {
        return Err(AppError::bad_request(
            "invalid_gender",
            "gender must be one of: MALE, FEMALE, UNKNOWN",
        ));
    }

    Ok(Some(normalized))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenderBalance {
    FemaleDominated,
    MaleDominated,
    Balanced,
}

impl GenderBalance {
    pub fn parse(value: Option<String>) -> Result<Option<Self>, AppError> {
        let Some(value) = normalize_optional_text(value) else {
            return Ok(None);
        };

        match value.to_ascii_lowercase().as_str() {
            "female_dominated" => Ok(Some(Self::FemaleDominated)),
            "male_dominated" => Ok(Some(Self::MaleDominated)),
            "balanced" => Ok(Some(Self::Balanced)),
            _ => Err(AppError::bad_request(
                "invalid_gender_filter",
                "gender_filter must be one of: female_dominated, male_dominated, balanced",
            )),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FemaleDominated => "female_dominated",
            Self::MaleDominated => "male_dominated",
            Self::Balanced => "balanced",
        }
    }

    /// Whether a cast with the given counts satisfies the balance. Casts
    /// without gendered characters always match.
    pub fn matches(self, male: usize, female: usize) -> bool {
        let total = male + female;
        if total == 0 {
            return true;
        }

        let female_ratio = female as f64 / total as f64;
        match self {
            Self::FemaleDominated => female_ratio > 0.5,
            Self::MaleDominated => female_ratio < 0.5,
            Self::Balanced => (0.4..=0.6).contains(&female_ratio),
        }
    }
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn play_link(corpus: &str, play: &str) -> String {
    format!("{DRACOR_WEB_BASE_URL}/{corpus}/{play}")
}
