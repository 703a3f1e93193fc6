//! Typed views over DraCor JSON records
//!
//! Every field is optional. Numeric fields accept either JSON numbers or
//! numeric strings because the remote API is not consistent about it.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::dracor_client::{ApiError, Endpoint};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CorpusSummary {
    pub name: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Corpus {
    pub name: Option<String>,
    pub title: Option<String>,
    pub plays: Vec<PlayRecord>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Author {
    pub name: Option<String>,
    pub country: Option<String>,
}

/// A play as listed in a corpus or returned by the play endpoint.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayRecord {
    pub name: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub original_title: Option<String>,
    pub authors: Vec<Author>,
    #[serde(deserialize_with = "lenient_i64")]
    pub year_normalized: Option<i64>,
    #[serde(deserialize_with = "lenient_i64")]
    pub year_written: Option<i64>,
    #[serde(deserialize_with = "lenient_i64")]
    pub year_printed: Option<i64>,
    #[serde(deserialize_with = "lenient_i64")]
    pub year_premiered: Option<i64>,
    pub written_in: Option<String>,
    pub printed_in: Option<String>,
    pub original_language: Option<String>,
    pub characters: Vec<Character>,
    pub segments: Vec<Segment>,
}

impl PlayRecord {
    pub fn first_author(&self) -> Option<&str> {
        self.authors.first().and_then(|author| author.name.as_deref())
    }

    pub fn author_names(&self) -> Vec<String> {
        self.authors
            .iter()
            .filter_map(|author| author.name.clone())
            .collect()
    }

    pub fn author_countries(&self) -> Vec<String> {
        self.authors
            .iter()
            .filter_map(|author| author.country.clone())
            .collect()
    }

    /// Normalized year, falling back to the written and printed years.
    pub fn effective_year(&self) -> i64 {
        self.year_normalized
            .or(self.year_written)
            .or(self.year_printed)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Character {
    pub id: Option<String>,
    pub name: Option<String>,
    pub gender: Option<String>,
    #[serde(deserialize_with = "lenient_i64")]
    pub num_of_words: Option<i64>,
    #[serde(deserialize_with = "lenient_i64")]
    pub num_of_speech_acts: Option<i64>,
    #[serde(deserialize_with = "lenient_i64")]
    pub num_of_scenes: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Segment {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub number: Option<Value>,
    pub title: Option<String>,
    pub speakers: Vec<Value>,
}

/// One row of the `networkdata/csv` export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkEdge {
    pub source: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub target: String,
    pub weight: u64,
}

/// One row of the `relations/csv` export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormalRelation {
    pub source: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub target: String,
    pub label: String,
}

/// Decodes a JSON body into a typed record, reporting shape mismatches as
/// parse failures of `endpoint`.
pub fn decode<T>(endpoint: &Endpoint, value: Value) -> Result<T, ApiError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_value(value).map_err(|err| ApiError::Parse {
        path: endpoint.describe(),
        format: endpoint.format.as_str(),
        message: format!("unexpected record shape: {err}"),
    })
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_i64))
}

pub fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float.round() as i64)),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn play_record_accepts_string_years() {
        let play: PlayRecord = serde_json::from_value(json!({
            "name": "goethe-faust-eine-tragoedie",
            "title": "Faust",
            "authors": [{ "name": "Goethe, Johann Wolfgang", "key": "Q5879" }],
            "yearNormalized": 1808,
            "yearWritten": "1806",
            "yearPrinted": null,
            "wikidataId": "Q131008"
        }))
        .expect("play should decode");

        assert_eq!(play.year_normalized, Some(1808));
        assert_eq!(play.year_written, Some(1806));
        assert_eq!(play.year_printed, None);
        assert_eq!(play.first_author(), Some("Goethe, Johann Wolfgang"));
        assert!(play.characters.is_empty());
    }

    #[test]
    fn effective_year_falls_back_in_order() {
        let play = PlayRecord {
            year_written: Some(1600),
            year_printed: Some(1603),
            ..PlayRecord::default()
        };
        assert_eq!(play.effective_year(), 1600);
        assert_eq!(PlayRecord::default().effective_year(), 0);
    }

    #[test]
    fn character_missing_fields_are_none() {
        let character: Character =
            serde_json::from_value(json!({ "id": "faust" })).expect("character should decode");
        assert_eq!(character.id.as_deref(), Some("faust"));
        assert!(character.name.is_none());
        assert!(character.num_of_words.is_none());
    }
}
