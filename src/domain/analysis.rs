//! Composite operations built from several DraCor calls
//!
//! Calls run one after another and the first failure aborts the whole
//! operation. Derived values are computed only from responses already in
//! hand; nothing here keeps state between invocations.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use serde_json::Value;

use crate::domain::{
    endpoints,
    models::{decode, Character, Corpus, CorpusSummary, PlayRecord},
    text::{combine_full_text, parse_network_csv, parse_relations_csv, summarize_tei, text_stats, TeiSummary},
    utils::{
        contains_ignore_case, play_link, round2, GenderBalance, RELATIONS_LIMIT,
        SPEAKING_DISTRIBUTION_LIMIT, TOP_RESULTS_LIMIT,
    },
};
use crate::dracor_client::{fetch_json, fetch_text, ApiError, CorpusApi, Endpoint};
use crate::errors::AppError;

/// Corpus and play identifiers of one play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayId {
    pub corpus: String,
    pub play: String,
}

impl PlayId {
    pub fn new(corpus: impl Into<String>, play: impl Into<String>) -> Self {
        Self {
            corpus: corpus.into(),
            play: play.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaySummary {
    pub corpus: String,
    pub name: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<i64>,
}

impl PlaySummary {
    fn from_record(id: &PlayId, play: &PlayRecord) -> Self {
        Self {
            corpus: id.corpus.clone(),
            name: id.play.clone(),
            title: play.title.clone(),
            author: play.first_author().map(str::to_string),
            year: play.year_normalized,
        }
    }
}

async fn fetch_record<T>(api: &dyn CorpusApi, endpoint: Endpoint) -> Result<T, ApiError>
where
    T: serde::de::DeserializeOwned,
{
    let value = fetch_json(api, &endpoint).await?;
    decode(&endpoint, value)
}

async fn fetch_play(api: &dyn CorpusApi, id: &PlayId) -> Result<PlayRecord, ApiError> {
    fetch_record(api, endpoints::play(&id.corpus, &id.play)).await
}

async fn fetch_characters(api: &dyn CorpusApi, id: &PlayId) -> Result<Vec<Character>, ApiError> {
    fetch_record(api, endpoints::characters(&id.corpus, &id.play)).await
}

async fn fetch_metrics(api: &dyn CorpusApi, id: &PlayId) -> Result<Value, ApiError> {
    fetch_json(api, &endpoints::play_metrics(&id.corpus, &id.play)).await
}

// -----------------------------------------------------------------------------
// compare_plays
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparedPlay {
    #[serde(flatten)]
    pub summary: PlaySummary,
    pub character_count: usize,
    pub metrics: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricComparison {
    pub metric: String,
    pub values: [f64; 2],
    pub absolute_difference: f64,
    /// Smaller value divided by the larger one, absent when the larger is 0.
    pub ratio: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayComparison {
    pub plays: [ComparedPlay; 2],
    pub metric_comparison: Vec<MetricComparison>,
    pub metrics_only_in: [Vec<String>; 2],
}

pub async fn compare_plays(
    api: &dyn CorpusApi,
    first: &PlayId,
    second: &PlayId,
) -> Result<PlayComparison, AppError> {
    let first_play = fetch_play(api, first).await?;
    let second_play = fetch_play(api, second).await?;
    let first_metrics = fetch_metrics(api, first).await?;
    let second_metrics = fetch_metrics(api, second).await?;

    let (metric_comparison, metrics_only_in) = compare_metrics(&first_metrics, &second_metrics);

    Ok(PlayComparison {
        plays: [
            ComparedPlay {
                summary: PlaySummary::from_record(first, &first_play),
                character_count: first_play.characters.len(),
                metrics: first_metrics,
            },
            ComparedPlay {
                summary: PlaySummary::from_record(second, &second_play),
                character_count: second_play.characters.len(),
                metrics: second_metrics,
            },
        ],
        metric_comparison,
        metrics_only_in,
    })
}

/// Pairs up numeric top-level metrics and lists the keys each side lacks.
pub fn compare_metrics(first: &Value, second: &Value) -> (Vec<MetricComparison>, [Vec<String>; 2]) {
    let numeric = |value: &Value| -> BTreeMap<String, f64> {
        value
            .as_object()
            .map(|object| {
                object
                    .iter()
                    .filter_map(|(key, item)| item.as_f64().map(|number| (key.clone(), number)))
                    .collect()
            })
            .unwrap_or_default()
    };
    let keys = |value: &Value| -> Vec<String> {
        let mut keys: Vec<String> = value
            .as_object()
            .map(|object| object.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    };

    let first_numeric = numeric(first);
    let second_numeric = numeric(second);

    let comparisons = first_numeric
        .iter()
        .filter_map(|(metric, left)| {
            let right = *second_numeric.get(metric)?;
            let (smaller, larger) = if *left <= right {
                (*left, right)
            } else {
                (right, *left)
            };
            Some(MetricComparison {
                metric: metric.clone(),
                values: [*left, right],
                absolute_difference: (left - right).abs(),
                ratio: (larger > 0.0).then(|| smaller / larger),
            })
        })
        .collect();

    let first_keys = keys(first);
    let second_keys = keys(second);
    let only_first = first_keys
        .iter()
        .filter(|key| !second_keys.contains(key))
        .cloned()
        .collect();
    let only_second = second_keys
        .iter()
        .filter(|key| !first_keys.contains(key))
        .cloned()
        .collect();

    (comparisons, [only_first, only_second])
}

// -----------------------------------------------------------------------------
// analyze_character_relations
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeightedRelation {
    pub source: String,
    pub source_id: String,
    pub target: String,
    pub target_id: String,
    pub weight: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedRelation {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub relation_type: String,
    pub directed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterRelations {
    pub play: PlaySummary,
    pub total_characters: usize,
    pub total_relations: usize,
    pub strongest_relations: Vec<WeightedRelation>,
    pub weakest_relations: Vec<WeightedRelation>,
    pub formal_relations: Vec<NamedRelation>,
    pub metrics: Value,
}

pub async fn analyze_character_relations(
    api: &dyn CorpusApi,
    id: &PlayId,
) -> Result<CharacterRelations, AppError> {
    let play = fetch_play(api, id).await?;
    let characters = fetch_characters(api, id).await?;
    let network_csv = fetch_text(
        api,
        &endpoints::network_data(&id.corpus, &id.play, endpoints::NetworkExport::Csv),
    )
    .await?;

    // Plays without annotated relations answer 404 here.
    let relations_csv = match fetch_text(api, &endpoints::relations_csv(&id.corpus, &id.play)).await
    {
        Ok(text) => Some(text),
        Err(ApiError::NotFound { .. }) => None,
        Err(err) => return Err(err.into()),
    };
    let metrics = fetch_metrics(api, id).await?;

    let names: HashMap<&str, &str> = characters
        .iter()
        .filter_map(|character| Some((character.id.as_deref()?, character.name.as_deref()?)))
        .collect();
    let display_name = |id: &str| names.get(id).copied().unwrap_or(id).to_string();

    let mut relations: Vec<WeightedRelation> = parse_network_csv(&network_csv)
        .edges
        .into_iter()
        .map(|edge| WeightedRelation {
            source: display_name(&edge.source),
            target: display_name(&edge.target),
            source_id: edge.source,
            target_id: edge.target,
            weight: edge.weight,
        })
        .collect();
    relations.sort_by(|left, right| right.weight.cmp(&left.weight));

    let formal_relations = relations_csv
        .as_deref()
        .map(parse_relations_csv)
        .unwrap_or_default()
        .into_iter()
        .map(|relation| NamedRelation {
            source: display_name(&relation.source),
            target: display_name(&relation.target),
            relation_type: relation.label,
            directed: relation.kind.eq_ignore_ascii_case("directed"),
        })
        .collect();

    let strongest_relations = relations.iter().take(RELATIONS_LIMIT).cloned().collect();
    let weakest_relations = relations[relations.len().saturating_sub(RELATIONS_LIMIT)..].to_vec();

    Ok(CharacterRelations {
        play: PlaySummary::from_record(id, &play),
        total_characters: characters.len(),
        total_relations: relations.len(),
        strongest_relations,
        weakest_relations,
        formal_relations,
        metrics,
    })
}

// -----------------------------------------------------------------------------
// analyze_play_structure
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActEntry {
    pub number: Option<Value>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneEntry {
    pub number: Option<Value>,
    pub title: Option<String>,
    pub speakers: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenderCounts {
    #[serde(rename = "MALE")]
    pub male: usize,
    #[serde(rename = "FEMALE")]
    pub female: usize,
    #[serde(rename = "UNKNOWN")]
    pub unknown: usize,
}

impl GenderCounts {
    pub fn count(characters: &[Character]) -> Self {
        let mut counts = Self::default();
        for character in characters {
            match character.gender.as_deref() {
                Some("MALE") => counts.male += 1,
                Some("FEMALE") => counts.female += 1,
                Some("UNKNOWN") => counts.unknown += 1,
                _ => {}
            }
        }
        counts
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CastSummary {
    pub total: usize,
    pub by_gender: GenderCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeakingShare {
    pub character: Option<String>,
    pub words: i64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayStructure {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub year: Option<i64>,
    pub year_written: Option<i64>,
    pub year_printed: Option<i64>,
    pub year_premiered: Option<i64>,
    pub acts: Vec<ActEntry>,
    pub scenes: Vec<SceneEntry>,
    pub num_of_acts: usize,
    pub num_of_scenes: usize,
    pub segments: Value,
    pub dialogues: Value,
    pub word_count: i64,
    pub characters: CastSummary,
    pub speaking_distribution: Vec<SpeakingShare>,
}

pub async fn analyze_play_structure(
    api: &dyn CorpusApi,
    id: &PlayId,
) -> Result<PlayStructure, AppError> {
    let play = fetch_play(api, id).await?;
    let metrics = fetch_metrics(api, id).await?;
    let characters = fetch_characters(api, id).await?;

    Ok(build_play_structure(play, &metrics, &characters))
}

pub fn build_play_structure(
    play: PlayRecord,
    metrics: &Value,
    characters: &[Character],
) -> PlayStructure {
    let mut acts = Vec::new();
    let mut scenes = Vec::new();
    for segment in &play.segments {
        match segment.kind.as_deref() {
            Some("act") => acts.push(ActEntry {
                number: segment.number.clone(),
                title: segment.title.clone(),
            }),
            Some("scene") => scenes.push(SceneEntry {
                number: segment.number.clone(),
                title: segment.title.clone(),
                speakers: segment.speakers.clone(),
            }),
            _ => {}
        }
    }

    let word_count: i64 = characters
        .iter()
        .map(|character| character.num_of_words.unwrap_or(0))
        .sum();

    let mut speaking_distribution: Vec<SpeakingShare> = if word_count > 0 {
        characters
            .iter()
            .map(|character| {
                let words = character.num_of_words.unwrap_or(0);
                SpeakingShare {
                    character: character.name.clone(),
                    words,
                    percentage: round2(words as f64 / word_count as f64 * 100.0),
                }
            })
            .collect()
    } else {
        Vec::new()
    };
    speaking_distribution.sort_by(|left, right| right.words.cmp(&left.words));
    speaking_distribution.truncate(SPEAKING_DISTRIBUTION_LIMIT);

    PlayStructure {
        authors: play.author_names(),
        title: play.title,
        year: play.year_normalized,
        year_written: play.year_written,
        year_printed: play.year_printed,
        year_premiered: play.year_premiered,
        num_of_acts: acts.len(),
        num_of_scenes: scenes.len(),
        acts,
        scenes,
        segments: metrics.get("segments").cloned().unwrap_or(Value::Null),
        dialogues: metrics.get("dialogues").cloned().unwrap_or(Value::Null),
        word_count,
        characters: CastSummary {
            total: characters.len(),
            by_gender: GenderCounts::count(characters),
        },
        speaking_distribution,
    }
}

// -----------------------------------------------------------------------------
// analyze_full_text
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FullTextStats {
    pub text_length: usize,
    pub word_count: usize,
    pub line_count: usize,
    pub dialogue_word_count: usize,
    pub stage_direction_word_count: usize,
    /// Dialogue words per stage-direction word, absent without stage directions.
    pub dialogue_to_direction_ratio: Option<f64>,
    pub character_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FullTextAnalysis {
    pub play: PlaySummary,
    pub characters: Vec<Character>,
    pub text: String,
    pub tei_analysis: TeiSummary,
    pub analysis: FullTextStats,
}

pub async fn analyze_full_text(
    api: &dyn CorpusApi,
    id: &PlayId,
) -> Result<FullTextAnalysis, AppError> {
    let tei = fetch_text(api, &endpoints::tei(&id.corpus, &id.play)).await?;
    let spoken_text = fetch_text(
        api,
        &endpoints::spoken_text(&id.corpus, &id.play, &endpoints::SpokenTextFilter::default()),
    )
    .await?;
    let stage_directions =
        fetch_text(api, &endpoints::stage_directions(&id.corpus, &id.play)).await?;
    let play = fetch_play(api, id).await?;
    let characters = fetch_characters(api, id).await?;

    let text = combine_full_text(&spoken_text, &stage_directions);
    let overall = text_stats(&text);
    let dialogue_words = text_stats(&spoken_text).words;
    let direction_words = text_stats(&stage_directions).words;

    Ok(FullTextAnalysis {
        play: PlaySummary::from_record(id, &play),
        analysis: FullTextStats {
            text_length: overall.characters,
            word_count: overall.words,
            line_count: overall.lines,
            dialogue_word_count: dialogue_words,
            stage_direction_word_count: direction_words,
            dialogue_to_direction_ratio: (direction_words > 0)
                .then(|| round2(dialogue_words as f64 / direction_words as f64)),
            character_count: characters.len(),
        },
        tei_analysis: summarize_tei(&tei),
        characters,
        text,
    })
}

// -----------------------------------------------------------------------------
// find_character_across_plays
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterMatch {
    pub corpus: String,
    pub play_name: String,
    pub play_title: Option<String>,
    pub character_id: Option<String>,
    pub character: Option<String>,
    pub gender: Option<String>,
    pub num_of_speech_acts: Option<i64>,
    pub num_of_words: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterSearch {
    pub character_name: String,
    pub corpora_searched: Vec<String>,
    pub count: usize,
    pub matches: Vec<CharacterMatch>,
}

pub async fn find_character_across_plays(
    api: &dyn CorpusApi,
    character_name: &str,
    corpus_name: Option<&str>,
) -> Result<CharacterSearch, AppError> {
    let corpora = match corpus_name {
        Some(corpus) => vec![corpus.to_string()],
        None => list_corpus_names(api).await?,
    };

    let mut matches = Vec::new();
    for corpus in &corpora {
        let listing: Corpus = fetch_record(api, endpoints::corpus(corpus)).await?;
        for play in &listing.plays {
            let Some(play_name) = play.name.as_deref() else {
                continue;
            };
            let id = PlayId::new(corpus.as_str(), play_name);
            for character in fetch_characters(api, &id).await? {
                let is_match = character
                    .name
                    .as_deref()
                    .is_some_and(|name| contains_ignore_case(name, character_name));
                if is_match {
                    matches.push(CharacterMatch {
                        corpus: corpus.clone(),
                        play_name: play_name.to_string(),
                        play_title: play.title.clone(),
                        character_id: character.id,
                        character: character.name,
                        gender: character.gender,
                        num_of_speech_acts: character.num_of_speech_acts,
                        num_of_words: character.num_of_words,
                    });
                }
            }
        }
    }

    Ok(CharacterSearch {
        character_name: character_name.to_string(),
        corpora_searched: corpora,
        count: matches.len(),
        matches,
    })
}

async fn list_corpus_names(api: &dyn CorpusApi) -> Result<Vec<String>, ApiError> {
    let corpora: Vec<CorpusSummary> = fetch_record(api, endpoints::corpora()).await?;
    Ok(corpora.into_iter().filter_map(|corpus| corpus.name).collect())
}

// -----------------------------------------------------------------------------
// search_plays
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlaySearchParams {
    pub query: Option<String>,
    pub corpus_name: Option<String>,
    pub character_name: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub author: Option<String>,
    pub year_from: Option<i64>,
    pub year_to: Option<i64>,
    #[serde(serialize_with = "serialize_gender_balance")]
    pub gender_filter: Option<GenderBalance>,
}

fn serialize_gender_balance<S>(value: &Option<GenderBalance>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match value {
        Some(balance) => serializer.serialize_str(balance.as_str()),
        None => serializer.serialize_none(),
    }
}

impl PlaySearchParams {
    fn needs_characters(&self) -> bool {
        self.character_name.is_some() || self.gender_filter.is_some()
    }

    /// Filters that only need the play listing itself.
    pub fn matches_listing(&self, play: &PlayRecord) -> bool {
        if let Some(query) = &self.query {
            let searchable = [
                play.title.clone().unwrap_or_default(),
                play.author_names().join(" "),
                play.subtitle.clone().unwrap_or_default(),
                play.original_title.clone().unwrap_or_default(),
            ]
            .join(" ");
            if !contains_ignore_case(&searchable, query) {
                return false;
            }
        }

        if let Some(country) = &self.country {
            let places = [
                play.written_in.clone().unwrap_or_default(),
                play.printed_in.clone().unwrap_or_default(),
                play.author_countries().join(" "),
            ]
            .join(" ");
            if !contains_ignore_case(&places, country) {
                return false;
            }
        }

        if let Some(language) = &self.language {
            let original = play.original_language.as_deref().unwrap_or_default();
            if !contains_ignore_case(original, language) {
                return false;
            }
        }

        if let Some(author) = &self.author {
            if !play
                .author_names()
                .iter()
                .any(|name| contains_ignore_case(name, author))
            {
                return false;
            }
        }

        let year = play.effective_year();
        if self.year_from.is_some_and(|from| year < from) {
            return false;
        }
        if self.year_to.is_some_and(|to| year > to) {
            return false;
        }

        true
    }

    /// Filters that need the play's character list.
    pub fn matches_cast(&self, characters: &[Character]) -> bool {
        if let Some(character_name) = &self.character_name {
            let found = characters.iter().any(|character| {
                character
                    .name
                    .as_deref()
                    .is_some_and(|name| contains_ignore_case(name, character_name))
            });
            if !found {
                return false;
            }
        }

        if let Some(balance) = self.gender_filter {
            let counts = GenderCounts::count(characters);
            if !balance.matches(counts.male, counts.female) {
                return false;
            }
        }

        true
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub corpus: String,
    pub play: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopResult {
    pub corpus: String,
    pub play_name: String,
    pub title: Option<String>,
    pub author: String,
    pub year: Option<i64>,
    pub language: Option<String>,
    pub characters: usize,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaySearch {
    pub count: usize,
    pub results: Vec<SearchHit>,
    pub top_results: Vec<TopResult>,
    pub filters_applied: PlaySearchParams,
}

pub async fn search_plays(
    api: &dyn CorpusApi,
    params: PlaySearchParams,
) -> Result<PlaySearch, AppError> {
    let corpora: Vec<String> = list_corpus_names(api)
        .await?
        .into_iter()
        .filter(|name| {
            params
                .corpus_name
                .as_deref()
                .is_none_or(|wanted| contains_ignore_case(name, wanted))
        })
        .collect();

    let mut results = Vec::new();
    let mut matched_records: Vec<(String, PlayRecord)> = Vec::new();

    for corpus in &corpora {
        let endpoint = endpoints::corpus(corpus);
        let listing = fetch_json(api, &endpoint).await?;
        let plays = listing
            .get("plays")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        for raw_play in plays {
            let play: PlayRecord = decode(&endpoint, raw_play.clone())?;
            if !params.matches_listing(&play) {
                continue;
            }

            if params.needs_characters() {
                let Some(play_name) = play.name.as_deref() else {
                    continue;
                };
                let characters =
                    fetch_characters(api, &PlayId::new(corpus.as_str(), play_name)).await?;
                if !params.matches_cast(&characters) {
                    continue;
                }
            }

            results.push(SearchHit {
                corpus: corpus.clone(),
                play: raw_play,
            });
            matched_records.push((corpus.clone(), play));
        }
    }

    let mut top_results = Vec::new();
    for (corpus, play) in &matched_records {
        if top_results.len() >= TOP_RESULTS_LIMIT {
            break;
        }
        let Some(play_name) = play.name.as_deref() else {
            continue;
        };

        let details = fetch_play(api, &PlayId::new(corpus.as_str(), play_name)).await?;
        top_results.push(TopResult {
            corpus: corpus.clone(),
            play_name: play_name.to_string(),
            title: play.title.clone(),
            author: play.first_author().unwrap_or("Unknown").to_string(),
            year: play.year_normalized,
            language: play.original_language.clone(),
            characters: details.characters.len(),
            link: play_link(corpus, play_name),
        });
    }

    Ok(PlaySearch {
        count: results.len(),
        results,
        top_results,
        filters_applied: params,
    })
}
