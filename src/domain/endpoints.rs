//! Descriptors for the DraCor API v1 endpoints this server calls

use crate::dracor_client::{Endpoint, ResponseFormat};

pub fn info() -> Endpoint {
    Endpoint::new(["info"], ResponseFormat::Json)
}

pub fn corpora() -> Endpoint {
    Endpoint::new(["corpora"], ResponseFormat::Json)
}

pub fn corpus(corpus: &str) -> Endpoint {
    Endpoint::new(["corpora", corpus], ResponseFormat::Json)
}

pub fn corpus_metadata(corpus: &str) -> Endpoint {
    Endpoint::new(["corpora", corpus, "metadata"], ResponseFormat::Json)
}

pub fn play(corpus: &str, play: &str) -> Endpoint {
    play_endpoint(corpus, play, &[], ResponseFormat::Json)
}

pub fn play_metrics(corpus: &str, play: &str) -> Endpoint {
    play_endpoint(corpus, play, &["metrics"], ResponseFormat::Json)
}

pub fn characters(corpus: &str, play: &str) -> Endpoint {
    play_endpoint(corpus, play, &["characters"], ResponseFormat::Json)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpokenTextFilter {
    pub gender: Option<String>,
    pub relation: Option<String>,
    pub role: Option<String>,
}

pub fn spoken_text(corpus: &str, play: &str, filter: &SpokenTextFilter) -> Endpoint {
    let mut endpoint = play_endpoint(corpus, play, &["spoken-text"], ResponseFormat::Text);
    if let Some(gender) = &filter.gender {
        endpoint = endpoint.with_query("gender", gender.as_str());
    }
    if let Some(relation) = &filter.relation {
        endpoint = endpoint.with_query("relation", relation.as_str());
    }
    if let Some(role) = &filter.role {
        endpoint = endpoint.with_query("role", role.as_str());
    }
    endpoint
}

pub fn spoken_text_by_character(corpus: &str, play: &str) -> Endpoint {
    play_endpoint(
        corpus,
        play,
        &["spoken-text-by-character"],
        ResponseFormat::Json,
    )
}

pub fn stage_directions(corpus: &str, play: &str) -> Endpoint {
    play_endpoint(corpus, play, &["stage-directions"], ResponseFormat::Text)
}

/// Serializations of the character network offered by the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkExport {
    Csv,
    Gexf,
    Graphml,
}

impl NetworkExport {
    fn segment(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Gexf => "gexf",
            Self::Graphml => "graphml",
        }
    }

    fn format(self) -> ResponseFormat {
        match self {
            Self::Csv => ResponseFormat::Csv,
            Self::Gexf | Self::Graphml => ResponseFormat::Xml,
        }
    }
}

pub fn network_data(corpus: &str, play: &str, export: NetworkExport) -> Endpoint {
    play_endpoint(
        corpus,
        play,
        &["networkdata", export.segment()],
        export.format(),
    )
}

pub fn relations(corpus: &str, play: &str) -> Endpoint {
    play_endpoint(corpus, play, &["relations"], ResponseFormat::Json)
}

pub fn relations_csv(corpus: &str, play: &str) -> Endpoint {
    play_endpoint(corpus, play, &["relations", "csv"], ResponseFormat::Csv)
}

pub fn tei(corpus: &str, play: &str) -> Endpoint {
    play_endpoint(corpus, play, &["tei"], ResponseFormat::Xml)
}

pub fn plays_with_character(wikidata_id: &str) -> Endpoint {
    Endpoint::new(["character", wikidata_id], ResponseFormat::Json)
}

fn play_endpoint(corpus: &str, play: &str, tail: &[&str], format: ResponseFormat) -> Endpoint {
    let segments = ["corpora", corpus, "plays", play]
        .into_iter()
        .chain(tail.iter().copied());
    Endpoint::new(segments, format)
}
