//! In-memory corpus API and canned DraCor responses for unit tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::dracor_client::{ApiError, Body, CorpusApi, Endpoint};

/// Answers from a table keyed by [`Endpoint::describe`]. Unknown endpoints
/// answer 404 like the remote API does.
#[derive(Debug, Clone, Default)]
pub struct MockCorpusApi {
    responses: HashMap<String, Result<Body, ApiError>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockCorpusApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json(mut self, endpoint: Endpoint, value: Value) -> Self {
        self.responses
            .insert(endpoint.describe(), Ok(Body::Json(value)));
        self
    }

    pub fn with_text(mut self, endpoint: Endpoint, text: &str) -> Self {
        self.responses
            .insert(endpoint.describe(), Ok(Body::Text(text.to_string())));
        self
    }

    pub fn with_error(mut self, key: String, error: ApiError) -> Self {
        self.responses.insert(key, Err(error));
        self
    }

    pub fn without(mut self, key: String) -> Self {
        self.responses.remove(&key);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl CorpusApi for MockCorpusApi {
    async fn call(&self, endpoint: &Endpoint) -> Result<Body, ApiError> {
        let key = endpoint.describe();
        self.calls.lock().expect("calls lock").push(key.clone());

        match self.responses.get(&key) {
            Some(response) => response.clone(),
            None => Err(ApiError::NotFound {
                path: key,
                message: "no such resource".to_string(),
            }),
        }
    }
}

pub mod fixtures {
    use serde_json::{json, Value};

    use super::MockCorpusApi;
    use crate::domain::endpoints::{self, NetworkExport, SpokenTextFilter};

    pub const FAUST: &str = "goethe-faust-eine-tragoedie";
    pub const RAEUBER: &str = "schiller-die-raeuber";
    pub const HAMLET: &str = "shakespeare-hamlet";

    pub const FAUST_SPOKEN_TEXT: &str = "Habe nun, ach! Philosophie,\nJuristerei und";
    pub const FAUST_STAGE_DIRECTIONS: &str = "Hochgewölbtes gotisches Zimmer.";
    pub const FAUST_NETWORK_CSV: &str = "Source,Type,Target,Weight\n\
        faust,Undirected,mephistopheles,24\n\
        faust,Undirected,margarete,11\n\
        wagner,Undirected,faust,3\n";
    pub const FAUST_RELATIONS_CSV: &str =
        "Source,Type,Target,Label\nfaust,Directed,margarete,lover_of\n";
    pub const FAUST_TEI: &str = r##"<TEI xmlns="http://www.tei-c.org/ns/1.0">
  <teiHeader><fileDesc><titleStmt>
    <title type="main">Faust</title>
    <author>Goethe, Johann Wolfgang</author>
  </titleStmt></fileDesc></teiHeader>
  <text><body>
    <div type="act">
      <div type="scene"><head>Nacht</head>
        <stage>Hochgewölbtes gotisches Zimmer.</stage>
        <sp who="#faust"><speaker>FAUST</speaker><l>Habe nun, ach! Philosophie,</l></sp>
        <sp who="#wagner"><speaker>WAGNER</speaker><p>Verzeiht!</p></sp>
      </div>
    </div>
  </body></text>
</TEI>"##;

    fn faust_listing() -> Value {
        json!({
            "name": FAUST,
            "title": "Faust. Eine Tragödie",
            "subtitle": "Der Tragödie erster Teil",
            "authors": [{ "name": "Goethe, Johann Wolfgang" }],
            "yearNormalized": 1808,
            "yearWritten": "1806",
            "writtenIn": "Weimar",
            "originalLanguage": "ger",
            "wikidataId": "Q131008"
        })
    }

    fn raeuber_listing() -> Value {
        json!({
            "name": RAEUBER,
            "title": "Die Räuber",
            "subtitle": "Ein Schauspiel",
            "authors": [{ "name": "Schiller, Friedrich" }],
            "yearNormalized": 1781,
            "originalLanguage": "ger"
        })
    }

    fn hamlet_listing() -> Value {
        json!({
            "name": HAMLET,
            "title": "Hamlet, Prince of Denmark",
            "authors": [{ "name": "Shakespeare, William" }],
            "yearNormalized": 1603,
            "originalLanguage": "eng"
        })
    }

    fn character(id: &str, name: &str, gender: &str, words: u64) -> Value {
        json!({
            "id": id,
            "name": name,
            "gender": gender,
            "numOfWords": words,
            "numOfSpeechActs": words / 10,
            "numOfScenes": 1
        })
    }

    fn faust_characters() -> Value {
        json!([
            character("faust", "Faust", "MALE", 600),
            character("mephistopheles", "Mephistopheles", "MALE", 250),
            character("wagner", "Wagner", "MALE", 50),
            character("margarete", "Margarete", "FEMALE", 100),
        ])
    }

    fn raeuber_characters() -> Value {
        json!([
            character("karl_moor", "Karl Moor", "MALE", 900),
            character("franz_moor", "Franz Moor", "MALE", 800),
            character("amalia", "Amalia", "FEMALE", 300),
            character("spiegelberg", "Spiegelberg", "MALE", 200),
            character("maximilian", "Maximilian", "MALE", 100),
        ])
    }

    fn hamlet_characters() -> Value {
        json!([
            character("hamlet", "Hamlet", "MALE", 1500),
            character("ophelia", "Ophelia", "FEMALE", 200),
        ])
    }

    fn with_details(listing: Value, characters: Value, segments: Value) -> Value {
        let mut play = listing;
        play["characters"] = characters;
        play["segments"] = segments;
        play
    }

    /// DraCor answers for two German plays and one Shakespeare play.
    pub fn corpus_api() -> MockCorpusApi {
        MockCorpusApi::new()
            .with_json(
                endpoints::info(),
                json!({ "name": "DraCor API", "version": "1.0.0" }),
            )
            .with_json(
                endpoints::corpora(),
                json!([
                    { "name": "ger", "title": "German Drama Corpus" },
                    { "name": "shake", "title": "Shakespeare Drama Corpus" }
                ]),
            )
            .with_json(
                endpoints::corpus("ger"),
                json!({
                    "name": "ger",
                    "title": "German Drama Corpus",
                    "plays": [faust_listing(), raeuber_listing()]
                }),
            )
            .with_json(
                endpoints::corpus("shake"),
                json!({
                    "name": "shake",
                    "title": "Shakespeare Drama Corpus",
                    "plays": [hamlet_listing()]
                }),
            )
            .with_json(
                endpoints::corpus_metadata("ger"),
                json!([
                    { "name": FAUST, "size": 4 },
                    { "name": RAEUBER, "size": 5 }
                ]),
            )
            .with_json(
                endpoints::play("ger", FAUST),
                with_details(
                    faust_listing(),
                    faust_characters(),
                    json!([
                        { "type": "act", "number": 1, "title": "Erster Akt" },
                        { "type": "scene", "number": 1, "title": "Nacht", "speakers": ["faust", "wagner"] },
                        { "type": "scene", "number": 2, "title": "Vor dem Tor", "speakers": ["faust"] }
                    ]),
                ),
            )
            .with_json(
                endpoints::play("ger", RAEUBER),
                with_details(raeuber_listing(), raeuber_characters(), json!([])),
            )
            .with_json(
                endpoints::play("shake", HAMLET),
                with_details(hamlet_listing(), hamlet_characters(), json!([])),
            )
            .with_json(endpoints::characters("ger", FAUST), faust_characters())
            .with_json(endpoints::characters("ger", RAEUBER), raeuber_characters())
            .with_json(endpoints::characters("shake", HAMLET), hamlet_characters())
            .with_json(
                endpoints::play_metrics("ger", FAUST),
                json!({
                    "size": 4,
                    "density": 0.5,
                    "segments": 3,
                    "dialogues": 12,
                    "maxDegree": 3,
                    "wikipediaLinkCount": 42
                }),
            )
            .with_json(
                endpoints::play_metrics("ger", RAEUBER),
                json!({
                    "size": 5,
                    "density": 0.6,
                    "segments": 15,
                    "dialogues": 40,
                    "maxDegree": 4
                }),
            )
            .with_text(
                endpoints::network_data("ger", FAUST, NetworkExport::Csv),
                FAUST_NETWORK_CSV,
            )
            .with_text(
                endpoints::network_data("ger", FAUST, NetworkExport::Gexf),
                "<gexf/>",
            )
            .with_text(endpoints::relations_csv("ger", FAUST), FAUST_RELATIONS_CSV)
            .with_json(
                endpoints::relations("ger", FAUST),
                json!([{ "source": "faust", "target": "margarete", "type": "lover_of" }]),
            )
            .with_text(
                endpoints::spoken_text("ger", FAUST, &SpokenTextFilter::default()),
                FAUST_SPOKEN_TEXT,
            )
            .with_text(
                endpoints::spoken_text(
                    "ger",
                    FAUST,
                    &SpokenTextFilter {
                        gender: Some("FEMALE".to_string()),
                        ..SpokenTextFilter::default()
                    },
                ),
                "Mein Ruh ist hin",
            )
            .with_json(
                endpoints::spoken_text_by_character("ger", FAUST),
                json!([{ "id": "faust", "text": ["Habe nun, ach!"] }]),
            )
            .with_text(
                endpoints::stage_directions("ger", FAUST),
                FAUST_STAGE_DIRECTIONS,
            )
            .with_text(endpoints::tei("ger", FAUST), FAUST_TEI)
            .with_json(
                endpoints::plays_with_character("Q131008"),
                json!([{ "name": FAUST, "corpus": "ger" }]),
            )
    }
}
