//! Model Context Protocol resource providers
//!
//! Exposes two static resources and a table of URI templates. A URI has the
//! form `scheme://segment/segment[?key=value&...]`; the scheme selects the
//! template and the segments fill its parameters in order.

use rust_mcp_sdk::schema::{
    ListResourceTemplatesResult, ReadResourceContent, ReadResourceRequestParams,
    ReadResourceResult, Resource, ResourceTemplate, TextResourceContents,
};
use percent_encoding::percent_decode_str;
use serde_json::{json, Value};
use tracing::debug;

use crate::domain::{
    analysis::PlayId,
    endpoints::{self, NetworkExport, SpokenTextFilter},
    text::{combine_full_text, parse_network_csv},
    utils::normalize_gender,
};
use crate::dracor_client::{fetch_json, fetch_text, CorpusApi};
use crate::errors::AppError;
use crate::mcp::rpc::{
    app_error_to_json_rpc, json_rpc_error, json_rpc_result, not_found_with_data, INVALID_PARAMS,
};
use crate::AppState;

pub const INFO_RESOURCE_URI: &str = "info://";
pub const CORPORA_RESOURCE_URI: &str = "corpora://";

const JSON_MIME: &str = "application/json";
const TEXT_MIME: &str = "text/plain";
const CSV_MIME: &str = "text/csv";
const XML_MIME: &str = "application/xml";
const GEXF_MIME: &str = "application/gexf+xml";
const GRAPHML_MIME: &str = "application/graphml+xml";

/// One row of the template table.
#[derive(Debug, Clone, Copy)]
pub struct TemplateSpec {
    pub scheme: &'static str,
    pub params: &'static [&'static str],
    pub query: &'static [&'static str],
    pub name: &'static str,
    pub description: &'static str,
    pub mime_type: &'static str,
}

const CORPUS: &[&str] = &["corpus_name"];
const PLAY: &[&str] = &["corpus_name", "play_name"];

pub const RESOURCE_TEMPLATES: &[TemplateSpec] = &[
    TemplateSpec {
        scheme: "corpus",
        params: CORPUS,
        query: &[],
        name: "Corpus",
        description: "Corpus details including its play listing",
        mime_type: JSON_MIME,
    },
    TemplateSpec {
        scheme: "corpus_metadata",
        params: CORPUS,
        query: &[],
        name: "Corpus Metadata",
        description: "Metadata for every play in a corpus",
        mime_type: JSON_MIME,
    },
    TemplateSpec {
        scheme: "plays",
        params: CORPUS,
        query: &[],
        name: "Plays",
        description: "Plays listed in a corpus",
        mime_type: JSON_MIME,
    },
    TemplateSpec {
        scheme: "play",
        params: PLAY,
        query: &[],
        name: "Play",
        description: "Play details",
        mime_type: JSON_MIME,
    },
    TemplateSpec {
        scheme: "play_metrics",
        params: PLAY,
        query: &[],
        name: "Play Metrics",
        description: "Network metrics of a play",
        mime_type: JSON_MIME,
    },
    TemplateSpec {
        scheme: "characters",
        params: PLAY,
        query: &[],
        name: "Characters",
        description: "Characters of a play with speech statistics",
        mime_type: JSON_MIME,
    },
    TemplateSpec {
        scheme: "spoken_text",
        params: PLAY,
        query: &["gender", "relation", "role"],
        name: "Spoken Text",
        description: "Spoken text of a play, optionally filtered by gender, relation or role",
        mime_type: TEXT_MIME,
    },
    TemplateSpec {
        scheme: "spoken_text_by_character",
        params: PLAY,
        query: &[],
        name: "Spoken Text by Character",
        description: "Spoken text of a play grouped by character",
        mime_type: JSON_MIME,
    },
    TemplateSpec {
        scheme: "stage_directions",
        params: PLAY,
        query: &[],
        name: "Stage Directions",
        description: "Stage directions of a play",
        mime_type: TEXT_MIME,
    },
    TemplateSpec {
        scheme: "network_data",
        params: PLAY,
        query: &["format"],
        name: "Network Data",
        description: "Character co-occurrence network as csv, gexf, graphml or json",
        mime_type: CSV_MIME,
    },
    TemplateSpec {
        scheme: "relations",
        params: PLAY,
        query: &[],
        name: "Relations",
        description: "Formal character relations of a play",
        mime_type: JSON_MIME,
    },
    TemplateSpec {
        scheme: "full_text",
        params: PLAY,
        query: &[],
        name: "Full Text",
        description: "Dialogue followed by stage directions",
        mime_type: TEXT_MIME,
    },
    TemplateSpec {
        scheme: "tei_text",
        params: PLAY,
        query: &[],
        name: "TEI Text",
        description: "TEI XML encoding of a play",
        mime_type: XML_MIME,
    },
    TemplateSpec {
        scheme: "character_by_wikidata",
        params: &["wikidata_id"],
        query: &[],
        name: "Plays by Wikidata Character",
        description: "Plays featuring a character identified by Wikidata id",
        mime_type: JSON_MIME,
    },
];

impl TemplateSpec {
    pub fn uri_template(&self) -> String {
        let params = self
            .params
            .iter()
            .map(|param| format!("{{{param}}}"))
            .collect::<Vec<_>>()
            .join("/");
        format!("{}://{params}", self.scheme)
    }
}

pub fn build_resources_list() -> Vec<Resource> {
    vec![
        Resource {
            annotations: None,
            description: Some("DraCor API version and service information".to_string()),
            icons: vec![],
            meta: None,
            mime_type: Some(JSON_MIME.to_string()),
            name: "API Info".to_string(),
            size: None,
            title: None,
            uri: INFO_RESOURCE_URI.to_string(),
        },
        Resource {
            annotations: None,
            description: Some("All corpora available on DraCor".to_string()),
            icons: vec![],
            meta: None,
            mime_type: Some(JSON_MIME.to_string()),
            name: "Corpora".to_string(),
            size: None,
            title: None,
            uri: CORPORA_RESOURCE_URI.to_string(),
        },
    ]
}

pub fn build_resource_templates_list() -> ListResourceTemplatesResult {
    ListResourceTemplatesResult {
        meta: None,
        next_cursor: None,
        resource_templates: RESOURCE_TEMPLATES
            .iter()
            .map(|spec| ResourceTemplate {
                annotations: None,
                description: Some(spec.description.to_string()),
                icons: vec![],
                meta: None,
                mime_type: Some(spec.mime_type.to_string()),
                name: spec.name.to_string(),
                title: None,
                uri_template: spec.uri_template(),
            })
            .collect(),
    }
}

/// Output formats of the `network_data` resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkFormat {
    Export(NetworkExport),
    Json,
}

impl NetworkFormat {
    fn parse(value: Option<&str>) -> Result<Self, AppError> {
        match value.map(str::to_ascii_lowercase).as_deref() {
            None | Some("csv") => Ok(Self::Export(NetworkExport::Csv)),
            Some("gexf") => Ok(Self::Export(NetworkExport::Gexf)),
            Some("graphml") => Ok(Self::Export(NetworkExport::Graphml)),
            Some("json") => Ok(Self::Json),
            Some(_) => Err(AppError::bad_request(
                "invalid_network_format",
                "format must be one of: csv, gexf, graphml, json",
            )),
        }
    }
}

/// A resource URI resolved against the static resources and templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRequest {
    Info,
    Corpora,
    Corpus(String),
    CorpusMetadata(String),
    Plays(String),
    Play(PlayId),
    PlayMetrics(PlayId),
    Characters(PlayId),
    SpokenText(PlayId, SpokenTextFilter),
    SpokenTextByCharacter(PlayId),
    StageDirections(PlayId),
    NetworkData(PlayId, NetworkFormat),
    Relations(PlayId),
    FullText(PlayId),
    TeiText(PlayId),
    CharacterByWikidata(String),
}

/// Resolves `uri`. `Ok(None)` means no resource or template uses its scheme.
pub fn parse_resource_uri(uri: &str) -> Result<Option<ResourceRequest>, AppError> {
    let Some((scheme, rest)) = uri.trim().split_once("://") else {
        return Ok(None);
    };
    let (path, query) = rest.split_once('?').unwrap_or((rest, ""));

    if scheme == "info" || scheme == "corpora" {
        if !path.is_empty() || !query.is_empty() {
            return Err(invalid_uri(format!("{scheme}:// takes no path or query")));
        }
        let request = if scheme == "info" {
            ResourceRequest::Info
        } else {
            ResourceRequest::Corpora
        };
        return Ok(Some(request));
    }

    let Some(spec) = RESOURCE_TEMPLATES.iter().find(|spec| spec.scheme == scheme) else {
        return Ok(None);
    };

    let segments = path
        .split('/')
        .map(|segment| percent_decode(segment).map(|decoded| decoded.trim().to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    if segments.len() != spec.params.len() {
        return Err(invalid_uri(format!(
            "{scheme}:// expects {} path segment(s): {}",
            spec.params.len(),
            spec.uri_template()
        )));
    }
    if let Some(position) = segments.iter().position(String::is_empty) {
        return Err(AppError::bad_request(
            "invalid_argument",
            format!("{} must not be empty", spec.params[position]),
        ));
    }

    let query = parse_query(spec, query)?;
    let lookup = |key: &str| {
        query
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.clone())
    };

    let first = segments.first().cloned().unwrap_or_default();
    let second = segments.get(1).cloned().unwrap_or_default();
    let play = || PlayId::new(first.clone(), second.clone());

    let request = match spec.scheme {
        "corpus" => ResourceRequest::Corpus(first.clone()),
        "corpus_metadata" => ResourceRequest::CorpusMetadata(first.clone()),
        "plays" => ResourceRequest::Plays(first.clone()),
        "character_by_wikidata" => ResourceRequest::CharacterByWikidata(first.clone()),
        "play" => ResourceRequest::Play(play()),
        "play_metrics" => ResourceRequest::PlayMetrics(play()),
        "characters" => ResourceRequest::Characters(play()),
        "spoken_text" => ResourceRequest::SpokenText(
            play(),
            SpokenTextFilter {
                gender: normalize_gender(lookup("gender"))?,
                relation: lookup("relation"),
                role: lookup("role"),
            },
        ),
        "spoken_text_by_character" => ResourceRequest::SpokenTextByCharacter(play()),
        "stage_directions" => ResourceRequest::StageDirections(play()),
        "network_data" => {
            ResourceRequest::NetworkData(play(), NetworkFormat::parse(lookup("format").as_deref())?)
        }
        "relations" => ResourceRequest::Relations(play()),
        "full_text" => ResourceRequest::FullText(play()),
        "tei_text" => ResourceRequest::TeiText(play()),
        _ => return Ok(None),
    };

    Ok(Some(request))
}

fn invalid_uri(message: String) -> AppError {
    AppError::bad_request("invalid_resource_uri", message)
}

/// Splits `key=value` pairs and percent-decodes the values. Empty values are
/// treated as absent.
fn parse_query(spec: &TemplateSpec, query: &str) -> Result<Vec<(String, String)>, AppError> {
    let mut pairs = Vec::new();
    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if !spec.query.contains(&key) {
            return Err(AppError::bad_request(
                "invalid_query_parameter",
                format!("{}:// does not accept query parameter '{key}'", spec.scheme),
            ));
        }

        let value = percent_decode(value)?;
        let value = value.trim();
        if !value.is_empty() {
            pairs.push((key.to_string(), value.to_string()));
        }
    }
    Ok(pairs)
}

/// Segments and query values are decoded once here; the client encodes
/// them again when building the outbound URL.
fn percent_decode(raw: &str) -> Result<String, AppError> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| invalid_uri(format!("'{raw}' is not valid percent-encoded UTF-8")))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePayload {
    pub mime_type: &'static str,
    pub text: String,
}

impl ResourcePayload {
    fn json(value: Value) -> Self {
        Self {
            mime_type: JSON_MIME,
            text: value.to_string(),
        }
    }

    fn text(mime_type: &'static str, text: String) -> Self {
        Self { mime_type, text }
    }
}

pub async fn read_resource(
    api: &dyn CorpusApi,
    request: &ResourceRequest,
) -> Result<ResourcePayload, AppError> {
    let payload = match request {
        ResourceRequest::Info => ResourcePayload::json(fetch_json(api, &endpoints::info()).await?),
        ResourceRequest::Corpora => ResourcePayload::json(json!({
            "corpora": fetch_json(api, &endpoints::corpora()).await?
        })),
        ResourceRequest::Corpus(corpus) => {
            ResourcePayload::json(fetch_json(api, &endpoints::corpus(corpus)).await?)
        }
        ResourceRequest::CorpusMetadata(corpus) => ResourcePayload::json(json!({
            "metadata": fetch_json(api, &endpoints::corpus_metadata(corpus)).await?
        })),
        ResourceRequest::Plays(corpus) => {
            let listing = fetch_json(api, &endpoints::corpus(corpus)).await?;
            let plays = listing.get("plays").cloned().unwrap_or_else(|| json!([]));
            ResourcePayload::json(json!({ "plays": plays }))
        }
        ResourceRequest::Play(id) => {
            ResourcePayload::json(fetch_json(api, &endpoints::play(&id.corpus, &id.play)).await?)
        }
        ResourceRequest::PlayMetrics(id) => ResourcePayload::json(
            fetch_json(api, &endpoints::play_metrics(&id.corpus, &id.play)).await?,
        ),
        ResourceRequest::Characters(id) => ResourcePayload::json(json!({
            "characters": fetch_json(api, &endpoints::characters(&id.corpus, &id.play)).await?
        })),
        ResourceRequest::SpokenText(id, filter) => ResourcePayload::text(
            TEXT_MIME,
            fetch_text(api, &endpoints::spoken_text(&id.corpus, &id.play, filter)).await?,
        ),
        ResourceRequest::SpokenTextByCharacter(id) => ResourcePayload::json(json!({
            "text_by_character": fetch_json(
                api,
                &endpoints::spoken_text_by_character(&id.corpus, &id.play),
            )
            .await?
        })),
        ResourceRequest::StageDirections(id) => ResourcePayload::text(
            TEXT_MIME,
            fetch_text(api, &endpoints::stage_directions(&id.corpus, &id.play)).await?,
        ),
        ResourceRequest::NetworkData(id, format) => read_network(api, id, *format).await?,
        ResourceRequest::Relations(id) => ResourcePayload::json(json!({
            "relations": fetch_json(api, &endpoints::relations(&id.corpus, &id.play)).await?
        })),
        ResourceRequest::FullText(id) => {
            let spoken = fetch_text(
                api,
                &endpoints::spoken_text(&id.corpus, &id.play, &SpokenTextFilter::default()),
            )
            .await?;
            let stage = fetch_text(api, &endpoints::stage_directions(&id.corpus, &id.play)).await?;
            ResourcePayload::text(TEXT_MIME, combine_full_text(&spoken, &stage))
        }
        ResourceRequest::TeiText(id) => ResourcePayload::text(
            XML_MIME,
            fetch_text(api, &endpoints::tei(&id.corpus, &id.play)).await?,
        ),
        ResourceRequest::CharacterByWikidata(wikidata_id) => ResourcePayload::json(json!({
            "plays": fetch_json(api, &endpoints::plays_with_character(wikidata_id)).await?
        })),
    };

    Ok(payload)
}

async fn read_network(
    api: &dyn CorpusApi,
    id: &PlayId,
    format: NetworkFormat,
) -> Result<ResourcePayload, AppError> {
    let export = match format {
        NetworkFormat::Export(export) => export,
        NetworkFormat::Json => NetworkExport::Csv,
    };
    let text = fetch_text(api, &endpoints::network_data(&id.corpus, &id.play, export)).await?;

    let payload = match format {
        NetworkFormat::Json => ResourcePayload::json(serde_json::to_value(parse_network_csv(&text))?),
        NetworkFormat::Export(NetworkExport::Csv) => ResourcePayload::text(CSV_MIME, text),
        NetworkFormat::Export(NetworkExport::Gexf) => ResourcePayload::text(GEXF_MIME, text),
        NetworkFormat::Export(NetworkExport::Graphml) => ResourcePayload::text(GRAPHML_MIME, text),
    };
    Ok(payload)
}

pub fn build_read_result(uri: &str, payload: ResourcePayload) -> Result<Value, AppError> {
    let result = ReadResourceResult {
        contents: vec![ReadResourceContent::from(TextResourceContents {
            meta: None,
            mime_type: Some(payload.mime_type.to_string()),
            text: payload.text,
            uri: uri.to_string(),
        })],
        meta: None,
    };
    Ok(serde_json::to_value(result)?)
}

pub async fn handle_resources_read(
    state: &AppState,
    id: Option<Value>,
    params: Option<Value>,
) -> Value {
    let Some(raw_params) = params else {
        return json_rpc_error(id, INVALID_PARAMS, "Invalid params");
    };

    let resource_read: ReadResourceRequestParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(id, INVALID_PARAMS, "Invalid params"),
    };

    let request = match parse_resource_uri(&resource_read.uri) {
        Ok(Some(request)) => request,
        Ok(None) => {
            return not_found_with_data(
                id,
                "resource_not_found",
                "unknown resource uri",
                json!({ "uri": resource_read.uri }),
            )
        }
        Err(err) => return app_error_to_json_rpc(id, err),
    };

    debug!(uri = %resource_read.uri, "reading resource");
    let result = read_resource(state.corpus_api.as_ref(), &request)
        .await
        .and_then(|payload| build_read_result(&resource_read.uri, payload));

    match result {
        Ok(result) => json_rpc_result(id, result),
        Err(err) => app_error_to_json_rpc(id, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dracor_client::ApiError;
    use crate::test_support::fixtures;

    fn faust() -> PlayId {
        PlayId::new("ger", fixtures::FAUST)
    }

    #[test]
    fn static_uris_resolve() {
        assert_eq!(
            parse_resource_uri("info://").expect("valid"),
            Some(ResourceRequest::Info)
        );
        assert_eq!(
            parse_resource_uri("corpora://").expect("valid"),
            Some(ResourceRequest::Corpora)
        );
    }

    #[test]
    fn play_template_fills_segments_in_order() {
        let request = parse_resource_uri("play://ger/goethe-faust-eine-tragoedie").expect("valid");
        assert_eq!(request, Some(ResourceRequest::Play(faust())));
    }

    #[test]
    fn unknown_scheme_is_not_a_resource() {
        assert_eq!(parse_resource_uri("poem://ger/x").expect("no error"), None);
        assert_eq!(parse_resource_uri("plain-string").expect("no error"), None);
    }

    #[test]
    fn wrong_segment_count_is_rejected() {
        let error = parse_resource_uri("play://ger").expect_err("missing play segment");
        assert!(matches!(
            error,
            AppError::BadRequest {
                code: "invalid_resource_uri",
                ..
            }
        ));
    }

    #[test]
    fn empty_segment_is_rejected() {
        let error = parse_resource_uri("characters://ger/ ").expect_err("blank play segment");
        assert!(error.to_string().contains("play_name"));
    }

    #[test]
    fn spoken_text_query_is_validated() {
        let request =
            parse_resource_uri("spoken_text://ger/goethe-faust-eine-tragoedie?gender=female&role=")
                .expect("valid");
        assert_eq!(
            request,
            Some(ResourceRequest::SpokenText(
                faust(),
                SpokenTextFilter {
                    gender: Some("FEMALE".to_string()),
                    relation: None,
                    role: None,
                }
            ))
        );

        let error = parse_resource_uri("spoken_text://ger/x?gender=robot").expect_err("bad gender");
        assert!(matches!(
            error,
            AppError::BadRequest {
                code: "invalid_gender",
                ..
            }
        ));

        let error = parse_resource_uri("play://ger/x?format=csv").expect_err("unexpected query");
        assert!(matches!(
            error,
            AppError::BadRequest {
                code: "invalid_query_parameter",
                ..
            }
        ));
    }

    #[test]
    fn segments_and_query_values_are_decoded_once() {
        let request = parse_resource_uri("spoken_text://ger/la%20vida?role=king%20lear")
            .expect("valid");
        assert_eq!(
            request,
            Some(ResourceRequest::SpokenText(
                PlayId::new("ger", "la vida"),
                SpokenTextFilter {
                    gender: None,
                    relation: None,
                    role: Some("king lear".to_string()),
                }
            ))
        );

        let error = parse_resource_uri("play://ger/%ff").expect_err("not utf-8");
        assert!(matches!(
            error,
            AppError::BadRequest {
                code: "invalid_resource_uri",
                ..
            }
        ));
    }

    #[test]
    fn network_format_defaults_to_csv() {
        let request = parse_resource_uri("network_data://ger/x").expect("valid");
        assert_eq!(
            request,
            Some(ResourceRequest::NetworkData(
                PlayId::new("ger", "x"),
                NetworkFormat::Export(NetworkExport::Csv)
            ))
        );
        assert!(parse_resource_uri("network_data://ger/x?format=dot").is_err());
    }

    #[test]
    fn templates_list_every_scheme() {
        let templates = build_resource_templates_list().resource_templates;
        assert_eq!(templates.len(), RESOURCE_TEMPLATES.len());
        assert!(templates
            .iter()
            .any(|template| template.uri_template == "play://{corpus_name}/{play_name}"));
        assert!(templates
            .iter()
            .any(|template| template.uri_template == "character_by_wikidata://{wikidata_id}"));
    }

    #[tokio::test]
    async fn play_resource_keeps_identifying_fields_verbatim() {
        let api = fixtures::corpus_api();
        let payload = read_resource(&api, &ResourceRequest::Play(faust()))
            .await
            .expect("play resource");

        assert_eq!(payload.mime_type, "application/json");
        let value: Value = serde_json::from_str(&payload.text).expect("json payload");
        assert_eq!(value["name"], fixtures::FAUST);
        assert_eq!(value["title"], "Faust. Eine Tragödie");
        assert_eq!(value["authors"][0]["name"], "Goethe, Johann Wolfgang");
    }

    #[tokio::test]
    async fn network_json_carries_the_csv_rows() {
        let api = fixtures::corpus_api();
        let csv = read_resource(
            &api,
            &ResourceRequest::NetworkData(faust(), NetworkFormat::Export(NetworkExport::Csv)),
        )
        .await
        .expect("csv network");
        let json_payload = read_resource(
            &api,
            &ResourceRequest::NetworkData(faust(), NetworkFormat::Json),
        )
        .await
        .expect("json network");

        assert_eq!(csv.mime_type, "text/csv");
        let rows: Vec<Vec<String>> = csv
            .text
            .lines()
            .skip(1)
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.split(',').map(str::to_string).collect())
            .collect();

        let value: Value = serde_json::from_str(&json_payload.text).expect("json payload");
        let edges = value["edges"].as_array().expect("edges array");
        assert_eq!(edges.len(), rows.len());
        for (edge, row) in edges.iter().zip(rows.iter()) {
            assert_eq!(edge["source"], row[0].as_str());
            assert_eq!(edge["type"], row[1].as_str());
            assert_eq!(edge["target"], row[2].as_str());
            assert_eq!(edge["weight"].to_string(), row[3]);
        }
    }

    #[tokio::test]
    async fn full_text_joins_dialogue_and_stage_directions() {
        let api = fixtures::corpus_api();
        let payload = read_resource(&api, &ResourceRequest::FullText(faust()))
            .await
            .expect("full text");
        assert_eq!(payload.mime_type, "text/plain");
        assert_eq!(
            payload.text,
            format!(
                "DIALOGUE:\n\n{}\n\nSTAGE DIRECTIONS:\n\n{}",
                fixtures::FAUST_SPOKEN_TEXT,
                fixtures::FAUST_STAGE_DIRECTIONS
            )
        );
    }

    #[tokio::test]
    async fn unknown_corpus_surfaces_not_found() {
        let api = fixtures::corpus_api();
        let error = read_resource(&api, &ResourceRequest::Corpus("xyz".to_string()))
            .await
            .expect_err("unknown corpus");
        assert!(matches!(error, AppError::Upstream(ApiError::NotFound { .. })));
    }

    #[tokio::test]
    async fn corpora_resource_wraps_listing() {
        let api = fixtures::corpus_api();
        let payload = read_resource(&api, &ResourceRequest::Corpora)
            .await
            .expect("corpora");
        let value: Value = serde_json::from_str(&payload.text).expect("json payload");
        assert_eq!(value["corpora"][0]["name"], "ger");
    }
}
