//! Interactive tools exposed via Model Context Protocol
//!
//! Each tool validates its arguments, delegates to a composite operation in
//! [`crate::domain::analysis`] and returns a one-line summary, the JSON
//! payload as text, and the same payload as structured content.

use chrono::{SecondsFormat, Utc};
use rust_mcp_sdk::{
    macros,
    schema::{CallToolRequestParams, CallToolResult, ContentBlock, TextContent, Tool},
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::analysis::{self, PlayId, PlaySearchParams};
use crate::domain::utils::{normalize_optional_text, require_identifier, GenderBalance};
use crate::errors::AppError;
use crate::mcp::rpc::{
    app_error_to_json_rpc, json_rpc_error, json_rpc_result, not_found_with_data, INVALID_PARAMS,
};
use crate::AppState;

#[macros::mcp_tool(
    name = "search_plays",
    description = "Search plays across DraCor corpora by text, author, language, country, year range, character name or cast gender balance"
)]
#[derive(Debug, Default, Deserialize, Serialize, macros::JsonSchema)]
pub struct SearchPlaysTool {
    pub query: Option<String>,
    pub corpus_name: Option<String>,
    pub character_name: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub author: Option<String>,
    pub year_from: Option<i64>,
    pub year_to: Option<i64>,
    /// One of female_dominated, male_dominated, balanced.
    pub gender_filter: Option<String>,
}

#[macros::mcp_tool(
    name = "compare_plays",
    description = "Compare two plays by metadata and network metrics"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct ComparePlaysTool {
    pub corpus_name1: String,
    pub play_name1: String,
    pub corpus_name2: String,
    pub play_name2: String,
}

#[macros::mcp_tool(
    name = "analyze_character_relations",
    description = "Rank the character co-occurrences of a play and list its formal relations"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct AnalyzeCharacterRelationsTool {
    pub corpus_name: String,
    pub play_name: String,
}

#[macros::mcp_tool(
    name = "analyze_play_structure",
    description = "Describe the acts, scenes, cast and speaking distribution of a play"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct AnalyzePlayStructureTool {
    pub corpus_name: String,
    pub play_name: String,
}

#[macros::mcp_tool(
    name = "analyze_full_text",
    description = "Fetch the full text and TEI of a play and compute text statistics"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct AnalyzeFullTextTool {
    pub corpus_name: String,
    pub play_name: String,
}

#[macros::mcp_tool(
    name = "find_character_across_plays",
    description = "Find characters whose name contains the given text, across all corpora or one"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct FindCharacterAcrossPlaysTool {
    pub character_name: String,
    pub corpus_name: Option<String>,
}

pub fn build_tools_list() -> Vec<Tool> {
    vec![
        SearchPlaysTool::tool(),
        ComparePlaysTool::tool(),
        AnalyzeCharacterRelationsTool::tool(),
        AnalyzePlayStructureTool::tool(),
        AnalyzeFullTextTool::tool(),
        FindCharacterAcrossPlaysTool::tool(),
    ]
}

pub fn build_search_params(params: SearchPlaysTool) -> Result<PlaySearchParams, AppError> {
    if let (Some(from), Some(to)) = (params.year_from, params.year_to) {
        if from > to {
            return Err(AppError::bad_request(
                "invalid_year_range",
                "year_from must not be greater than year_to",
            ));
        }
    }

    Ok(PlaySearchParams {
        query: normalize_optional_text(params.query),
        corpus_name: normalize_optional_text(params.corpus_name),
        character_name: normalize_optional_text(params.character_name),
        country: normalize_optional_text(params.country),
        language: normalize_optional_text(params.language),
        author: normalize_optional_text(params.author),
        year_from: params.year_from,
        year_to: params.year_to,
        gender_filter: GenderBalance::parse(params.gender_filter)?,
    })
}

fn play_id(corpus_name: &str, play_name: &str) -> Result<PlayId, AppError> {
    Ok(PlayId::new(
        require_identifier("corpus_name", corpus_name)?,
        require_identifier("play_name", play_name)?,
    ))
}

fn parse_arguments<T: DeserializeOwned>(arguments: Value) -> Result<T, AppError> {
    serde_json::from_value(arguments)
        .map_err(|err| AppError::bad_request("invalid_arguments", err.to_string()))
}

fn tool_result<T: Serialize>(summary: String, payload: &T) -> Result<Value, AppError> {
    let Value::Object(mut structured_content) = serde_json::to_value(payload)? else {
        return Err(AppError::internal("tool payload is not a json object"));
    };
    structured_content.insert(
        "generated_at_utc".to_string(),
        json!(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    let payload_text = Value::Object(structured_content.clone()).to_string();

    let result = CallToolResult {
        content: vec![
            ContentBlock::from(TextContent::new(summary, None, None)),
            ContentBlock::from(TextContent::new(payload_text, None, None)),
        ],
        is_error: None,
        meta: None,
        structured_content: Some(structured_content),
    };
    Ok(serde_json::to_value(result)?)
}

async fn call_search_plays(state: &AppState, arguments: Value) -> Result<Value, AppError> {
    let params = build_search_params(parse_arguments(arguments)?)?;
    let search = analysis::search_plays(state.corpus_api.as_ref(), params).await?;
    tool_result(format!("Found {} matching plays", search.count), &search)
}

async fn call_compare_plays(state: &AppState, arguments: Value) -> Result<Value, AppError> {
    let params: ComparePlaysTool = parse_arguments(arguments)?;
    let first = play_id(&params.corpus_name1, &params.play_name1)?;
    let second = play_id(&params.corpus_name2, &params.play_name2)?;

    let comparison = analysis::compare_plays(state.corpus_api.as_ref(), &first, &second).await?;
    tool_result(
        format!(
            "Compared {}/{} with {}/{} on {} shared metrics",
            first.corpus,
            first.play,
            second.corpus,
            second.play,
            comparison.metric_comparison.len()
        ),
        &comparison,
    )
}

async fn call_analyze_character_relations(
    state: &AppState,
    arguments: Value,
) -> Result<Value, AppError> {
    let params: AnalyzeCharacterRelationsTool = parse_arguments(arguments)?;
    let id = play_id(&params.corpus_name, &params.play_name)?;

    let relations = analysis::analyze_character_relations(state.corpus_api.as_ref(), &id).await?;
    tool_result(
        format!(
            "{} relations among {} characters",
            relations.total_relations, relations.total_characters
        ),
        &relations,
    )
}

async fn call_analyze_play_structure(state: &AppState, arguments: Value) -> Result<Value, AppError> {
    let params: AnalyzePlayStructureTool = parse_arguments(arguments)?;
    let id = play_id(&params.corpus_name, &params.play_name)?;

    let structure = analysis::analyze_play_structure(state.corpus_api.as_ref(), &id).await?;
    tool_result(
        format!(
            "{} acts, {} scenes, {} characters",
            structure.num_of_acts, structure.num_of_scenes, structure.characters.total
        ),
        &structure,
    )
}

async fn call_analyze_full_text(state: &AppState, arguments: Value) -> Result<Value, AppError> {
    let params: AnalyzeFullTextTool = parse_arguments(arguments)?;
    let id = play_id(&params.corpus_name, &params.play_name)?;

    let analysis = analysis::analyze_full_text(state.corpus_api.as_ref(), &id).await?;
    tool_result(
        format!(
            "Analyzed {} words of {}/{}",
            analysis.analysis.word_count, id.corpus, id.play
        ),
        &analysis,
    )
}

async fn call_find_character_across_plays(
    state: &AppState,
    arguments: Value,
) -> Result<Value, AppError> {
    let params: FindCharacterAcrossPlaysTool = parse_arguments(arguments)?;
    let character_name = require_identifier("character_name", &params.character_name)?;
    let corpus_name = match normalize_optional_text(params.corpus_name) {
        Some(corpus) => Some(require_identifier("corpus_name", &corpus)?),
        None => None,
    };

    let search = analysis::find_character_across_plays(
        state.corpus_api.as_ref(),
        &character_name,
        corpus_name.as_deref(),
    )
    .await?;
    tool_result(
        format!("Found {} characters matching '{character_name}'", search.count),
        &search,
    )
}

pub async fn handle_tools_call(
    state: &AppState,
    id: Option<Value>,
    params: Option<Value>,
) -> Value {
    let Some(raw_params) = params else {
        return json_rpc_error(id, INVALID_PARAMS, "Invalid params");
    };

    let tool_call: CallToolRequestParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(id, INVALID_PARAMS, "Invalid params"),
    };

    let arguments = json!(tool_call.arguments.unwrap_or_default());
    let outcome = match tool_call.name.as_str() {
        "search_plays" => call_search_plays(state, arguments).await,
        "compare_plays" => call_compare_plays(state, arguments).await,
        "analyze_character_relations" => call_analyze_character_relations(state, arguments).await,
        "analyze_play_structure" => call_analyze_play_structure(state, arguments).await,
        "analyze_full_text" => call_analyze_full_text(state, arguments).await,
        "find_character_across_plays" => call_find_character_across_plays(state, arguments).await,
        _ => {
            return not_found_with_data(
                id,
                "tool_not_found",
                "unknown tool name",
                json!({ "name": tool_call.name }),
            )
        }
    };

    match outcome {
        Ok(result) => json_rpc_result(id, result),
        Err(err) => app_error_to_json_rpc(id, err),
    }
}
