//! Prompt templates for drama analysis
//!
//! Every prompt renders into a single user message. Templates are plain
//! functions over the validated argument map.

use std::collections::BTreeMap;

use rust_mcp_sdk::schema::{
    ContentBlock, GetPromptRequestParams, GetPromptResult, ListPromptsResult, Prompt,
    PromptArgument, PromptMessage, Role, TextContent,
};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::mcp::rpc::{
    app_error_to_json_rpc, json_rpc_error, json_rpc_result, not_found_with_data, INVALID_PARAMS,
};

type PromptArguments = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy)]
pub struct ArgumentSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct PromptSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub arguments: &'static [ArgumentSpec],
    render: fn(&PromptArguments) -> String,
}

const fn required(name: &'static str, description: &'static str) -> ArgumentSpec {
    ArgumentSpec {
        name,
        description,
        required: true,
    }
}

const fn optional(name: &'static str, description: &'static str) -> ArgumentSpec {
    ArgumentSpec {
        name,
        description,
        required: false,
    }
}

const CORPUS_ARG: ArgumentSpec = required("corpus_name", "Corpus name, e.g. ger");
const PLAY_ARG: ArgumentSpec = required("play_name", "Play name within the corpus");

pub const PROMPTS: &[PromptSpec] = &[
    PromptSpec {
        name: "analyze_play",
        description: "Comprehensive analysis of a single play",
        arguments: &[CORPUS_ARG, PLAY_ARG],
        render: render_analyze_play,
    },
    PromptSpec {
        name: "character_analysis",
        description: "Analysis of one character of a play",
        arguments: &[
            CORPUS_ARG,
            PLAY_ARG,
            required("character_id", "Character id as listed by the characters resource"),
        ],
        render: render_character_analysis,
    },
    PromptSpec {
        name: "network_analysis",
        description: "Analysis of the character network of a play",
        arguments: &[CORPUS_ARG, PLAY_ARG],
        render: render_network_analysis,
    },
    PromptSpec {
        name: "comparative_analysis",
        description: "Side-by-side comparison of two plays",
        arguments: &[
            required("corpus_name1", "Corpus of the first play"),
            required("play_name1", "Name of the first play"),
            required("corpus_name2", "Corpus of the second play"),
            required("play_name2", "Name of the second play"),
        ],
        render: render_comparative_analysis,
    },
    PromptSpec {
        name: "gender_analysis",
        description: "Gender representation in a play",
        arguments: &[CORPUS_ARG, PLAY_ARG],
        render: render_gender_analysis,
    },
    PromptSpec {
        name: "historical_context",
        description: "Historical context of a play",
        arguments: &[CORPUS_ARG, PLAY_ARG],
        render: render_historical_context,
    },
    PromptSpec {
        name: "full_text_analysis",
        description: "Report outline for a full-text analysis, with placeholders to fill in",
        arguments: &[],
        render: render_full_text_analysis,
    },
    PromptSpec {
        name: "dutch_character_tagging_analysis",
        description: "Find character id tagging problems in historical plays",
        arguments: &[
            optional("corpus_name", "Corpus to examine, defaults to dutch"),
            optional("play_name", "Play to focus on; any suitable play when omitted"),
        ],
        render: render_dutch_character_tagging,
    },
];

fn arg<'a>(arguments: &'a PromptArguments, name: &str) -> &'a str {
    arguments.get(name).map(String::as_str).unwrap_or_default()
}

fn render_analyze_play(args: &PromptArguments) -> String {
    format!(
        "You are a drama analysis expert working with the DraCor (Drama Corpora Project) database.\n\n\
         Corpus: {corpus}\nPlay: {play}\n\n\
         Analyze this play covering:\n\
         1. Basic information (title, author, year)\n\
         2. Structure (acts, scenes)\n\
         3. Character relationships\n\
         4. Key metrics and statistics\n\n\
         Include the historical context, a structural analysis, a character analysis, \
         a network analysis of how characters relate to each other, and what sets this play \
         apart from others of its period.",
        corpus = arg(args, "corpus_name"),
        play = arg(args, "play_name"),
    )
}

fn render_character_analysis(args: &PromptArguments) -> String {
    format!(
        "You are an expert in dramatic characters working with the DraCor database.\n\n\
         Corpus: {corpus}\nPlay: {play}\nCharacter: {character}\n\n\
         Analyze this character covering:\n\
         1. Basic information (name, gender)\n\
         2. Importance in the play (speech acts, words spoken)\n\
         3. Relationships with other characters\n\
         4. Development over the course of the play\n\n\
         Write an analysis that helps researchers and students understand this character.",
        corpus = arg(args, "corpus_name"),
        play = arg(args, "play_name"),
        character = arg(args, "character_id"),
    )
}

fn render_network_analysis(args: &PromptArguments) -> String {
    format!(
        "You are a network analysis expert working with character networks from the DraCor database.\n\n\
         Corpus: {corpus}\nPlay: {play}\n\n\
         Analyze the character network covering:\n\
         1. Overall structure and density\n\
         2. Central characters (degree, betweenness)\n\
         3. Communities or groups of characters\n\
         4. Strongest and weakest relationships\n\
         5. How the network reflects the themes of the play\n\n\
         Explain the social dynamics the network reveals.",
        corpus = arg(args, "corpus_name"),
        play = arg(args, "play_name"),
    )
}

fn render_comparative_analysis(args: &PromptArguments) -> String {
    format!(
        "You are a drama analysis expert comparing plays from the DraCor database.\n\n\
         Play 1:\nCorpus: {corpus1}\nPlay: {play1}\n\n\
         Play 2:\nCorpus: {corpus2}\nPlay: {play2}\n\n\
         Compare the plays covering:\n\
         1. Basic information (title, author, year)\n\
         2. Structure (acts, scenes, length)\n\
         3. Character count and dynamics\n\
         4. Network complexity and density\n\
         5. Historical context and significance\n\n\
         Highlight both similarities and differences.",
        corpus1 = arg(args, "corpus_name1"),
        play1 = arg(args, "play_name1"),
        corpus2 = arg(args, "corpus_name2"),
        play2 = arg(args, "play_name2"),
    )
}

fn render_gender_analysis(args: &PromptArguments) -> String {
    format!(
        "You are a scholar of gender studies and dramatic literature.\n\n\
         Corpus: {corpus}\nPlay: {play}\n\n\
         Analyze gender representation in this play covering:\n\
         1. Gender distribution of the cast\n\
         2. Speaking time and importance of male and female characters\n\
         3. Relationships across genders\n\
         4. Gender representation in the period the play comes from\n\
         5. Notable aspects of how gender is portrayed\n\n\
         Combine quantitative evidence (character counts, words spoken) with qualitative \
         observations (power dynamics, character development).",
        corpus = arg(args, "corpus_name"),
        play = arg(args, "play_name"),
    )
}

fn render_historical_context(args: &PromptArguments) -> String {
    format!(
        "You are a theater historian placing dramatic works in their historical context.\n\n\
         Corpus: {corpus}\nPlay: {play}\n\n\
         Describe the historical context of this play covering:\n\
         1. Political and social climate when it was written\n\
         2. Theatrical conventions of the period\n\
         3. Contemporary events that may have shaped it\n\
         4. Its reception at the first performances\n\
         5. Its place in the author's body of work\n\
         6. How it reflects or challenges the values of its time\n\n\
         Help modern readers understand the play within its original framework.",
        corpus = arg(args, "corpus_name"),
        play = arg(args, "play_name"),
    )
}

fn render_full_text_analysis(_args: &PromptArguments) -> String {
    "I'll analyze the full text of {play_title} by {author} from the {corpus_name} corpus.\n\n\
     ## Basic Information\n\
     - Title: {play_title}\n\
     - Author: {author}\n\
     - Written: {written_year}\n\
     - Premiere: {premiere_date}\n\n\
     ## Full Text Analysis\n\n{analysis}\n\n\
     ## Key Themes and Motifs\n\n{themes}\n\n\
     ## Language and Style\n\n{style}\n\n\
     ## Historical and Cultural Context\n\n{context}"
        .to_string()
}

fn render_dutch_character_tagging(args: &PromptArguments) -> String {
    let corpus = args
        .get("corpus_name")
        .map(String::as_str)
        .unwrap_or("dutch");
    let focus = match args.get("play_name") {
        Some(play) => format!("Focus on the play \"{play}\" from the {corpus} corpus."),
        None => format!("Select a suitable historical play from the {corpus} corpus."),
    };

    format!(
        "Analyze historical plays from the DraCor database for character id tagging problems.\n\n\
         1. Examine the play's character relations, full text and structure.\n\
         2. Identify inconsistencies in character id tagging, including spelling variations of \
         names, conflated or confused characters, historical spelling variants, and mismatches \
         between character ids and stage directions.\n\
         3. Report every suspected tagging error in a table with the columns: text id, current \
         character id, problematic variant(s), error type, explanation.\n\n\
         {focus}\n\n\
         Approach:\n\
         1. Review the play's basic information and structure\n\
         2. Review the full character list with ids\n\
         3. Read the TEI XML, focusing on speech tags (<sp>) and stage directions (<stage>)\n\
         4. Compare how names are used in different contexts\n\
         5. Note historical spelling conventions of Dutch literature of the period\n\
         6. Present the findings in the table format above"
    )
}

pub fn build_prompts_list() -> ListPromptsResult {
    ListPromptsResult {
        meta: None,
        next_cursor: None,
        prompts: PROMPTS
            .iter()
            .map(|spec| Prompt {
                name: spec.name.to_string(),
                title: None,
                description: Some(spec.description.to_string()),
                arguments: spec
                    .arguments
                    .iter()
                    .map(|argument| PromptArgument {
                        name: argument.name.to_string(),
                        title: None,
                        description: Some(argument.description.to_string()),
                        required: Some(argument.required),
                    })
                    .collect(),
                icons: vec![],
                meta: None,
            })
            .collect(),
    }
}

pub fn find_prompt(name: &str) -> Option<&'static PromptSpec> {
    PROMPTS.iter().find(|spec| spec.name == name)
}

/// Trims the supplied arguments, drops blank or undeclared ones and checks
/// that every required argument is present.
pub fn render_prompt(
    spec: &PromptSpec,
    supplied: PromptArguments,
) -> Result<GetPromptResult, AppError> {
    let arguments: PromptArguments = supplied
        .into_iter()
        .filter(|(name, _)| spec.arguments.iter().any(|argument| argument.name == name.as_str()))
        .map(|(name, value)| (name, value.trim().to_string()))
        .filter(|(_, value)| !value.is_empty())
        .collect();

    if let Some(missing) = spec
        .arguments
        .iter()
        .find(|argument| argument.required && !arguments.contains_key(argument.name))
    {
        return Err(AppError::bad_request(
            "missing_argument",
            format!("prompt {} requires argument {}", spec.name, missing.name),
        ));
    }

    Ok(GetPromptResult {
        description: Some(spec.description.to_string()),
        messages: vec![PromptMessage {
            role: Role::User,
            content: ContentBlock::from(TextContent::new((spec.render)(&arguments), None, None)),
        }],
        meta: None,
    })
}

pub fn handle_prompts_get(id: Option<Value>, params: Option<Value>) -> Value {
    let Some(raw_params) = params else {
        return json_rpc_error(id, INVALID_PARAMS, "Invalid params");
    };

    let request: GetPromptRequestParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(id, INVALID_PARAMS, "Invalid params"),
    };

    let Some(spec) = find_prompt(&request.name) else {
        return not_found_with_data(
            id,
            "prompt_not_found",
            "unknown prompt name",
            json!({ "name": request.name }),
        );
    };

    let supplied: PromptArguments = request.arguments.unwrap_or_default().into_iter().collect();
    let rendered = render_prompt(spec, supplied)
        .and_then(|result| serde_json::to_value(result).map_err(AppError::from));
    match rendered {
        Ok(result) => json_rpc_result(id, result),
        Err(err) => app_error_to_json_rpc(id, err),
    }
}
