//! Parsing of the plain-text payloads the remote API returns
//!
//! Covers the CSV network and relation exports, basic text statistics and a
//! lightweight scan of TEI documents.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::domain::models::{FormalRelation, NetworkEdge};

static TITLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<title(?:\s[^>]*)?>(.*?)</title>").expect("title regex"));
static AUTHOR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<author(?:\s[^>]*)?>(.*?)</author>").expect("author regex"));
static ACT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<div\s[^>]*type="act""#).expect("act regex"));
static SCENE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<div\s[^>]*type="scene""#).expect("scene regex"));
static SPEECH_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<sp(?:\s[^>]*)?>(.*?)</sp>").expect("speech regex"));
static STAGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<stage(?:\s[^>]*)?>(.*?)</stage>").expect("stage regex"));
static MARKUP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("markup regex"));

/// Splits one CSV line, honouring double-quoted fields and `""` escapes.
pub fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(character) = chars.next() {
        match character {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(character),
        }
    }

    fields.push(current);
    fields
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub fn parse_csv(text: &str) -> CsvTable {
    let mut lines = text
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty());

    let headers = lines.next().map(split_csv_line).unwrap_or_default();
    let rows = lines.map(split_csv_line).collect();
    CsvTable { headers, rows }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkTable {
    pub headers: Vec<String>,
    pub edges: Vec<NetworkEdge>,
}

/// Parses `Source,Type,Target,Weight` rows. Rows with fewer than four
/// columns are skipped and a non-numeric weight counts as zero.
pub fn parse_network_csv(text: &str) -> NetworkTable {
    let table = parse_csv(text);
    let edges = table
        .rows
        .into_iter()
        .filter(|row| row.len() >= 4)
        .map(|row| NetworkEdge {
            source: row[0].trim().to_string(),
            kind: row[1].trim().to_string(),
            target: row[2].trim().to_string(),
            weight: row[3].trim().parse().unwrap_or(0),
        })
        .collect();

    NetworkTable {
        headers: table.headers,
        edges,
    }
}

/// Parses `Source,Type,Target,Label` rows of the relations export.
pub fn parse_relations_csv(text: &str) -> Vec<FormalRelation> {
    parse_csv(text)
        .rows
        .into_iter()
        .filter(|row| row.len() >= 4)
        .map(|row| FormalRelation {
            source: row[0].trim().to_string(),
            kind: row[1].trim().to_string(),
            target: row[2].trim().to_string(),
            label: row[3].trim().to_string(),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextStats {
    pub characters: usize,
    pub words: usize,
    pub lines: usize,
}

/// Character, word and non-empty line counts.
pub fn text_stats(text: &str) -> TextStats {
    TextStats {
        characters: text.chars().count(),
        words: text.split_whitespace().count(),
        lines: text.lines().filter(|line| !line.trim().is_empty()).count(),
    }
}

pub fn combine_full_text(spoken_text: &str, stage_directions: &str) -> String {
    format!("DIALOGUE:\n\n{spoken_text}\n\nSTAGE DIRECTIONS:\n\n{stage_directions}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeiStructure {
    pub acts: usize,
    pub scenes: usize,
    pub speeches: usize,
    pub stage_directions: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeiSample {
    pub first_speech: String,
    pub first_stage_direction: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeiSummary {
    pub title: String,
    pub authors: Vec<String>,
    pub structure: TeiStructure,
    pub text_sample: TeiSample,
}

/// Scans a TEI document for title, authors and dramatic structure.
pub fn summarize_tei(tei: &str) -> TeiSummary {
    let title = TITLE_PATTERN
        .captures(tei)
        .and_then(|captures| captures.get(1))
        .map(|found| strip_markup(found.as_str()))
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| "Unknown".to_string());

    let mut authors: Vec<String> = Vec::new();
    for captures in AUTHOR_PATTERN.captures_iter(tei) {
        let author = strip_markup(&captures[1]);
        if !author.is_empty() && !authors.contains(&author) {
            authors.push(author);
        }
    }
    if authors.is_empty() {
        authors.push("Unknown".to_string());
    }

    let first_capture = |pattern: &Regex| {
        pattern
            .captures(tei)
            .map(|captures| strip_markup(&captures[1]))
            .unwrap_or_default()
    };

    TeiSummary {
        title,
        authors,
        structure: TeiStructure {
            acts: ACT_PATTERN.find_iter(tei).count(),
            scenes: SCENE_PATTERN.find_iter(tei).count(),
            speeches: SPEECH_PATTERN.find_iter(tei).count(),
            stage_directions: STAGE_PATTERN.find_iter(tei).count(),
        },
        text_sample: TeiSample {
            first_speech: first_capture(&*SPEECH_PATTERN),
            first_stage_direction: first_capture(&*STAGE_PATTERN),
        },
    }
}

/// Removes tags and collapses whitespace.
pub fn strip_markup(fragment: &str) -> String {
    MARKUP_PATTERN
        .replace_all(fragment, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const NETWORK_CSV: &str = "Source,Type,Target,Weight\n\
        \"faust\",Undirected,\"mephistopheles\",24\n\
        faust,Undirected,gretchen,11\n\
        broken,row\n\
        wagner,Undirected,faust,n/a\n";

    const TEI: &str = r##"<TEI xmlns="http://www.tei-c.org/ns/1.0">
  <teiHeader><fileDesc><titleStmt>
    <title type="main">Faust</title>
    <title type="sub">Eine Tragödie</title>
    <author><persName>Goethe, Johann Wolfgang</persName></author>
  </titleStmt></fileDesc></teiHeader>
  <text><body>
    <div type="act"><head>Erster Akt</head>
      <div type="scene"><head>Nacht</head>
        <stage>Hochgewölbtes, enges gotisches Zimmer.</stage>
        <sp who="#faust"><speaker>FAUST</speaker><l>Habe nun, ach!</l><l>Philosophie,</l></sp>
        <sp who="#wagner"><speaker>WAGNER</speaker><p>Verzeiht!</p></sp>
      </div>
      <div type="scene"><stage>Vor dem Tor.</stage></div>
    </div>
  </body></text>
</TEI>"##;

    #[test]
    fn splits_quoted_fields() {
        assert_eq!(
            split_csv_line(r#""a,b",c,"say ""hi""""#),
            vec!["a,b".to_string(), "c".to_string(), r#"say "hi""#.to_string()]
        );
    }

    #[test]
    fn parses_network_rows() {
        let table = parse_network_csv(NETWORK_CSV);
        assert_eq!(table.headers, vec!["Source", "Type", "Target", "Weight"]);
        assert_eq!(table.edges.len(), 3);
        assert_eq!(table.edges[0].source, "faust");
        assert_eq!(table.edges[0].target, "mephistopheles");
        assert_eq!(table.edges[0].weight, 24);
        assert_eq!(table.edges[2].weight, 0);
    }

    #[test]
    fn header_only_csv_has_no_rows() {
        let table = parse_csv("Source,Type,Target,Label\r\n");
        assert_eq!(table.headers.len(), 4);
        assert!(table.rows.is_empty());
        assert!(parse_relations_csv("").is_empty());
    }

    #[test]
    fn parses_relation_rows() {
        let relations =
            parse_relations_csv("Source,Type,Target,Label\nfaust,Directed,gretchen,lover_of\n");
        assert_eq!(relations.len(), 1);
        assert_eq!(relations[0].label, "lover_of");
        assert_eq!(relations[0].kind, "Directed");
    }

    #[test]
    fn counts_words_and_non_empty_lines() {
        let stats = text_stats("Habe nun, ach!\n\n  Philosophie  \n");
        assert_eq!(stats.words, 4);
        assert_eq!(stats.lines, 2);
        assert_eq!(text_stats("").words, 0);
    }

    #[test]
    fn summarizes_tei_structure() {
        let summary = summarize_tei(TEI);
        assert_eq!(summary.title, "Faust");
        assert_eq!(summary.authors, vec!["Goethe, Johann Wolfgang"]);
        assert_eq!(summary.structure.acts, 1);
        assert_eq!(summary.structure.scenes, 2);
        assert_eq!(summary.structure.speeches, 2);
        assert_eq!(summary.structure.stage_directions, 2);
        assert_eq!(summary.text_sample.first_speech, "FAUST Habe nun, ach! Philosophie,");
        assert_eq!(
            summary.text_sample.first_stage_direction,
            "Hochgewölbtes, enges gotisches Zimmer."
        );
    }

    #[test]
    fn summarizes_empty_document_as_unknown() {
        let summary = summarize_tei("<TEI/>");
        assert_eq!(summary.title, "Unknown");
        assert_eq!(summary.authors, vec!["Unknown"]);
        assert_eq!(summary.structure.speeches, 0);
        assert!(summary.text_sample.first_speech.is_empty());
    }
}
