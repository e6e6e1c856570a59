//! Recovers structured fields from free-text model output.
//!
//! Parsing is a two-phase scan: section markers are located by literal
//! substring search (first occurrence wins), then the questions region is
//! split at lines that open a new numbered item. Nothing here fails; missing
//! structure degrades to a fallback result instead.

use crate::models::{GroundingEntry, WebReference};
use crate::prompts::{QUESTIONS_MARKER, SUMMARY_MARKER};
use std::collections::HashSet;

/// Summary used when the questions section was found but the summary was not.
pub const SUMMARY_FALLBACK: &str = "Could not parse summary.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAnalysis {
    pub summary: String,
    pub questions: Vec<String>,
}

pub fn parse_analysis(raw: &str) -> ParsedAnalysis {
    let summary_at = raw.find(SUMMARY_MARKER);
    let questions_at = raw.find(QUESTIONS_MARKER);

    if summary_at.is_none() && questions_at.is_none() {
        return ParsedAnalysis {
            summary: raw.to_string(),
            questions: Vec::new(),
        };
    }

    // The summary ends at the first questions marker that starts after the
    // summary marker itself, so an overlapping occurrence never counts.
    let summary = summary_at
        .and_then(|at| {
            let body = &raw[at + SUMMARY_MARKER.len()..];
            body.find(QUESTIONS_MARKER)
                .map(|end| body[..end].trim().to_string())
        })
        .unwrap_or_else(|| SUMMARY_FALLBACK.to_string());

    let questions = questions_at
        .map(|at| parse_question_list(&raw[at + QUESTIONS_MARKER.len()..]))
        .unwrap_or_default();

    ParsedAnalysis { summary, questions }
}

/// Split text into numbered question blocks.
///
/// A new block starts at every newline followed by optional whitespace, one
/// or more ASCII digits, a period and a space or tab. The number stays with
/// its block; everything up to the next such line (options, answer,
/// explanation) belongs to the same block.
pub fn parse_question_list(raw: &str) -> Vec<String> {
    let mut questions = Vec::new();
    let mut segment_start = 0;

    for (newline, _) in raw.match_indices('\n') {
        if starts_numbered_item(&raw[newline + 1..]) {
            push_segment(&mut questions, &raw[segment_start..newline]);
            segment_start = newline + 1;
        }
    }
    push_segment(&mut questions, &raw[segment_start..]);

    questions
}

fn starts_numbered_item(text: &str) -> bool {
    let rest = text.trim_start();
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return false;
    }

    let mut tail = rest[digits..].chars();
    tail.next() == Some('.') && matches!(tail.next(), Some(' ' | '\t'))
}

fn push_segment(questions: &mut Vec<String>, segment: &str) {
    let segment = segment.trim();
    if !segment.is_empty() {
        questions.push(segment.to_string());
    }
}

/// Collect web references from grounding metadata.
///
/// Entries without a URI are dropped and later duplicates of a URI are
/// ignored, keeping first-seen order. A missing title falls back to the URI.
pub fn extract_references(entries: &[GroundingEntry]) -> Vec<WebReference> {
    let mut seen = HashSet::new();

    entries
        .iter()
        .filter_map(|entry| entry.web.as_ref())
        .filter_map(|web| {
            let uri = web.uri.as_deref().filter(|uri| !uri.is_empty())?;
            Some((uri, web.title.as_deref()))
        })
        .filter(|(uri, _)| seen.insert(*uri))
        .map(|(uri, title)| WebReference {
            uri: uri.to_string(),
            title: title
                .filter(|title| !title.is_empty())
                .unwrap_or(uri)
                .to_string(),
        })
        .collect()
}
