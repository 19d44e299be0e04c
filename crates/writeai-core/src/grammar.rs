//! Heuristic writing hints
//!
//! These are simple pattern checks, not a grammar engine: passive voice,
//! words repeated inside one sentence, and commonly confused words. Offsets
//! are byte offsets into the checked text so callers can slice it directly.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

/// Most issues reported for one text
pub const MAX_ISSUES: usize = 5;

/// Repeated words are only flagged when longer than this (in chars)
const MIN_REPEATED_WORD_LEN: usize = 3;

/// Words often swapped for a homophone, and what the writer may have meant
const CONFUSED_WORDS: &[(&str, &str)] = &[
    ("there", "their/they're"),
    ("your", "you're"),
    ("its", "it's"),
    ("then", "than"),
    ("affect", "effect"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    Grammar,
    Style,
    Spelling,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IssueKind::Grammar => "grammar",
            IssueKind::Style => "style",
            IssueKind::Spelling => "spelling",
        };
        write!(f, "{}", s)
    }
}

/// One flagged span of text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrammarIssue {
    pub kind: IssueKind,
    pub text: String,
    pub suggestion: String,
    pub start: usize,
    pub end: usize,
}

/// Check `text` and return up to [`MAX_ISSUES`] issues in document order
/// (per sentence: passive voice, repeated words, confused words)
pub fn check(text: &str) -> Vec<GrammarIssue> {
    let mut issues = Vec::new();

    for (offset, sentence) in sentences(text) {
        if sentence.trim().is_empty() {
            continue;
        }

        check_passive(sentence, offset, &mut issues);
        check_repeated(sentence, offset, &mut issues);
        check_confused(sentence, offset, &mut issues);

        if issues.len() >= MAX_ISSUES {
            break;
        }
    }

    issues.truncate(MAX_ISSUES);
    issues
}

fn check_passive(sentence: &str, offset: usize, issues: &mut Vec<GrammarIssue>) {
    if !(sentence.contains(" was ") || sentence.contains(" were ")) {
        return;
    }

    let trimmed = sentence.trim();
    let start = offset + (sentence.len() - sentence.trim_start().len());
    issues.push(GrammarIssue {
        kind: IssueKind::Style,
        text: trimmed.to_string(),
        suggestion: "Consider using active voice for stronger writing".to_string(),
        start,
        end: start + trimmed.len(),
    });
}

fn check_repeated(sentence: &str, offset: usize, issues: &mut Vec<GrammarIssue>) {
    let mut seen: HashMap<String, usize> = HashMap::new();

    for (pos, word) in words(sentence) {
        if word.chars().count() <= MIN_REPEATED_WORD_LEN {
            continue;
        }
        let lower = word.to_lowercase();
        let count = seen.entry(lower.clone()).or_insert(0);
        *count += 1;

        // Flag the second occurrence only
        if *count == 2 {
            issues.push(GrammarIssue {
                kind: IssueKind::Style,
                suggestion: format!("Avoid repeating \"{}\" in the same sentence", lower),
                text: lower,
                start: offset + pos,
                end: offset + pos + word.len(),
            });
        }
    }
}

fn check_confused(sentence: &str, offset: usize, issues: &mut Vec<GrammarIssue>) {
    for (pos, word) in words(sentence) {
        let lower = word.to_lowercase();
        if let Some((_, meant)) = CONFUSED_WORDS.iter().find(|(w, _)| *w == lower) {
            issues.push(GrammarIssue {
                kind: IssueKind::Spelling,
                text: word.to_string(),
                suggestion: format!("Did you mean \"{}\"?", meant),
                start: offset + pos,
                end: offset + pos + word.len(),
            });
        }
    }
}

/// Split on `.`, `!` and `?`, yielding each piece with its byte offset
fn sentences(text: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if matches!(c, '.' | '!' | '?') {
            if i > start {
                out.push((start, &text[start..i]));
            }
            start = i + c.len_utf8();
        }
    }
    if start < text.len() {
        out.push((start, &text[start..]));
    }

    out
}

/// Whitespace-separated words with surrounding punctuation stripped,
/// paired with their byte offset inside `s`
fn words(s: &str) -> impl Iterator<Item = (usize, &str)> {
    let is_edge = |c: char| !c.is_alphanumeric();
    s.split_whitespace().filter_map(move |token| {
        let token_start = token.as_ptr() as usize - s.as_ptr() as usize;
        let lead = token.len() - token.trim_start_matches(is_edge).len();
        let word = token.trim_matches(is_edge);
        (!word.is_empty()).then_some((token_start + lead, word))
    })
}
