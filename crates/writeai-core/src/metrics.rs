//! Derived writing metrics
//!
//! Pure functions over raw text. Every function accepts the empty string and
//! returns zero or an empty result for it.
//!
//! The readability score and the word-frequency tie-break are presentation
//! heuristics, not a standard readability formula.

use std::collections::HashMap;

use serde::Serialize;

/// Reading speed used for the reading-time estimate
pub const WORDS_PER_MINUTE: usize = 200;

/// How many entries `top_words` returns
pub const TOP_WORDS_LIMIT: usize = 10;

/// Session word goal used when none is configured
pub const DEFAULT_WORD_GOAL: usize = 500;

/// Tokens this long or shorter are ignored by `top_words`
const MIN_RANKED_WORD_LEN: usize = 3;

/// Count non-empty whitespace-delimited tokens
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Count characters (Unicode scalar values)
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Count non-blank segments between runs of `.`, `!` and `?`
pub fn sentence_count(text: &str) -> usize {
    text.split(is_sentence_terminator)
        .filter(|segment| !segment.trim().is_empty())
        .count()
}

/// Count paragraphs separated by blank lines
pub fn paragraph_count(text: &str) -> usize {
    let mut count = 0;
    let mut in_paragraph = false;
    for line in text.lines() {
        if line.trim().is_empty() {
            in_paragraph = false;
        } else if !in_paragraph {
            in_paragraph = true;
            count += 1;
        }
    }
    count
}

/// Estimated reading time in whole minutes, rounded up
pub fn reading_time_minutes(text: &str) -> usize {
    word_count(text).div_ceil(WORDS_PER_MINUTE)
}

/// Average words per sentence, rounded to the nearest whole number
pub fn words_per_sentence(text: &str) -> usize {
    average_sentence_length(text)
        .map(|avg| avg.round() as usize)
        .unwrap_or(0)
}

/// Simplified readability score from 0 to 100
///
/// Starts at 100 and loses 20 points when sentences average more than 20
/// words, or 10 points when they average more than 15. Text without any
/// sentence scores 0.
pub fn readability_score(text: &str) -> u32 {
    let Some(avg) = average_sentence_length(text) else {
        return 0;
    };

    let penalty: u32 = if avg > 20.0 {
        20
    } else if avg > 15.0 {
        10
    } else {
        0
    };
    100u32.saturating_sub(penalty)
}

/// A ranked word and how often it occurs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordFrequency {
    pub word: String,
    pub count: usize,
}

/// Most used words, highest count first
///
/// Text is lowercased, punctuation is stripped and words of three characters
/// or fewer are skipped. Words with the same count keep the order in which
/// they first appear.
pub fn top_words(text: &str) -> Vec<WordFrequency> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    let mut ranked: Vec<WordFrequency> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for word in cleaned
        .split_whitespace()
        .filter(|w| w.chars().count() > MIN_RANKED_WORD_LEN)
    {
        match index.get(word) {
            Some(&pos) => ranked[pos].count += 1,
            None => {
                index.insert(word, ranked.len());
                ranked.push(WordFrequency {
                    word: word.to_string(),
                    count: 1,
                });
            }
        }
    }

    // stable sort keeps first-occurrence order among equal counts
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(TOP_WORDS_LIMIT);
    ranked
}

/// Feedback shown alongside the statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WritingInsight {
    /// Fewer than 100 words so far
    KeepWriting,
    /// Sentences average more than 20 words
    LongSentences,
    /// Readability above 80
    ClearWriting,
    /// More than 200 words in a single paragraph
    SingleParagraph,
}

impl WritingInsight {
    pub fn message(&self) -> &'static str {
        match self {
            WritingInsight::KeepWriting => {
                "Keep writing! Aim for at least 100 words to get better insights."
            }
            WritingInsight::LongSentences => {
                "Consider breaking up long sentences for better readability."
            }
            WritingInsight::ClearWriting => "Great job! Your writing is clear and easy to read.",
            WritingInsight::SingleParagraph => {
                "Consider breaking your text into multiple paragraphs for better structure."
            }
        }
    }
}

/// Progress toward a session word goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GoalProgress {
    pub words: usize,
    pub target: usize,
    /// Whole percent of the target reached, capped at 100
    pub percent: u32,
}

impl GoalProgress {
    pub fn achieved(&self) -> bool {
        self.words >= self.target
    }

    pub fn remaining(&self) -> usize {
        self.target.saturating_sub(self.words)
    }

    pub fn message(&self) -> String {
        if self.achieved() {
            "🎉 Goal achieved! Keep going!".to_string()
        } else {
            format!("{} words to go!", self.remaining())
        }
    }
}

/// Progress of `words` toward `target`
///
/// A zero target counts as already met.
pub fn goal_progress(words: usize, target: usize) -> GoalProgress {
    let percent = if target == 0 {
        100
    } else {
        (words as f64 / target as f64 * 100.0).min(100.0).floor() as u32
    };
    GoalProgress {
        words,
        target,
        percent,
    }
}

/// Every metric for a piece of text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WritingStats {
    pub words: usize,
    pub characters: usize,
    pub sentences: usize,
    pub paragraphs: usize,
    pub reading_time_minutes: usize,
    pub words_per_sentence: usize,
    pub readability: u32,
    pub top_words: Vec<WordFrequency>,
    pub insights: Vec<WritingInsight>,
    pub goal: GoalProgress,
}

impl WritingStats {
    /// Analyze against the default word goal
    pub fn analyze(text: &str) -> Self {
        Self::analyze_with_goal(text, DEFAULT_WORD_GOAL)
    }

    pub fn analyze_with_goal(text: &str, word_goal: usize) -> Self {
        let words = word_count(text);
        let sentences = sentence_count(text);
        let paragraphs = paragraph_count(text);
        let readability = readability_score(text);

        let mut insights = Vec::new();
        if words < 100 {
            insights.push(WritingInsight::KeepWriting);
        }
        if sentences > 0 && words as f64 / sentences as f64 > 20.0 {
            insights.push(WritingInsight::LongSentences);
        }
        if readability > 80 {
            insights.push(WritingInsight::ClearWriting);
        }
        if paragraphs == 1 && words > 200 {
            insights.push(WritingInsight::SingleParagraph);
        }

        Self {
            words,
            characters: char_count(text),
            sentences,
            paragraphs,
            reading_time_minutes: words.div_ceil(WORDS_PER_MINUTE),
            words_per_sentence: words_per_sentence(text),
            readability,
            top_words: top_words(text),
            insights,
            goal: goal_progress(words, word_goal),
        }
    }
}

fn is_sentence_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn average_sentence_length(text: &str) -> Option<f64> {
    let sentences = sentence_count(text);
    if sentences == 0 {
        return None;
    }
    Some(word_count(text) as f64 / sentences as f64)
}
