//! Story idea generator
//!
//! A prompt is one pick from each of four fixed lists. Any field can be left
//! empty and filled at random; generating an idea requires all four.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use thiserror::Error;

pub const GENRES: &[&str] = &[
    "Fantasy",
    "Mystery",
    "Romance",
    "Sci-Fi",
    "Horror",
    "Adventure",
    "Drama",
    "Comedy",
];

pub const SETTINGS: &[&str] = &[
    "Medieval Castle",
    "Space Station",
    "Modern City",
    "Small Town",
    "Post-Apocalyptic World",
    "Victorian London",
    "Tropical Island",
    "Underground Cave",
];

pub const CHARACTERS: &[&str] = &[
    "Reluctant Hero",
    "Mysterious Stranger",
    "Wise Mentor",
    "Ambitious Villain",
    "Lost Child",
    "Skilled Detective",
    "Powerful Wizard",
    "Brave Warrior",
];

pub const CONFLICTS: &[&str] = &[
    "Ancient Prophecy",
    "Missing Person",
    "Forbidden Love",
    "Hidden Treasure",
    "Time Travel",
    "Identity Crisis",
    "Betrayal",
    "Survival",
];

/// Number of idea templates
const TEMPLATE_COUNT: usize = 4;

/// Marker between the concept and the writer's own text
const START_MARKER: &str = "--- Start writing your story below ---";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoryError {
    #[error("No {0} chosen. Pick one or use --random")]
    Missing(&'static str),

    #[error("Unknown {field} '{value}'. Choose one of: {choices}")]
    Unknown {
        field: &'static str,
        value: String,
        choices: String,
    },
}

/// A genre/setting/character/conflict selection, possibly partial
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoryPrompt {
    pub genre: Option<&'static str>,
    pub setting: Option<&'static str>,
    pub character: Option<&'static str>,
    pub conflict: Option<&'static str>,
}

impl StoryPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// A prompt with every field drawn at random
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut prompt = Self::new();
        prompt.fill_missing(rng);
        prompt
    }

    /// Pick a genre by name (case-insensitive)
    pub fn genre(mut self, value: &str) -> Result<Self, StoryError> {
        self.genre = Some(lookup("genre", GENRES, value)?);
        Ok(self)
    }

    pub fn setting(mut self, value: &str) -> Result<Self, StoryError> {
        self.setting = Some(lookup("setting", SETTINGS, value)?);
        Ok(self)
    }

    pub fn character(mut self, value: &str) -> Result<Self, StoryError> {
        self.character = Some(lookup("character", CHARACTERS, value)?);
        Ok(self)
    }

    pub fn conflict(mut self, value: &str) -> Result<Self, StoryError> {
        self.conflict = Some(lookup("conflict", CONFLICTS, value)?);
        Ok(self)
    }

    /// Draw a random value for every field that is still empty
    pub fn fill_missing<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        fill(&mut self.genre, GENRES, rng);
        fill(&mut self.setting, SETTINGS, rng);
        fill(&mut self.character, CHARACTERS, rng);
        fill(&mut self.conflict, CONFLICTS, rng);
    }

    pub fn is_complete(&self) -> bool {
        self.genre.is_some()
            && self.setting.is_some()
            && self.character.is_some()
            && self.conflict.is_some()
    }

    /// Generate an idea from one of the templates, chosen at random
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<StoryIdea, StoryError> {
        let template = rng.gen_range(0..TEMPLATE_COUNT);
        self.generate_with_template(template)
    }

    /// Generate an idea from a specific template (wraps around)
    pub fn generate_with_template(&self, template: usize) -> Result<StoryIdea, StoryError> {
        let genre = self.genre.ok_or(StoryError::Missing("genre"))?;
        let setting = self.setting.ok_or(StoryError::Missing("setting"))?;
        let character = self.character.ok_or(StoryError::Missing("character"))?;
        let conflict = self.conflict.ok_or(StoryError::Missing("conflict"))?;

        let (g, s, ch, co) = (
            genre.to_lowercase(),
            setting.to_lowercase(),
            character.to_lowercase(),
            conflict.to_lowercase(),
        );

        let text = match template % TEMPLATE_COUNT {
            0 => format!(
                "In a {s}, a {ch} discovers {co} that threatens everything they hold dear. \
                 As ancient secrets unfold, they must choose between personal desires and the \
                 greater good, learning that sometimes the greatest strength comes from \
                 unexpected places."
            ),
            1 => format!(
                "When {co} disrupts life in {s}, a {ch} finds themselves at the center of \
                 events that will change their world forever. This {g} tale explores themes \
                 of courage, sacrifice, and the power of determination."
            ),
            2 => format!(
                "A {ch} living in {s} stumbles upon {co} that reveals a hidden world of danger \
                 and intrigue. As they navigate through challenges, they discover inner \
                 strength and forge unlikely alliances in this compelling {g} story."
            ),
            _ => format!(
                "Set against the backdrop of {s}, this {g} story follows a {ch} whose life is \
                 turned upside down by {co}. Through trials and tribulations, they must \
                 overcome their fears and embrace their destiny."
            ),
        };

        Ok(StoryIdea {
            genre,
            setting,
            character,
            conflict,
            text,
        })
    }
}

/// A generated story concept
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoryIdea {
    pub genre: &'static str,
    pub setting: &'static str,
    pub character: &'static str,
    pub conflict: &'static str,
    pub text: String,
}

impl StoryIdea {
    /// Title for a project started from this idea
    pub fn title(&self) -> String {
        format!("{} Story: {} in {}", self.genre, self.character, self.setting)
    }

    /// Opening content for a project started from this idea
    pub fn draft(&self) -> String {
        format!("Story Concept:\n{}\n\n{}\n\n", self.text, START_MARKER)
    }
}

fn lookup(
    field: &'static str,
    choices: &[&'static str],
    value: &str,
) -> Result<&'static str, StoryError> {
    let wanted = value.trim();
    choices
        .iter()
        .copied()
        .find(|c| c.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| StoryError::Unknown {
            field,
            value: wanted.to_string(),
            choices: choices.join(", "),
        })
}

fn fill<R: Rng + ?Sized>(slot: &mut Option<&'static str>, choices: &[&'static str], rng: &mut R) {
    if slot.is_none() {
        *slot = choices.choose(rng).copied();
    }
}
