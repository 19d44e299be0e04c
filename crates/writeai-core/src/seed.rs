//! Example projects written on first run

use chrono::{Duration, Utc};

use crate::models::{Project, ProjectType};

/// Fixed identifiers, the same ones the web client seeded with
pub const MYSTERIOUS_LIBRARY_ID: &str = "1";
pub const AI_IN_WRITING_ID: &str = "2";

/// The example projects, newest first
pub fn example_projects() -> Vec<Project> {
    let now = Utc::now();

    let mut library = Project::with_id(
        MYSTERIOUS_LIBRARY_ID,
        "The Mysterious Library",
        "In the heart of the old city stood a library that appeared only on foggy nights...",
        ProjectType::Story,
    );
    library.set_public(true);
    library.set_tags(["mystery", "fantasy"]);

    let mut article = Project::with_id(
        AI_IN_WRITING_ID,
        "AI in Modern Writing",
        "The integration of artificial intelligence in writing processes has revolutionized...",
        ProjectType::Article,
    );
    article.set_tags(["technology", "writing"]);

    // Backdate last; the setters above bump updated_at
    let library = library.with_timestamps(now - Duration::days(1), now - Duration::hours(1));
    let article = article.with_timestamps(now - Duration::days(2), now - Duration::hours(2));

    vec![library, article]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics;

    #[test]
    fn test_example_projects() {
        let projects = example_projects();
        assert_eq!(projects.len(), 2);

        let library = &projects[0];
        assert_eq!(library.id(), MYSTERIOUS_LIBRARY_ID);
        assert_eq!(library.kind(), ProjectType::Story);
        assert!(library.is_public());
        assert!(library.has_tag("mystery") && library.has_tag("fantasy"));

        let article = &projects[1];
        assert_eq!(article.id(), AI_IN_WRITING_ID);
        assert!(!article.is_public());
        assert!(article.has_tag("technology"));
    }

    #[test]
    fn test_example_projects_hold_invariants() {
        for project in example_projects() {
            assert_eq!(project.word_count(), metrics::word_count(project.content()));
            assert!(project.updated_at() >= project.created_at());
            assert!(project.updated_at() < Utc::now());
        }
    }
}
