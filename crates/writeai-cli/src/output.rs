//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde::Serialize;

use writeai_core::grammar::GrammarIssue;
use writeai_core::{Project, StoreSummary, WritingStats};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a single project with its content
    pub fn print_project(&self, project: &Project) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:       {}", project.id());
                println!("Title:    {}", project.title());
                println!("Type:     {}", project.kind());
                println!("Words:    {}", project.word_count());
                println!(
                    "Visible:  {}",
                    if project.is_public() { "public" } else { "private" }
                );
                if !project.tags().is_empty() {
                    println!("Tags:     {}", join_tags(project));
                }
                println!("Created:  {}", project.created_at().format("%Y-%m-%d %H:%M"));
                println!("Updated:  {}", project.updated_at().format("%Y-%m-%d %H:%M"));

                if !project.content().is_empty() {
                    println!();
                    println!("{}", project.content());
                }
            }
            OutputFormat::Json => print_json(project),
            OutputFormat::Quiet => {
                println!("{}", project.id());
            }
        }
    }

    /// Print a list of projects
    pub fn print_projects(&self, projects: &[&Project]) {
        match self.format {
            OutputFormat::Human => {
                if projects.is_empty() {
                    println!("No projects found.");
                    return;
                }
                for project in projects {
                    let visibility = if project.is_public() { " *" } else { "" };
                    println!(
                        "{} | {:<7} | {}{} | {} words | {}",
                        short_id(project.id()),
                        project.kind().as_str(),
                        truncate(project.title(), 40),
                        visibility,
                        project.word_count(),
                        project.updated_at().format("%Y-%m-%d")
                    );
                }
                println!("\n{} project(s)", projects.len());
            }
            OutputFormat::Json => print_json(&projects),
            OutputFormat::Quiet => {
                for project in projects {
                    println!("{}", project.id());
                }
            }
        }
    }

    /// Print tags with counts
    pub fn print_tags(&self, tags: &[(String, usize)]) {
        match self.format {
            OutputFormat::Human => {
                if tags.is_empty() {
                    println!("No tags found.");
                    return;
                }
                for (name, count) in tags {
                    println!("{} ({})", name, count);
                }
            }
            OutputFormat::Json => {
                let tags_json: Vec<_> = tags
                    .iter()
                    .map(|(name, count)| serde_json::json!({"name": name, "count": count}))
                    .collect();
                print_json(&tags_json);
            }
            OutputFormat::Quiet => {
                for (name, _) in tags {
                    println!("{}", name);
                }
            }
        }
    }

    /// Print writing statistics for a project
    pub fn print_stats(&self, project: &Project, stats: &WritingStats) {
        match self.format {
            OutputFormat::Human => {
                println!("Writing Statistics: {}", project.title());
                println!();
                println!("  Words:              {}", stats.words);
                println!("  Characters:         {}", stats.characters);
                println!("  Sentences:          {}", stats.sentences);
                println!("  Paragraphs:         {}", stats.paragraphs);
                println!("  Reading time:       {} min", stats.reading_time_minutes);
                println!("  Words per sentence: {}", stats.words_per_sentence);
                println!("  Readability:        {}/100", stats.readability);
                println!();
                println!(
                    "Session goal: {}/{} words {} {}%",
                    stats.goal.words,
                    stats.goal.target,
                    progress_bar(stats.goal.percent),
                    stats.goal.percent
                );
                println!("  {}", stats.goal.message());

                if !stats.top_words.is_empty() {
                    println!();
                    println!("Most used words:");
                    for (rank, entry) in stats.top_words.iter().enumerate() {
                        println!("  {:>2}. {} ({})", rank + 1, entry.word, entry.count);
                    }
                }

                if !stats.insights.is_empty() {
                    println!();
                    println!("Insights:");
                    for insight in &stats.insights {
                        println!("  - {}", insight.message());
                    }
                }
            }
            OutputFormat::Json => print_json(stats),
            OutputFormat::Quiet => {
                println!("{}", stats.words);
            }
        }
    }

    /// Print grammar suggestions
    pub fn print_issues(&self, issues: &[GrammarIssue]) {
        match self.format {
            OutputFormat::Human => {
                if issues.is_empty() {
                    println!("No issues found");
                    return;
                }
                println!(
                    "{} suggestion{}",
                    issues.len(),
                    if issues.len() == 1 { "" } else { "s" }
                );
                for issue in issues {
                    println!();
                    println!("[{}] {}..{}", issue.kind, issue.start, issue.end);
                    println!("  \"{}\"", truncate(&issue.text, 60));
                    println!("  {}", issue.suggestion);
                }
            }
            OutputFormat::Json => print_json(&issues),
            OutputFormat::Quiet => {
                println!("{}", issues.len());
            }
        }
    }

    /// Print the dashboard summary
    pub fn print_summary(&self, summary: &StoreSummary, recent: &[&Project]) {
        match self.format {
            OutputFormat::Human => {
                println!("WriteAI Status");
                println!("==============");
                println!();
                println!("Projects:        {}", summary.projects);
                println!("Total words:     {}", summary.total_words);
                println!("Public projects: {}", summary.public_projects);
                if !summary.by_type.is_empty() {
                    println!();
                    println!("By type:");
                    for (kind, count) in &summary.by_type {
                        println!("  {:<8} {}", kind.as_str(), count);
                    }
                }
                if !recent.is_empty() {
                    println!();
                    println!("Recently updated:");
                    for project in recent {
                        println!(
                            "  {} | {} | {}",
                            short_id(project.id()),
                            truncate(project.title(), 40),
                            project.updated_at().format("%Y-%m-%d %H:%M")
                        );
                    }
                }
            }
            OutputFormat::Json => print_json(summary),
            OutputFormat::Quiet => {
                println!("{}", summary.projects);
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Whether interactive prompts are appropriate
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// Pretty-print any serializable value as JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

/// First 8 characters of a project ID; shorter IDs are shown whole
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

/// Twenty-cell bar for a 0-100 percentage
pub fn progress_bar(percent: u32) -> String {
    let filled = (percent.min(100) / 5) as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(20 - filled))
}

fn join_tags(project: &Project) -> String {
    project
        .tags()
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Truncate a string to max length in characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Truncate to first line and max length
pub fn truncate_line(s: &str, max_len: usize) -> String {
    let first_line = s.lines().next().unwrap_or("");
    truncate(first_line, max_len)
}
