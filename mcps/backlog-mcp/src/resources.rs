//! Read-only `backlog://` resources
//!
//! Most resources are a single CLI call. `tasks/by-priority` and
//! `statistics` post-process task listings.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use crate::backlog::{BacklogResult, CommandRunner};
use crate::decisions::render_decisions;
use crate::params::Priority;

static PRIORITY_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*#(high|medium|low)\*").expect("marker pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BacklogResource {
    TasksAll,
    Board,
    Config,
    DraftsAll,
    DocsAll,
    Overview,
    Sequences,
    DecisionsAll,
    TasksByPriority,
    Statistics,
}

impl BacklogResource {
    pub const ALL: [BacklogResource; 10] = [
        BacklogResource::TasksAll,
        BacklogResource::Board,
        BacklogResource::Config,
        BacklogResource::DraftsAll,
        BacklogResource::DocsAll,
        BacklogResource::Overview,
        BacklogResource::Sequences,
        BacklogResource::DecisionsAll,
        BacklogResource::TasksByPriority,
        BacklogResource::Statistics,
    ];

    pub fn uri(self) -> &'static str {
        match self {
            BacklogResource::TasksAll => "backlog://tasks/all",
            BacklogResource::Board => "backlog://board",
            BacklogResource::Config => "backlog://config",
            BacklogResource::DraftsAll => "backlog://drafts/all",
            BacklogResource::DocsAll => "backlog://docs/all",
            BacklogResource::Overview => "backlog://overview",
            BacklogResource::Sequences => "backlog://sequences",
            BacklogResource::DecisionsAll => "backlog://decisions/all",
            BacklogResource::TasksByPriority => "backlog://tasks/by-priority",
            BacklogResource::Statistics => "backlog://statistics",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BacklogResource::TasksAll => "All Tasks",
            BacklogResource::Board => "Kanban Board",
            BacklogResource::Config => "Configuration",
            BacklogResource::DraftsAll => "All Draft Tasks",
            BacklogResource::DocsAll => "All Documentation",
            BacklogResource::Overview => "Project Overview",
            BacklogResource::Sequences => "Task Sequences",
            BacklogResource::DecisionsAll => "All Decision Records",
            BacklogResource::TasksByPriority => "Tasks by Priority",
            BacklogResource::Statistics => "Project Statistics",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            BacklogResource::TasksAll => "View all tasks in the backlog",
            BacklogResource::Board => "Current Kanban board view",
            BacklogResource::Config => "Current backlog configuration",
            BacklogResource::DraftsAll => "View all draft tasks in the backlog",
            BacklogResource::DocsAll => "View all documentation files",
            BacklogResource::Overview => "Project statistics and overview",
            BacklogResource::Sequences => "Execution sequences computed from task dependencies",
            BacklogResource::DecisionsAll => "View all decision records",
            BacklogResource::TasksByPriority => "View tasks grouped by priority",
            BacklogResource::Statistics => "Enhanced project statistics and metrics",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            BacklogResource::Config => "application/json",
            BacklogResource::Board
            | BacklogResource::Overview
            | BacklogResource::Sequences
            | BacklogResource::Statistics => "text/plain",
            _ => "text/markdown",
        }
    }

    pub fn from_uri(uri: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.uri() == uri)
    }

    /// Fetch the resource text
    #[instrument(skip(runner), fields(uri = self.uri()))]
    pub async fn read(self, runner: &CommandRunner) -> BacklogResult<String> {
        match self {
            BacklogResource::TasksAll => runner.run(&cli(&["task", "list", "--plain"])).await,
            BacklogResource::Board => runner.run(&cli(&["board", "view"])).await,
            BacklogResource::Config => runner.run(&cli(&["config", "list"])).await,
            BacklogResource::DraftsAll => runner.run(&cli(&["draft", "list", "--plain"])).await,
            BacklogResource::DocsAll => runner.run(&cli(&["doc", "list", "--plain"])).await,
            BacklogResource::Overview => runner.run(&cli(&["overview"])).await,
            BacklogResource::Sequences => runner.run(&cli(&["sequence", "list", "--plain"])).await,
            BacklogResource::DecisionsAll => Ok(render_decisions(runner.project_dir()).await),
            BacklogResource::TasksByPriority => Ok(tasks_by_priority(runner).await),
            BacklogResource::Statistics => {
                let overview = runner.run(&cli(&["overview"])).await?;
                let tasks = runner.run(&cli(&["task", "list", "--plain"])).await?;
                Ok(statistics(&overview, &tasks))
            }
        }
    }
}

fn cli(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// Tasks grouped under priority headings; failures become the text
async fn tasks_by_priority(runner: &CommandRunner) -> String {
    let mut sections = Vec::new();
    for priority in Priority::ALL {
        let argv = cli(&["task", "list", "--priority", priority.as_str(), "--plain"]);
        match runner.run(&argv).await {
            Ok(listing) => sections.push((priority, listing)),
            Err(e) => return format!("Error grouping tasks by priority: {}", e),
        }
    }

    let all = runner.run(&cli(&["task", "list", "--plain"])).await;
    if let Err(e) = &all {
        debug!(error = %e, "skipping no-priority section");
    }

    group_by_priority(&sections, all.ok().as_deref())
}

fn non_blank(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').filter(|line| !line.trim().is_empty())
}

/// Markdown for the `tasks/by-priority` resource
///
/// `sections` holds the per-priority listings in display order; `all` is
/// the unfiltered listing used for the "No Priority" section.
pub fn group_by_priority(sections: &[(Priority, String)], all: Option<&str>) -> String {
    let mut out = String::new();

    for (priority, listing) in sections {
        if listing.trim().is_empty() {
            continue;
        }
        out.push_str(&format!("## {} Priority\n\n", priority.label()));
        for line in non_blank(listing) {
            out.push_str(&format!("- {}\n", line));
        }
        out.push('\n');
    }

    let unprioritized: Vec<&str> = all
        .map(|all| {
            non_blank(all)
                .filter(|line| !PRIORITY_MARKER.is_match(line))
                .collect()
        })
        .unwrap_or_default();
    if !unprioritized.is_empty() {
        out.push_str("## No Priority\n\n");
        for line in unprioritized {
            out.push_str(&format!("- {}\n", line));
        }
    }

    if out.is_empty() {
        "No tasks found.".to_string()
    } else {
        out
    }
}

/// Overview text followed by simple counts over the task listing
pub fn statistics(overview: &str, tasks: &str) -> String {
    let lines: Vec<&str> = non_blank(tasks).collect();
    let count = |needle: &str| lines.iter().filter(|l| l.contains(needle)).count();

    format!(
        "{}\n\n## Additional Metrics\n\nTotal Tasks Listed: {}\n- To Do: {}\n- In Progress: {}\n- Done: {}\n",
        overview,
        lines.len(),
        count("To Do"),
        count("In Progress"),
        count("Done"),
    )
}
