//! Argument validation for backlog CLI invocations
//!
//! Every argument vector is inspected before it reaches a process spawn.
//! Each element is classified by the token immediately before it: a value
//! following `--title` is free text, a value following `--ordinal` must be a
//! number, and so on. The flag table in [`field_kind`] is the only place
//! those rules are keyed, so supporting a new flag means adding one arm.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Characters that can start a second command or expand a variable in a shell
const SHELL_METACHARS: &[char] = &[';', '|', '&', '`', '$', '\\'];

/// [`SHELL_METACHARS`] plus grouping parentheses
const STRICT_METACHARS: &[char] = &[';', '|', '&', '`', '$', '(', ')', '\\'];

static TASK_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^task-\d+(\.\d+)*$").expect("task id pattern is valid"));

/// Bare words the dispatcher emits as subcommands or switches
const KNOWN_TOKENS: &[&str] = &[
    "task", "edit", "create", "view", "archive", "list", "draft", "promote", "demote", "board",
    "config", "get", "set", "doc", "decision", "overview", "cleanup", "sequence", "browser",
    "agents", "update", "--plain",
];

/// Expected content shape of an argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free-form prose; parentheses allowed
    Text,
    /// Digits only
    Numeric,
    /// Enumerated-ish values such as status or labels
    Controlled,
    /// The token is itself a `--flag`
    Flag,
    /// Subcommand keyword or task id with no governing flag
    Token,
    /// Anything else
    Unknown,
}

impl FieldKind {
    fn admits(self, value: &str) -> bool {
        match self {
            FieldKind::Text | FieldKind::Unknown => !value.contains(SHELL_METACHARS),
            FieldKind::Controlled | FieldKind::Flag => !value.contains(STRICT_METACHARS),
            FieldKind::Numeric => !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()),
            FieldKind::Token => true,
        }
    }
}

/// Field kind governed by a `--flag`
pub fn field_kind(flag: &str) -> FieldKind {
    match flag {
        "--notes" | "--description" | "--title" | "--plan" | "--ac" => FieldKind::Text,
        "--check-ac" | "--uncheck-ac" | "--remove-ac" | "--ordinal" => FieldKind::Numeric,
        "--status" | "--priority" | "--assignee" | "--add-label" | "--remove-label"
        | "--labels" | "--dep" | "--parent" => FieldKind::Controlled,
        _ => FieldKind::Unknown,
    }
}

fn is_flag(token: &str) -> bool {
    token.starts_with("--")
}

/// Classify `arg` given the token that precedes it
///
/// Returns the kind plus the governing flag, if any.
pub fn classify<'a>(prev: Option<&'a str>, arg: &str) -> (FieldKind, Option<&'a str>) {
    match prev {
        Some(flag) if is_flag(flag) => (field_kind(flag), Some(flag)),
        _ if is_flag(arg) => (FieldKind::Flag, None),
        _ if TASK_ID.is_match(arg) || KNOWN_TOKENS.iter().any(|t| *t == arg) => {
            (FieldKind::Token, None)
        }
        _ => (FieldKind::Unknown, None),
    }
}

/// Why an argument vector was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub kind: FieldKind,
    pub flag: Option<String>,
    pub value: String,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.flag.as_deref()) {
            (FieldKind::Text, Some(flag)) => write!(
                f,
                "Text field '{}' contains dangerous shell characters: {}",
                flag, self.value
            ),
            (FieldKind::Numeric, Some(flag)) => write!(
                f,
                "Numeric field '{}' contains non-numeric value: {}",
                flag, self.value
            ),
            (FieldKind::Controlled, Some(flag)) => write!(
                f,
                "Field '{}' contains dangerous characters: {}",
                flag, self.value
            ),
            (_, Some(flag)) => write!(
                f,
                "Field '{}' contains potentially dangerous characters: {}",
                flag, self.value
            ),
            (FieldKind::Flag, None) => {
                write!(f, "Flag contains dangerous characters: {}", self.value)
            }
            (_, None) => write!(
                f,
                "Argument contains dangerous shell characters: {}",
                self.value
            ),
        }
    }
}

impl std::error::Error for Rejection {}

/// Context-aware validation of an argument vector
///
/// Stops at the first offending element. Empty elements are skipped.
pub fn validate<S: AsRef<str>>(args: &[S]) -> Result<(), Rejection> {
    let mut prev: Option<&str> = None;

    for arg in args.iter().map(AsRef::as_ref) {
        if arg.is_empty() {
            prev = None;
            continue;
        }

        let (kind, flag) = classify(prev, arg);
        if !kind.admits(arg) {
            return Err(Rejection {
                kind,
                flag: flag.map(str::to_string),
                value: arg.to_string(),
            });
        }
        prev = Some(arg);
    }

    Ok(())
}

/// Context-free check: refuse any metacharacter, parentheses included
pub fn validate_basic<S: AsRef<str>>(args: &[S]) -> bool {
    args.iter()
        .all(|arg| !arg.as_ref().contains(STRICT_METACHARS))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(args: &[&str]) -> String {
        validate(args).unwrap_err().to_string()
    }

    #[test]
    fn test_text_fields_allow_parentheses() {
        let args = ["task", "create", "Title", "--description", "fix (edge case) bug"];
        assert!(validate(&args).is_ok());
    }

    #[test]
    fn test_text_fields_reject_metacharacters() {
        for bad in [";", "|", "&", "`", "$", "\\"] {
            let value = format!("text {} more", bad);
            let args = ["task", "edit", "task-1", "--notes", value.as_str()];
            let msg = reason(&args);
            assert!(msg.contains("'--notes'"), "{}", msg);
            assert!(msg.starts_with("Text field"), "{}", msg);
        }
    }

    #[test]
    fn test_numeric_fields() {
        assert!(validate(&["task", "edit", "task-3", "--check-ac", "12"]).is_ok());

        let msg = reason(&["task", "edit", "task-3", "--check-ac", "12a"]);
        assert_eq!(
            msg,
            "Numeric field '--check-ac' contains non-numeric value: 12a"
        );
        assert!(validate(&["task", "edit", "task-3", "--ordinal", "-1"]).is_err());
    }

    #[test]
    fn test_controlled_fields_reject_parentheses() {
        assert!(validate(&["task", "list", "--status", "In Progress"]).is_ok());
        assert!(validate(&["task", "list", "--assignee", "some_one-else"]).is_ok());

        let msg = reason(&["task", "list", "--status", "done(1)"]);
        assert!(msg.contains("'--status'"));
    }

    #[test]
    fn test_unknown_flag_value_is_conservative() {
        assert!(validate(&["doc", "create", "Setup", "--path", "guides/setup (v2)"]).is_ok());
        let msg = reason(&["doc", "create", "Setup", "--path", "a$b"]);
        assert!(msg.contains("potentially dangerous"));
        assert!(msg.contains("'--path'"));
    }

    #[test]
    fn test_flag_tokens_are_checked() {
        assert!(validate(&["task", "list", "--plain"]).is_ok());
        let msg = reason(&["task", "list", "--pla(in)"]);
        assert!(msg.starts_with("Flag contains"));
    }

    #[test]
    fn test_positional_injection_is_rejected() {
        let msg = reason(&["task", "create", "; rm -rf /", "--plain"]);
        assert!(msg.contains("; rm -rf /"));
    }

    #[test]
    fn test_task_ids_and_keywords_pass() {
        assert!(validate(&["task", "view", "task-12.3.1", "--plain"]).is_ok());
        assert!(validate(&["sequence", "list", "--plain"]).is_ok());
    }

    #[test]
    fn test_classification_uses_previous_token() {
        assert_eq!(
            classify(Some("--title"), "anything"),
            (FieldKind::Text, Some("--title"))
        );
        assert_eq!(classify(Some("task"), "--plain"), (FieldKind::Flag, None));
        assert_eq!(classify(Some("view"), "task-7"), (FieldKind::Token, None));
        assert_eq!(classify(None, "hello"), (FieldKind::Unknown, None));
        assert_eq!(
            classify(Some("--whatever"), "x"),
            (FieldKind::Unknown, Some("--whatever"))
        );
    }

    #[test]
    fn test_plain_alphanumeric_vectors_are_valid() {
        let args = [
            "task", "create", "Add login page", "--description", "Build the form-1",
            "--status", "To Do", "--priority", "high", "--labels", "ui,auth",
            "--ac", "Form renders", "--dep", "task-1,task-2",
        ];
        assert!(validate(&args).is_ok());
    }

    #[test]
    fn test_validate_basic() {
        assert!(validate_basic(&["task", "list", "--plain"]));
        assert!(!validate_basic(&["task", "create", "fix (edge case)"]));
        assert!(!validate_basic(&["a;b"]));
    }
}
