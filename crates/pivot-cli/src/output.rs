//! Output layer for pretty/text/JSON parity across every prompt response.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. `--format` / `--json` flag
//! 2. `FORMAT` env var
//! 3. `output` in the user config
//! 4. Default: [`OutputMode::Pretty`] if stdout is a TTY, [`OutputMode::Text`] if piped.
//!
//! Results go to stdout and errors to stderr. In JSON mode every response is
//! one JSON object per line so a driving process can read them as a stream.

use crate::parser::ParseError;
use clap::ValueEnum;
use pivot_core::model::{Case, CasePerson, Document, Tag};
use pivot_core::{CommandError, CommandOutcome, Page, Section, Session, StorageError};
use serde::Serialize;
use std::io::{self, Write};

/// Shared width for human pretty separators.
pub const PRETTY_RULE_WIDTH: usize = 72;

pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Write a section heading followed by a separator.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    pretty_rule(w)
}

pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<13} {}", format!("{key}:"), value.as_ref())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Human-optimized output (sections, visual framing).
    Pretty,
    /// Compact plain text for scripts and pipes.
    Text,
    /// One JSON object per response.
    Json,
}

impl OutputMode {
    /// Map a resolved config value (`pretty`, `text`, `json`) to a mode.
    pub fn from_config(raw: &str) -> Option<Self> {
        match raw {
            "pretty" => Some(Self::Pretty),
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Text => "text",
            Self::Json => "json",
        }
    }

    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// A structured error with optional suggestion and error code.
#[derive(Debug, Serialize)]
pub struct CliError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Machine-readable error code (`E####`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CliError {
    fn coded(message: String, code: pivot_core::ErrorCode) -> Self {
        Self {
            message,
            suggestion: code.hint().map(str::to_string),
            error_code: Some(code.code().to_string()),
        }
    }
}

impl From<&CommandError> for CliError {
    fn from(err: &CommandError) -> Self {
        Self::coded(err.to_string(), err.code())
    }
}

impl From<&ParseError> for CliError {
    fn from(err: &ParseError) -> Self {
        Self::coded(err.to_string(), err.code())
    }
}

impl From<&StorageError> for CliError {
    fn from(err: &StorageError) -> Self {
        Self::coded(err.to_string(), err.code())
    }
}

/// Serialize `value` as one JSON line, or call `human_fn` in pretty/text mode.
pub fn render_to<T: Serialize>(
    w: &mut dyn Write,
    mode: OutputMode,
    value: &T,
    human_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            serde_json::to_writer(&mut *w, value)?;
            writeln!(w)?;
        }
        OutputMode::Pretty | OutputMode::Text => human_fn(value, w)?,
    }
    Ok(())
}

pub fn render_error_to(w: &mut dyn Write, mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({ "error": error });
            serde_json::to_writer(&mut *w, &wrapper)?;
            writeln!(w)?;
        }
        OutputMode::Pretty | OutputMode::Text => {
            match &error.error_code {
                Some(code) => writeln!(w, "error[{code}]: {}", error.message)?,
                None => writeln!(w, "error: {}", error.message)?,
            }
            if let Some(suggestion) = &error.suggestion {
                writeln!(w, "  suggestion: {suggestion}")?;
            }
        }
    }
    Ok(())
}

/// Render an error to stderr.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    render_error_to(&mut out, mode, error)
}

/// Render a plain notice (help text, save confirmation) to stdout.
pub fn render_notice(mode: OutputMode, message: &str) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let value = serde_json::json!({ "ok": true, "message": message });
    render_to(&mut out, mode, &value, |_, w| writeln!(w, "{message}"))
}

/// A command outcome plus what the current page shows.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    #[serde(flatten)]
    pub outcome: &'a CommandOutcome,
    /// The filtered case list, on the list page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cases: Option<Vec<&'a Case>>,
    /// The open case, on a detail page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case: Option<&'a Case>,
}

impl<'a> Report<'a> {
    pub fn new(session: &'a Session, outcome: &'a CommandOutcome) -> Self {
        let view = session.repository().filtered_cases();
        match session.page() {
            Page::List => Self {
                outcome,
                cases: Some(view),
                case: None,
            },
            Page::CaseDetail { case_index, .. } => Self {
                outcome,
                cases: None,
                case: view.get(case_index).copied(),
            },
        }
    }
}

pub fn render_report_to(w: &mut dyn Write, mode: OutputMode, report: &Report<'_>) -> anyhow::Result<()> {
    render_to(w, mode, report, |report, w| match mode {
        OutputMode::Pretty => write_pretty(report, w),
        _ => write_text(report, w),
    })
}

/// Render a command outcome and the resulting page to stdout.
pub fn render_report(mode: OutputMode, report: &Report<'_>) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_report_to(&mut out, mode, report)
}

fn write_text(report: &Report<'_>, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "ok: {}", report.outcome.message)?;
    if let Some(cases) = &report.cases {
        for (i, case) in cases.iter().enumerate() {
            writeln!(w, "{}. {case}", i + 1)?;
        }
    }
    if let (Some(case), Page::CaseDetail { section, .. }) = (report.case, report.outcome.page) {
        writeln!(w, "{case}")?;
        if let Some(section) = section {
            for (i, entry) in section_entries(case, section).iter().enumerate() {
                writeln!(w, "  {}. {entry}", i + 1)?;
            }
        }
    }
    Ok(())
}

fn write_pretty(report: &Report<'_>, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "✓ {}", report.outcome.message)?;
    if let Some(cases) = &report.cases {
        writeln!(w)?;
        pretty_section(w, &format!("Cases ({})", cases.len()))?;
        if cases.is_empty() {
            writeln!(w, "(no cases)")?;
        }
        for (i, case) in cases.iter().enumerate() {
            writeln!(w, "{:>3}. {case}", i + 1)?;
        }
    }
    if let (Some(case), Page::CaseDetail { section, .. }) = (report.case, report.outcome.page) {
        writeln!(w)?;
        pretty_section(w, case.title().as_str())?;
        pretty_kv(w, "Status", case.status().to_string())?;
        pretty_kv(w, "Archived", if case.is_archived() { "yes" } else { "no" })?;
        if !case.description().as_str().is_empty() {
            pretty_kv(w, "Description", case.description().as_str())?;
        }
        let tags: Vec<&str> = case.tags().iter().map(Tag::as_str).collect();
        pretty_kv(w, "Tags", tags.join(", "))?;
        pretty_kv(w, "Suspects", case.suspects().len().to_string())?;
        pretty_kv(w, "Victims", case.victims().len().to_string())?;
        pretty_kv(w, "Witnesses", case.witnesses().len().to_string())?;
        pretty_kv(w, "Documents", case.documents().len().to_string())?;
        if let Some(section) = section {
            let entries = section_entries(case, section);
            writeln!(w)?;
            pretty_section(w, &format!("{section} ({})", entries.len()))?;
            for (i, entry) in entries.iter().enumerate() {
                writeln!(w, "{:>3}. {entry}", i + 1)?;
            }
        }
    }
    Ok(())
}

fn section_entries(case: &Case, section: Section) -> Vec<String> {
    let persons = |persons: &[CasePerson]| -> Vec<String> {
        persons.iter().map(ToString::to_string).collect()
    };
    match section {
        Section::Suspects => persons(case.suspects()),
        Section::Victims => persons(case.victims()),
        Section::Witnesses => persons(case.witnesses()),
        Section::Documents => case.documents().iter().map(Document::to_string).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pivot_core::model::{Name, Role, Title};
    use pivot_core::{Command, Index};

    fn session() -> Session {
        let case = Case::new(Title::new("Theft at Library").expect("valid"))
            .with_tags([Tag::new("urgent").expect("valid")].into_iter().collect())
            .with_persons(
                Role::Suspect,
                vec![CasePerson::new(Name::new("John Doe").expect("valid"))],
            );
        Session::new(vec![case]).expect("unique")
    }

    fn render(mode: OutputMode, session: &mut Session, command: &Command) -> String {
        let outcome = session.execute(command).expect("command succeeds");
        let mut buf = Vec::new();
        render_report_to(&mut buf, mode, &Report::new(session, &outcome)).expect("render");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn from_config_maps_known_modes() {
        assert_eq!(OutputMode::from_config("json"), Some(OutputMode::Json));
        assert_eq!(OutputMode::from_config("text"), Some(OutputMode::Text));
        assert_eq!(OutputMode::from_config("pretty"), Some(OutputMode::Pretty));
        assert_eq!(OutputMode::from_config("yaml"), None);
    }

    #[test]
    fn text_list_is_numbered_from_one() {
        let mut session = session();
        let out = render(
            OutputMode::Text,
            &mut session,
            &Command::ListCases { archived: false },
        );
        assert_eq!(
            out,
            "ok: Listed all cases\n1. Theft at Library (Status: active) [urgent]\n"
        );
    }

    #[test]
    fn text_detail_lists_active_section() {
        let mut session = session();
        session
            .execute(&Command::OpenCase {
                index: Index::from_zero_based(0),
            })
            .expect("open");
        let out = render(
            OutputMode::Text,
            &mut session,
            &Command::ViewSection(Section::Suspects),
        );
        assert!(out.contains("  1. John Doe"), "{out}");
    }

    #[test]
    fn pretty_detail_shows_counts() {
        let mut session = session();
        let out = render(
            OutputMode::Pretty,
            &mut session,
            &Command::OpenCase {
                index: Index::from_zero_based(0),
            },
        );
        assert!(out.starts_with("✓ Opened case: Theft at Library"));
        assert!(out.contains("Suspects:     1"), "{out}");
        assert!(out.contains("Tags:         urgent"), "{out}");
    }

    #[test]
    fn json_report_is_one_line() {
        let mut session = session();
        let out = render(
            OutputMode::Json,
            &mut session,
            &Command::ListCases { archived: false },
        );
        assert_eq!(out.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(&out).expect("json");
        assert_eq!(value["message"], "Listed all cases");
        assert_eq!(value["mutated"], false);
        assert_eq!(value["page"]["page"], "list");
        assert_eq!(value["cases"][0]["title"], "Theft at Library");
        assert!(value.get("case").is_none());
    }

    #[test]
    fn error_carries_code_and_hint() {
        let err = CliError::from(&CommandError::NoUndoableState);
        assert_eq!(err.error_code.as_deref(), Some("E3001"));
        assert!(err.suggestion.is_none());

        let mut buf = Vec::new();
        render_error_to(&mut buf, OutputMode::Text, &err).expect("render");
        assert_eq!(
            String::from_utf8(buf).expect("utf8"),
            "error[E3001]: there is no command to undo\n"
        );
    }

    #[test]
    fn json_error_is_wrapped() {
        let err = CliError::from(&CommandError::NothingToEdit);
        let mut buf = Vec::new();
        render_error_to(&mut buf, OutputMode::Json, &err).expect("render");
        let value: serde_json::Value = serde_json::from_slice(&buf).expect("json");
        assert_eq!(value["error"]["error_code"], "E2008");
        assert_eq!(
            value["error"]["suggestion"],
            "Provide at least one field to change."
        );
    }
}
