//! Mermaid-style gantt text to raw task records.
//!
//! ```text
//! gantt
//!     title Launch
//!     dateFormat YYYY-MM-DD
//!     excludes weekends
//!     section Build
//!     Design      : d1, done, 2024-01-01, 3d
//!     Implement   : impl, after d1, 5d
//!     milestone Go live : m1, after impl
//! ```
//!
//! Soft problems become [`Warning`](crate::warning::Warning)s; the first
//! malformed or conflicting task line aborts the parse.

pub mod date_format;
pub mod lexer;
pub mod statement;

pub use date_format::DateFormat;
pub use lexer::{ClassifiedLine, Lexer, LineKind};

use crate::calendar::CalendarMode;
use crate::config::PlanConfig;
use crate::error::ParseError;
use crate::task::RawTaskRecord;
use crate::warning::{WarningKind, Warnings};
use statement::{Directive, StatementContext};

#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    pub title: Option<String>,
    pub date_format: DateFormat,
    /// Set when the text itself asked for a calendar (`excludes weekends`).
    pub calendar_mode: Option<CalendarMode>,
    pub sections: Vec<String>,
    pub records: Vec<RawTaskRecord>,
    pub warnings: Warnings,
}

pub fn parse_document(text: &str, config: &PlanConfig) -> Result<ParsedDocument, ParseError> {
    let mut doc = ParsedDocument {
        date_format: DateFormat::from_pattern(&config.date_format).unwrap_or_default(),
        ..ParsedDocument::default()
    };
    let mut current_section: Option<String> = None;

    for line in Lexer::new(text, &config.comment_marker) {
        match line.kind {
            LineKind::Blank | LineKind::Comment => {}
            LineKind::Directive => apply_directive(&mut doc, &line),
            LineKind::Section => match statement::parse_section(&line) {
                Some(name) => {
                    if !doc.sections.contains(&name) {
                        doc.sections.push(name.clone());
                    }
                    current_section = Some(name);
                }
                None => doc.warnings.push(
                    Some(line.line_number),
                    WarningKind::UnrecognizedLine,
                    "section without a name ignored",
                ),
            },
            LineKind::Task => {
                let ctx = StatementContext {
                    date_format: &doc.date_format,
                    section: current_section.as_deref(),
                    default_duration_days: config.default_duration_days,
                };
                let record = statement::parse_task_line(&line, &ctx, &mut doc.warnings)?;
                doc.records.push(record);
            }
            LineKind::Unknown => doc.warnings.push(
                Some(line.line_number),
                WarningKind::UnrecognizedLine,
                format!("unrecognized line '{}' ignored", line.content()),
            ),
        }
    }

    tracing::debug!(
        records = doc.records.len(),
        warnings = doc.warnings.len(),
        "parsed gantt document"
    );
    Ok(doc)
}

fn apply_directive(doc: &mut ParsedDocument, line: &ClassifiedLine<'_>) {
    let line_number = Some(line.line_number);
    let directive = statement::parse_directive(line);
    if let Some((kind, message)) = statement::directive_leftover(line, &directive) {
        doc.warnings.push(line_number, kind, message);
    }
    match directive {
        Directive::Header => {}
        Directive::Title(title) => {
            doc.title = if title.is_empty() { None } else { Some(title) };
        }
        Directive::DateFormat(pattern) => match DateFormat::from_pattern(&pattern) {
            Ok(format) => doc.date_format = format,
            Err(reason) => doc.warnings.push(
                line_number,
                WarningKind::InvalidDateFormat,
                format!("{reason}; keeping {}", doc.date_format.pattern()),
            ),
        },
        Directive::ExcludeWeekends => doc.calendar_mode = Some(CalendarMode::BusinessDay),
        Directive::Unrecognized(keyword) => doc.warnings.push(
            line_number,
            WarningKind::UnrecognizedDirective,
            format!("directive '{keyword}' is not supported and was ignored"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_shape_the_document() {
        let text = "gantt\n  title Launch\n  dateFormat DD/MM/YYYY\n  excludes weekends\n  axisFormat %d\n  section Build\n  Design : d1, 01/02/2024, 2d\n";
        let doc = parse_document(text, &PlanConfig::default()).unwrap();
        assert_eq!(doc.title.as_deref(), Some("Launch"));
        assert_eq!(doc.date_format.pattern(), "DD/MM/YYYY");
        assert_eq!(doc.calendar_mode, Some(CalendarMode::BusinessDay));
        assert_eq!(doc.sections, vec!["Build".to_string()]);
        assert_eq!(doc.records.len(), 1);
        assert_eq!(doc.records[0].start, chrono::NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(doc.warnings.len(), 1);
    }

    #[test]
    fn invalid_date_format_keeps_previous() {
        let doc = parse_document("dateFormat HH:mm\nA : a, 2024-01-01, 1d", &PlanConfig::default())
            .unwrap();
        assert_eq!(doc.date_format.pattern(), "YYYY-MM-DD");
        let kinds: Vec<WarningKind> = doc.warnings.iter().map(|w| w.kind).collect();
        assert_eq!(kinds, vec![WarningKind::InvalidDateFormat]);
    }

    #[test]
    fn unknown_lines_warn_and_continue() {
        let doc = parse_document("gantt\nnonsense here\nA : a, 1d", &PlanConfig::default()).unwrap();
        assert_eq!(doc.records.len(), 1);
        let warning = doc.warnings.iter().next().unwrap();
        assert_eq!(warning.kind, WarningKind::UnrecognizedLine);
        assert_eq!(warning.line, Some(2));
    }

    #[test]
    fn directive_named_tasks_are_not_lost_silently() {
        let doc = parse_document("gantt review : g1, 2d\ntitle page : t1, 1d\nA : a, 1d", &PlanConfig::default())
            .unwrap();
        let kinds: Vec<(Option<usize>, WarningKind)> =
            doc.warnings.iter().map(|w| (w.line, w.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                (Some(1), WarningKind::IgnoredAttribute),
                (Some(2), WarningKind::UnrecognizedLine),
            ]
        );
        assert_eq!(doc.records.len(), 1);
    }

    #[test]
    fn first_fatal_error_aborts() {
        let err = parse_document("A : a, 1d\nB : b, 2d, 3d\nC : c, ???", &PlanConfig::default())
            .unwrap_err();
        assert!(matches!(err, ParseError::ConflictingAttributes { line: Some(2), .. }));
    }
}
