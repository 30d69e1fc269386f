use super::date_format::DateFormat;
use super::lexer::{ClassifiedLine, MILESTONE_KEYWORD, SECTION_KEYWORD};
use crate::error::ParseError;
use crate::task::{RawTaskRecord, TaskStatus};
use crate::task_validation;
use crate::warning::{WarningKind, Warnings};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*([dw])$").expect("duration pattern"));
static DATE_LIKE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[-/.]\d+").expect("date-like pattern"));
static IDENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{N}_][\p{L}\p{N}_\-]*$").expect("identifier pattern"));

/// What a directive line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Header,
    Title(String),
    DateFormat(String),
    ExcludeWeekends,
    Unrecognized(String),
}

/// Keyword and argument of a directive line; `title: x` and `title x` agree.
fn directive_parts(content: &str) -> (&str, &str) {
    let (keyword, rest) = match content.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (content, ""),
    };
    (
        keyword.trim_end_matches(':'),
        rest.trim_start_matches(':').trim(),
    )
}

pub fn parse_directive(line: &ClassifiedLine<'_>) -> Directive {
    let (keyword, rest) = directive_parts(line.content());

    match keyword {
        "gantt" => Directive::Header,
        "title" => Directive::Title(rest.to_string()),
        "dateFormat" => Directive::DateFormat(rest.to_string()),
        "excludes" if rest.eq_ignore_ascii_case("weekends") => Directive::ExcludeWeekends,
        other => Directive::Unrecognized(other.to_string()),
    }
}

/// Warning for a directive line whose argument the directive cannot use.
///
/// Catches task lines whose name happens to start with a keyword, such as
/// `gantt review : g1, 2d` or `title page : t1, 1d`.
pub fn directive_leftover(
    line: &ClassifiedLine<'_>,
    directive: &Directive,
) -> Option<(WarningKind, String)> {
    let (keyword, rest) = directive_parts(line.content());
    match directive {
        Directive::Header if !rest.is_empty() => Some((
            WarningKind::IgnoredAttribute,
            format!("text after '{keyword}' ignored: '{rest}'"),
        )),
        Directive::Title(_) | Directive::DateFormat(_) if looks_like_task_statement(rest) => {
            Some((
                WarningKind::UnrecognizedLine,
                format!(
                    "line read as a '{keyword}' directive although it looks like a task statement; rename the task if one was meant"
                ),
            ))
        }
        _ => None,
    }
}

fn looks_like_task_statement(text: &str) -> bool {
    text.split_once(':')
        .is_some_and(|(name, attrs)| !name.trim().is_empty() && !attrs.trim().is_empty())
}

/// Section name, or `None` when the line names no section.
pub fn parse_section(line: &ClassifiedLine<'_>) -> Option<String> {
    let content = line.content();
    let name = content
        .strip_prefix(SECTION_KEYWORD)
        .unwrap_or(content)
        .trim_start_matches(':')
        .trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Per-document state the statement parser reads.
#[derive(Debug, Clone)]
pub struct StatementContext<'a> {
    pub date_format: &'a DateFormat,
    pub section: Option<&'a str>,
    pub default_duration_days: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Attribute {
    Status(TaskStatus),
    Crit,
    Milestone,
    After(Vec<String>),
    Duration(u32),
    Date(NaiveDate),
    Identifier(String),
}

fn malformed(line: &ClassifiedLine<'_>, reason: impl Into<String>) -> ParseError {
    ParseError::MalformedTask {
        line: line.line_number,
        text: line.content().to_string(),
        reason: reason.into(),
    }
}

fn classify_attribute(
    attr: &str,
    line: &ClassifiedLine<'_>,
    date_format: &DateFormat,
) -> Result<Attribute, ParseError> {
    match attr {
        "crit" => return Ok(Attribute::Crit),
        "milestone" => return Ok(Attribute::Milestone),
        _ => {}
    }
    if let Some(status) = TaskStatus::from_keyword(attr) {
        return Ok(Attribute::Status(status));
    }

    if attr == "after" {
        return Err(malformed(line, "'after' must name at least one task"));
    }
    if let Some(rest) = attr.strip_prefix("after") {
        if rest.starts_with(char::is_whitespace) {
            let targets = rest.split_whitespace().map(str::to_string).collect();
            return Ok(Attribute::After(targets));
        }
    }

    if let Some(caps) = DURATION_RE.captures(attr) {
        let amount: u32 = caps[1]
            .parse()
            .map_err(|_| malformed(line, format!("duration '{attr}' is too large")))?;
        let days = match &caps[2] {
            "w" => amount.checked_mul(7),
            _ => Some(amount),
        }
        .ok_or_else(|| malformed(line, format!("duration '{attr}' is too large")))?;
        return Ok(Attribute::Duration(days));
    }

    if DATE_LIKE_RE.is_match(attr) {
        return date_format.parse(attr).map(Attribute::Date).ok_or_else(|| {
            malformed(
                line,
                format!(
                    "'{attr}' is not a valid date in format {}",
                    date_format.pattern()
                ),
            )
        });
    }
    if let Some(date) = date_format.parse(attr) {
        return Ok(Attribute::Date(date));
    }

    if IDENT_RE.is_match(attr) {
        return Ok(Attribute::Identifier(attr.to_string()));
    }

    Err(malformed(line, format!("unrecognized attribute '{attr}'")))
}

/// Splits `<name> : <attrs>` and strips a leading milestone marker.
fn split_statement<'a>(line: &ClassifiedLine<'a>) -> Result<(&'a str, bool, &'a str), ParseError> {
    let content = line.content();
    let (name_part, attrs) = content
        .split_once(':')
        .ok_or_else(|| malformed(line, "expected '<name> : <attributes>'"))?;
    let name_part = name_part.trim();

    let (name, marker) = match name_part.strip_prefix(MILESTONE_KEYWORD) {
        Some(rest) if rest.starts_with(char::is_whitespace) && !rest.trim().is_empty() => {
            (rest.trim(), true)
        }
        _ => (name_part, false),
    };

    if name.is_empty() {
        return Err(malformed(line, "task name is empty"));
    }
    Ok((name, marker, attrs.trim()))
}

pub fn parse_task_line(
    line: &ClassifiedLine<'_>,
    ctx: &StatementContext<'_>,
    warnings: &mut Warnings,
) -> Result<RawTaskRecord, ParseError> {
    let (name, milestone_marker, attr_text) = split_statement(line)?;
    if attr_text.is_empty() {
        return Err(malformed(line, "attribute list is empty"));
    }

    let mut record = RawTaskRecord::new(name);
    record.section = ctx.section.map(str::to_string);
    record.line = Some(line.line_number);
    record.is_milestone = milestone_marker;

    let mut dates: Vec<NaiveDate> = Vec::new();
    let mut durations: Vec<u32> = Vec::new();
    let mut has_after = false;
    let mut continuing_after = false;

    for attr in attr_text.split(',') {
        let attr = attr.trim();
        if attr.is_empty() {
            return Err(malformed(line, "empty attribute"));
        }
        record.raw_attributes.push(attr.to_string());

        let parsed = classify_attribute(attr, line, ctx.date_format)?;
        if let Attribute::Identifier(token) = &parsed {
            if continuing_after {
                record.dependencies.push(token.clone());
                continue;
            }
        }
        continuing_after = false;

        match parsed {
            Attribute::Status(status) => record.status = status,
            Attribute::Crit => record.flagged_critical = true,
            Attribute::Milestone => record.is_milestone = true,
            Attribute::After(targets) => {
                record.dependencies.extend(targets);
                has_after = true;
                continuing_after = true;
            }
            Attribute::Duration(days) => durations.push(days),
            Attribute::Date(date) => dates.push(date),
            Attribute::Identifier(id) => {
                if let Some(existing) = &record.id {
                    return Err(malformed(
                        line,
                        format!("task already has identifier '{existing}', found '{id}'"),
                    ));
                }
                record.id = Some(id);
            }
        }
    }

    let conflict = |reason: &str| ParseError::ConflictingAttributes {
        line: Some(line.line_number),
        task: record.label().to_string(),
        reason: reason.to_string(),
    };

    if dates.len() > 2 {
        return Err(conflict("more than two dates"));
    }
    if durations.len() > 1 {
        return Err(conflict("more than one duration"));
    }
    if dates.len() == 2 && !durations.is_empty() {
        return Err(conflict("start date, end date and duration given together"));
    }

    match dates.as_slice() {
        [start, end] => {
            record.start = Some(*start);
            record.end = Some(*end);
        }
        // `after x, <date>` pins the end, as in mermaid
        [date] if has_after && durations.is_empty() => record.end = Some(*date),
        [date] => record.start = Some(*date),
        _ => {}
    }
    record.duration_days = durations.first().copied();

    if record.is_milestone {
        if let Some(days) = record.duration_days.filter(|days| *days != 0) {
            warnings.push(
                Some(line.line_number),
                WarningKind::IgnoredAttribute,
                format!(
                    "milestone '{}' ignores its {days}d duration",
                    record.label()
                ),
            );
        }
        record.duration_days = Some(0);
    }

    task_validation::validate_record(&record)?;
    task_validation::apply_default_duration(&mut record, ctx.default_duration_days, warnings);
    Ok(record)
}
