use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    UnrecognizedLine,
    UnrecognizedDirective,
    InvalidDateFormat,
    /// No duration, date or dependency was given; the default duration was assumed.
    MissingTiming,
    IgnoredAttribute,
    ZeroDurationPromoted,
    ScheduleOverride,
}

impl WarningKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningKind::UnrecognizedLine => "unrecognized_line",
            WarningKind::UnrecognizedDirective => "unrecognized_directive",
            WarningKind::InvalidDateFormat => "invalid_date_format",
            WarningKind::MissingTiming => "missing_timing",
            WarningKind::IgnoredAttribute => "ignored_attribute",
            WarningKind::ZeroDurationPromoted => "zero_duration_promoted",
            WarningKind::ScheduleOverride => "schedule_override",
        }
    }
}

/// A non-fatal condition found while building a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub line: Option<usize>,
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    pub fn new(line: Option<usize>, kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            line,
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {line}: {} [{}]", self.message, self.kind.as_str()),
            None => write!(f, "{} [{}]", self.message, self.kind.as_str()),
        }
    }
}

/// Side channel that collects warnings and mirrors each one to the log.
#[derive(Debug, Default, Clone)]
pub struct Warnings {
    items: Vec<Warning>,
}

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: Option<usize>, kind: WarningKind, message: impl Into<String>) {
        let warning = Warning::new(line, kind, message);
        tracing::warn!(line = ?warning.line, kind = warning.kind.as_str(), "{}", warning.message);
        self.items.push(warning);
    }

    pub fn extend(&mut self, other: Warnings) {
        self.items.extend(other.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Warning> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Warning> {
        self.items
    }
}

impl From<Vec<Warning>> for Warnings {
    fn from(items: Vec<Warning>) -> Self {
        Self { items }
    }
}
