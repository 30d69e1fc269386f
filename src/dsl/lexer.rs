//! Line classification for gantt text.
//!
//! The lexer never fails: anything it cannot place is reported as
//! [`LineKind::Unknown`] and left for the statement parser to warn about.

/// Keywords that start a directive line.
pub const DIRECTIVE_KEYWORDS: [&str; 14] = [
    "gantt",
    "title",
    "dateFormat",
    "axisFormat",
    "excludes",
    "includes",
    "todayMarker",
    "tickInterval",
    "weekday",
    "inclusiveEndDates",
    "topAxis",
    "displayMode",
    "accTitle",
    "accDescr",
];

pub const SECTION_KEYWORD: &str = "section";
pub const MILESTONE_KEYWORD: &str = "milestone";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    Directive,
    Section,
    Task,
    Comment,
    Blank,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedLine<'a> {
    pub kind: LineKind,
    /// 1-based.
    pub line_number: usize,
    pub raw: &'a str,
}

impl<'a> ClassifiedLine<'a> {
    pub fn content(&self) -> &'a str {
        self.raw.trim()
    }
}

/// Classifies the lines of a document. Iterating twice yields the same lines.
#[derive(Debug, Clone, Copy)]
pub struct Lexer<'a> {
    text: &'a str,
    comment_marker: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str, comment_marker: &'a str) -> Self {
        Self {
            text,
            comment_marker,
        }
    }

    pub fn iter(&self) -> Lines<'a> {
        Lines {
            inner: self.text.lines().enumerate(),
            comment_marker: self.comment_marker,
        }
    }

    pub fn classify(&self, raw: &str) -> LineKind {
        classify_line(raw, self.comment_marker)
    }
}

impl<'a> IntoIterator for Lexer<'a> {
    type Item = ClassifiedLine<'a>;
    type IntoIter = Lines<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &Lexer<'a> {
    type Item = ClassifiedLine<'a>;
    type IntoIter = Lines<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct Lines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
    comment_marker: &'a str,
}

impl<'a> Iterator for Lines<'a> {
    type Item = ClassifiedLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (idx, raw) = self.inner.next()?;
        Some(ClassifiedLine {
            kind: classify_line(raw, self.comment_marker),
            line_number: idx + 1,
            raw,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

fn first_word(line: &str) -> &str {
    line.split_whitespace().next().unwrap_or("")
}

pub fn classify_line(raw: &str, comment_marker: &str) -> LineKind {
    let line = raw.trim();
    if line.is_empty() {
        return LineKind::Blank;
    }
    if line.starts_with(comment_marker) {
        return LineKind::Comment;
    }

    let word = first_word(line);
    // `title: x` still reads as a directive keyword followed by punctuation
    let keyword = word.trim_end_matches(':');
    if DIRECTIVE_KEYWORDS.contains(&keyword) {
        return LineKind::Directive;
    }
    if keyword == SECTION_KEYWORD {
        return LineKind::Section;
    }

    match line.split_once(':') {
        Some((name, _)) if !name.trim().is_empty() => LineKind::Task,
        _ => LineKind::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "gantt\n    title Launch\n\n%% a comment\n    section Build\n    Design : d1, 3d\nwhat is this\n";

    #[test]
    fn classifies_each_kind() {
        let kinds: Vec<LineKind> = Lexer::new(DOC, "%%").iter().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LineKind::Directive,
                LineKind::Directive,
                LineKind::Blank,
                LineKind::Comment,
                LineKind::Section,
                LineKind::Task,
                LineKind::Unknown,
            ]
        );
    }

    #[test]
    fn line_numbers_are_one_based_and_restartable() {
        let lexer = Lexer::new(DOC, "%%");
        let first: Vec<usize> = lexer.iter().map(|l| l.line_number).collect();
        let second: Vec<usize> = lexer.into_iter().map(|l| l.line_number).collect();
        assert_eq!(first, second);
        assert_eq!(first.first(), Some(&1));
        assert_eq!(first.last(), Some(&7));
    }

    #[test]
    fn milestone_lines_are_tasks() {
        assert_eq!(classify_line("milestone Go live : m1, after d1", "%%"), LineKind::Task);
    }

    #[test]
    fn custom_comment_marker() {
        assert_eq!(classify_line("# note", "#"), LineKind::Comment);
        assert_eq!(classify_line("# note", "%%"), LineKind::Unknown);
    }

    #[test]
    fn colon_without_name_is_unknown() {
        assert_eq!(classify_line(": d1, 3d", "%%"), LineKind::Unknown);
    }
}
