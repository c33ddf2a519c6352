//! Structured diagnostics: `Message`, `MessageBuffer`, and its query API.

use forge_core::{Range, Severity};
use std::cmp::Ordering;

#[derive(Debug, Clone)]
pub struct Message {
    pub severity: Severity,
    pub code: Option<&'static str>,
    pub range: Option<Range>,
    pub log_path: &'static str,
    pub log_line: u32,
    pub text: String,
    pub children: Vec<Message>,
}

impl Message {
    fn sort_key(&self) -> (std::cmp::Reverse<Severity>, PathKey, u32, std::cmp::Reverse<u32>, &'static str, u32, &str) {
        let (path, offset, length) = match &self.range {
            Some(range) => (
                PathKey::from(range.start.path.as_deref()),
                range.start.offset,
                range.length,
            ),
            None => (PathKey::NoPath, 0, 0),
        };
        (std::cmp::Reverse(self.severity), path, offset, std::cmp::Reverse(length), self.log_path, self.log_line, self.text.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum PathKey {
    NoPath,
    Path(String),
}

impl From<Option<&str>> for PathKey {
    fn from(path: Option<&str>) -> Self {
        match path {
            None => PathKey::NoPath,
            Some(p) => PathKey::Path(p.to_string()),
        }
    }
}

/// A handle to a message already in the buffer, used to attach children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHandle(usize);

#[derive(Debug, Clone, Default)]
pub struct Query<'a> {
    pub with_severity: Option<Severity>,
    pub with_code: Option<&'a str>,
    pub with_text: Option<&'a str>,
}

impl<'a> Query<'a> {
    pub fn new() -> Self {
        Query::default()
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.with_severity = Some(severity);
        self
    }

    pub fn with_code(mut self, code: &'a str) -> Self {
        self.with_code = Some(code);
        self
    }

    pub fn with_text(mut self, text: &'a str) -> Self {
        self.with_text = Some(text);
        self
    }

    fn matches(&self, message: &Message) -> bool {
        if let Some(severity) = self.with_severity {
            if message.severity != severity {
                return false;
            }
        }
        if let Some(code) = self.with_code {
            if message.code != Some(code) {
                return false;
            }
        }
        if let Some(text) = self.with_text {
            if message.text != text {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingleResult {
    Single,
    None,
    Multiple,
}

/// Owns a set of top-level messages plus running counters. Child messages
/// are attached to a specific parent and are never top-level members.
#[derive(Debug, Default)]
pub struct MessageBuffer {
    messages: Vec<Message>,
    max_line_number: u32,
    pub message_count: u32,
    pub error_count: u32,
    pub warning_count: u32,
}

impl MessageBuffer {
    pub fn new() -> Self {
        MessageBuffer::default()
    }

    fn update_counters(&mut self, severity: Severity, range: Option<&Range>) {
        self.message_count += 1;
        if severity.is_error() {
            self.error_count += 1;
        }
        if severity == Severity::Warning {
            self.warning_count += 1;
        }
        if let Some(range) = range {
            self.max_line_number = self.max_line_number.max(range.start.line);
        }
    }

    #[track_caller]
    pub fn emit(
        &mut self,
        severity: Severity,
        code: Option<&'static str>,
        range: Option<Range>,
        text: impl Into<String>,
    ) -> MessageHandle {
        let location = std::panic::Location::caller();
        let text = text.into();
        if severity == Severity::InternalError {
            panic!("internal error: {text}");
        }
        self.update_counters(severity, range.as_ref());
        self.messages.push(Message {
            severity,
            code,
            range,
            log_path: location.file(),
            log_line: location.line(),
            text,
            children: Vec::new(),
        });
        MessageHandle(self.messages.len() - 1)
    }

    #[track_caller]
    pub fn emit_child(
        &mut self,
        parent: MessageHandle,
        severity: Severity,
        code: Option<&'static str>,
        range: Option<Range>,
        text: impl Into<String>,
    ) {
        let location = std::panic::Location::caller();
        let text = text.into();
        self.update_counters(severity, range.as_ref());
        self.messages[parent.0].children.push(Message {
            severity,
            code,
            range,
            log_path: location.file(),
            log_line: location.line(),
            text,
            children: Vec::new(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    fn matching<'a>(&'a self, query: &Query<'_>) -> impl Iterator<Item = &'a Message> + 'a {
        self.messages.iter().filter(move |m| query.matches(m))
    }

    pub fn query_count(&self, query: &Query<'_>) -> usize {
        self.matching(query).count()
    }

    pub fn query_all(&self, query: &Query<'_>) -> Vec<&Message> {
        self.matching(query).collect()
    }

    /// Returns `Single` if exactly one top-level message matches, `None` if
    /// none do, and `Multiple` as soon as a second match is found — the scan
    /// stops early rather than counting the whole buffer, so which second
    /// match triggered `Multiple` is not guaranteed to be stable.
    pub fn query_single(&self, query: &Query<'_>) -> (SingleResult, Option<&Message>) {
        let mut found: Option<&Message> = None;
        for message in self.messages.iter() {
            if query.matches(message) {
                if found.is_some() {
                    return (SingleResult::Multiple, None);
                }
                found = Some(message);
            }
        }
        match found {
            Some(message) => (SingleResult::Single, Some(message)),
            None => (SingleResult::None, None),
        }
    }

    /// Sorts a snapshot of messages by the ordering specified for rendering:
    /// severity descending, path ascending (no-path first), offset
    /// ascending, length descending, log path ascending, log line
    /// ascending, text ascending.
    pub fn sorted_messages(&self) -> Vec<&Message> {
        let mut messages: Vec<&Message> = self.messages.iter().collect();
        messages.sort_by(|a, b| {
            a.sort_key()
                .partial_cmp(&b.sort_key())
                .unwrap_or(Ordering::Equal)
        });
        messages
    }

    /// Renders all messages at or above `minimum_severity` to `out`, each
    /// followed by its children, then a summary line.
    pub fn render(&self, out: &mut impl std::fmt::Write, minimum_severity: Severity, color: bool) -> std::fmt::Result {
        let width = self.max_line_number.to_string().len();
        for message in self.sorted_messages() {
            if message.severity < minimum_severity {
                continue;
            }
            render_one(out, message, width, color)?;
            for child in &message.children {
                render_one(out, child, width, color)?;
            }
        }
        if self.error_count > 0 {
            let summary = format!("Failed with {} error(s) and {} warning(s).", self.error_count, self.warning_count);
            if color {
                writeln!(out, "\x1b[1;31m{summary}\x1b[0m")?;
            } else {
                writeln!(out, "{summary}")?;
            }
        } else if self.warning_count > 0 {
            let summary = format!("Succeeded with {} warning(s).", self.warning_count);
            if color {
                writeln!(out, "\x1b[1;93m{summary}\x1b[0m")?;
            } else {
                writeln!(out, "{summary}")?;
            }
        } else {
            writeln!(out, "Succeeded.")?;
        }
        Ok(())
    }
}

fn render_one(out: &mut impl std::fmt::Write, message: &Message, line_width: usize, _color: bool) -> std::fmt::Result {
    match &message.range {
        Some(range) => writeln!(
            out,
            "{:>width$}:{}: {}: {}",
            range.start.line,
            range.start.column,
            message.severity,
            message.text,
            width = line_width
        ),
        None => writeln!(out, "{:>width$}: {}: {}", "", message.severity, message.text, width = line_width),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::Location;

    fn range_at(line: u32, column: u32) -> Range {
        Range::new(Location::new(None, line, column, 0), 1)
    }

    #[test]
    fn query_count_matches_query_all_length() {
        let mut buffer = MessageBuffer::new();
        buffer.emit(Severity::Error, Some("ET-5"), None, "a");
        buffer.emit(Severity::Warning, Some("ET-5"), None, "b");
        let query = Query::new().with_code("ET-5");
        assert_eq!(buffer.query_count(&query), buffer.query_all(&query).len());
    }

    #[test]
    fn query_single_is_multiple_iff_two_or_more_match() {
        let mut buffer = MessageBuffer::new();
        buffer.emit(Severity::FatalError, None, None, "Argument '--long-argument <value>' must have a value passed");
        let query = Query::new().with_severity(Severity::FatalError);
        assert_eq!(buffer.query_count(&query), 1);
        assert_eq!(buffer.query_single(&query).0, SingleResult::Single);

        buffer.emit(Severity::FatalError, None, None, "another fatal error");
        assert_eq!(buffer.query_single(&query).0, SingleResult::Multiple);
    }

    #[test]
    fn query_single_is_none_when_nothing_matches() {
        let buffer = MessageBuffer::new();
        let query = Query::new().with_severity(Severity::Error);
        assert_eq!(buffer.query_single(&query).0, SingleResult::None);
    }

    #[test]
    fn rendering_order_is_severity_desc_then_offset_asc() {
        let mut buffer = MessageBuffer::new();
        buffer.emit(Severity::Warning, None, Some(range_at(5, 1)), "later warning");
        buffer.emit(Severity::Error, None, Some(range_at(2, 1)), "earlier error");
        buffer.emit(Severity::Error, None, Some(range_at(1, 1)), "earliest error");
        let sorted = buffer.sorted_messages();
        assert_eq!(sorted[0].text, "earliest error");
        assert_eq!(sorted[1].text, "earlier error");
        assert_eq!(sorted[2].text, "later warning");
    }

    #[test]
    fn counters_track_errors_and_warnings_separately() {
        let mut buffer = MessageBuffer::new();
        buffer.emit(Severity::Error, None, None, "e");
        buffer.emit(Severity::Warning, None, None, "w");
        buffer.emit(Severity::Note, None, None, "n");
        assert_eq!(buffer.message_count, 3);
        assert_eq!(buffer.error_count, 1);
        assert_eq!(buffer.warning_count, 1);
    }

    #[test]
    #[should_panic(expected = "internal error")]
    fn internal_error_panics_immediately() {
        let mut buffer = MessageBuffer::new();
        buffer.emit(Severity::InternalError, None, None, "unreachable state");
    }

    #[test]
    fn children_do_not_affect_top_level_ordering() {
        let mut buffer = MessageBuffer::new();
        let parent = buffer.emit(Severity::Error, None, Some(range_at(3, 1)), "parent");
        buffer.emit_child(parent, Severity::Note, None, None, "child note");
        assert_eq!(buffer.sorted_messages().len(), 1);
        assert_eq!(buffer.message_count, 2);
    }
}
