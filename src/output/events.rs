//! Event-stream framing of crawl progress
//!
//! Each progress line becomes one `data:` event. When the crawl finishes, a
//! terminal `result` event carries the serialized outcome. Hosting layers can
//! relay these frames verbatim to a remote observer.

use crate::output::outcome::CrawlOutcome;
use crate::output::traits::ProgressSink;
use crate::HarvestError;
use std::fmt;
use std::io::Write;
use std::sync::Mutex;

/// Formats a progress line as one event frame
///
/// Line breaks inside the line are flattened so each line stays one event.
pub fn progress_event(line: &str) -> String {
    let flat: String = line
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    format!("data: {}\n\n", flat)
}

/// Formats the terminal event carrying the JSON outcome
pub fn result_event(outcome: &CrawlOutcome) -> Result<String, serde_json::Error> {
    Ok(format!("event: result\ndata: {}\n\n", outcome.to_json()?))
}

/// Writes the terminal result event and flushes the writer
pub fn write_result_event<W: Write>(writer: &mut W, outcome: &CrawlOutcome) -> Result<(), HarvestError> {
    writer.write_all(result_event(outcome)?.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Writes a closing frame for a crawl that failed, and flushes the writer
///
/// Observers see the failure as one last progress line; no result event follows.
pub fn write_error_event<W: Write, E: fmt::Display>(writer: &mut W, error: &E) -> Result<(), HarvestError> {
    let line = format!("Error while crawling: {}", error);
    writer.write_all(progress_event(&line).as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// `ProgressSink` that writes each line as an event frame
pub struct EventStreamSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> EventStreamSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Returns the underlying writer
    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> ProgressSink for EventStreamSink<W> {
    fn notify(&self, line: &str) {
        let mut writer = match self.writer.lock() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        };

        let frame = progress_event(line);
        if let Err(e) = writer
            .write_all(frame.as_bytes())
            .and_then(|_| writer.flush())
        {
            tracing::warn!("Failed to write progress event: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::ThreadInfo;
    use chrono::Utc;

    #[test]
    fn test_progress_event_frame() {
        assert_eq!(progress_event("Total pages: 3"), "data: Total pages: 3\n\n");
    }

    #[test]
    fn test_progress_event_flattens_newlines() {
        assert_eq!(progress_event("a\nb\r\nc"), "data: a b  c\n\n");
    }

    #[test]
    fn test_sink_writes_frames_in_order() {
        let sink = EventStreamSink::new(Vec::new());
        sink.notify("first");
        sink.notify("second");

        let written = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(written, "data: first\n\ndata: second\n\n");
    }

    #[test]
    fn test_result_event() {
        let now = Utc::now();
        let outcome = CrawlOutcome {
            base_url: "https://example.org/t1".to_string(),
            thread: ThreadInfo::unknown(),
            records: vec![],
            log: vec![],
            pages_attempted: 1,
            failed_pages: vec![],
            started_at: now,
            finished_at: now,
        };

        let mut buffer = Vec::new();
        write_result_event(&mut buffer, &outcome).unwrap();
        let written = String::from_utf8(buffer).unwrap();

        assert!(written.starts_with("event: result\ndata: {"));
        assert!(written.ends_with("}\n\n"));
        assert_eq!(written.matches('\n').count(), 3);
        assert!(written.contains("\"full_text\":\"\""));
    }

    #[test]
    fn test_error_event_closes_stream() {
        let sink = EventStreamSink::new(Vec::new());
        sink.notify("Total pages: 2");
        let mut buffer = sink.into_inner();

        let error = crate::HarvestError::Url(crate::UrlError::Empty);
        write_error_event(&mut buffer, &error).unwrap();

        let written = String::from_utf8(buffer).unwrap();
        assert_eq!(
            written,
            "data: Total pages: 2\n\ndata: Error while crawling: Invalid base URL: URL is empty\n\n"
        );
    }
}
