use crate::output::traits::ProgressSink;

/// Ordered, append-only log of progress lines for one crawl
///
/// Every line is kept in memory (and returned in the outcome) and forwarded
/// to the optional live subscriber in the same order.
pub struct ProgressLog<'a> {
    lines: Vec<String>,
    subscriber: Option<&'a dyn ProgressSink>,
}

impl<'a> ProgressLog<'a> {
    pub fn new(subscriber: Option<&'a dyn ProgressSink>) -> Self {
        Self {
            lines: Vec::new(),
            subscriber,
        }
    }

    /// Appends a line and forwards it to the subscriber; empty lines are ignored
    pub fn log(&mut self, line: impl Into<String>) {
        let line = line.into();
        if line.is_empty() {
            return;
        }

        tracing::info!("{}", line);
        if let Some(subscriber) = self.subscriber {
            subscriber.notify(&line);
        }
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Consumes the log, returning every line in emission order
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}
