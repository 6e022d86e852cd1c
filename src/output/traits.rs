//! Progress sink trait
//!
//! A sink receives each progress line the moment the crawler produces it.
//! The crawler also keeps every line itself, so a sink is optional and
//! write-only.

/// Live subscriber for crawl progress lines
///
/// Implementations are called synchronously, in emission order, from the
/// task driving the crawl. They should return quickly.
pub trait ProgressSink: Send + Sync {
    /// Receives one non-empty progress line
    fn notify(&self, line: &str);
}

impl<F> ProgressSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn notify(&self, line: &str) {
        self(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_closure_is_a_sink() {
        let seen = Mutex::new(Vec::new());
        let sink = |line: &str| seen.lock().unwrap().push(line.to_string());

        sink.notify("first");
        sink.notify("second");

        assert_eq!(*seen.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_sink_as_trait_object() {
        let seen = Mutex::new(0usize);
        let sink = |_: &str| *seen.lock().unwrap() += 1;
        let dyn_sink: &dyn ProgressSink = &sink;

        dyn_sink.notify("line");

        assert_eq!(*seen.lock().unwrap(), 1);
    }
}
