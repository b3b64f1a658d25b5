//! In-memory ring buffer of the most recent log lines.

use std::collections::VecDeque;
use std::fmt::Write;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, Layer};

#[derive(Clone)]
pub struct LineBuffer {
    lines: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl LineBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn push(&self, line: String) {
        if self.capacity == 0 {
            return;
        }
        let Ok(mut lines) = self.lines.lock() else {
            return;
        };
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    /// Oldest first
    pub fn snapshot(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.iter().cloned().collect())
            .unwrap_or_default()
    }
}

/// "message key=value ..."
struct LineVisitor {
    buf: String,
}

impl LineVisitor {
    fn separate(&mut self) {
        if !self.buf.is_empty() {
            self.buf.push(' ');
        }
    }
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.separate();
        if field.name() == "message" {
            self.buf.push_str(value);
        } else {
            write!(self.buf, "{}={:?}", field.name(), value).ok();
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.separate();
        if field.name() == "message" {
            write!(self.buf, "{:?}", value).ok();
        } else {
            write!(self.buf, "{}={:?}", field.name(), value).ok();
        }
    }
}

/// Layer that mirrors every event into a [`LineBuffer`]
pub struct BufferLayer {
    buffer: LineBuffer,
}

impl BufferLayer {
    pub fn new(buffer: LineBuffer) -> Self {
        Self { buffer }
    }
}

impl<S> Layer<S> for BufferLayer
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = LineVisitor { buf: String::with_capacity(128) };
        event.record(&mut visitor);
        let line = format!(
            "{} [{}] {}: {}",
            chrono::Local::now().format("%H:%M:%S%.3f"),
            event.metadata().level(),
            event.metadata().target(),
            visitor.buf
        );
        self.buffer.push(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn test_keeps_only_the_newest_lines() {
        let buffer = LineBuffer::new(2);
        buffer.push("a".into());
        buffer.push("b".into());
        buffer.push("c".into());
        assert_eq!(buffer.snapshot(), ["b", "c"]);
    }

    #[test]
    fn test_layer_formats_events() {
        let buffer = LineBuffer::new(8);
        let subscriber = tracing_subscriber::registry().with(BufferLayer::new(buffer.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(list = "inbox", "rollback");
        });

        let lines = buffer.snapshot();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("[WARN]"));
        assert!(lines[0].contains("rollback"));
        assert!(lines[0].contains("list=\"inbox\""));
    }
}
