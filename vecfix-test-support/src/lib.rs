//! Shared test utilities used across vecfix crates.

pub mod tracing {
    //! Recording layer for asserting the spans and events a fixture run emits.
    use std::collections::HashMap;
    use std::fmt;
    use std::sync::{Arc, Mutex};

    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::registry::LookupSpan;

    /// Layer that keeps closed spans and emitted events in memory.
    #[derive(Clone, Default)]
    pub struct RecordingLayer {
        spans: Arc<Mutex<Vec<SpanRecord>>>,
        events: Arc<Mutex<Vec<EventRecord>>>,
    }

    impl RecordingLayer {
        /// Runs `operation` with a fresh recording subscriber as the thread's
        /// default and returns its result with the layer.
        ///
        /// # Examples
        /// ```
        /// use vecfix_test_support::tracing::RecordingLayer;
        ///
        /// let (value, layer) = RecordingLayer::capture(|| {
        ///     tracing::info_span!("outer").in_scope(|| 7)
        /// });
        /// assert_eq!(value, 7);
        /// assert!(layer.span("outer").is_some());
        /// ```
        pub fn capture<T>(operation: impl FnOnce() -> T) -> (T, Self) {
            let layer = Self::default();
            let subscriber = tracing_subscriber::registry().with(layer.clone());
            let value = tracing::subscriber::with_default(subscriber, operation);
            (value, layer)
        }

        /// Closed spans in completion order.
        ///
        /// # Examples
        /// ```
        /// use vecfix_test_support::tracing::RecordingLayer;
        ///
        /// let layer = RecordingLayer::default();
        /// assert!(layer.spans().is_empty());
        /// ```
        #[must_use]
        pub fn spans(&self) -> Vec<SpanRecord> {
            self.spans.lock().expect("lock poisoned").clone()
        }

        /// Emitted events in emission order.
        #[must_use]
        pub fn events(&self) -> Vec<EventRecord> {
            self.events.lock().expect("lock poisoned").clone()
        }

        /// First closed span called `name`.
        #[must_use]
        pub fn span(&self, name: &str) -> Option<SpanRecord> {
            self.spans_named(name).into_iter().next()
        }

        /// Every closed span called `name`, in completion order.
        #[must_use]
        pub fn spans_named(&self, name: &str) -> Vec<SpanRecord> {
            self.spans()
                .into_iter()
                .filter(|span| span.name == name)
                .collect()
        }

        /// Returns `true` if an event at `level` carried `message`.
        #[must_use]
        pub fn has_event(&self, level: Level, message: &str) -> bool {
            self.events()
                .iter()
                .any(|event| event.level == level && event.message() == Some(message))
        }
    }

    /// A closed span with its recorded fields.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SpanRecord {
        /// Span name from the tracing metadata.
        pub name: String,
        /// Name of the enclosing span, if any.
        pub parent: Option<String>,
        /// Fields recorded at creation or later via `Span::record`.
        pub fields: HashMap<String, String>,
    }

    impl SpanRecord {
        /// Looks up a recorded field.
        #[must_use]
        pub fn field(&self, name: &str) -> Option<&str> {
            self.fields.get(name).map(String::as_str)
        }
    }

    /// An emitted event with its level, target, and fields.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct EventRecord {
        /// Event level.
        pub level: Level,
        /// Event target.
        pub target: String,
        /// Structured fields, including `message`.
        pub fields: HashMap<String, String>,
    }

    impl EventRecord {
        /// The event's `message` field.
        #[must_use]
        pub fn message(&self) -> Option<&str> {
            self.field("message")
        }

        /// Looks up a recorded field.
        #[must_use]
        pub fn field(&self, name: &str) -> Option<&str> {
            self.fields.get(name).map(String::as_str)
        }
    }

    struct SpanData {
        name: String,
        parent: Option<String>,
        fields: HashMap<String, String>,
    }

    impl<S> Layer<S> for RecordingLayer
    where
        S: Subscriber + for<'span> LookupSpan<'span>,
    {
        fn on_new_span(
            &self,
            attrs: &tracing::span::Attributes<'_>,
            id: &tracing::span::Id,
            ctx: Context<'_, S>,
        ) {
            let Some(span) = ctx.span(id) else {
                return;
            };
            let mut data = SpanData {
                name: attrs.metadata().name().to_owned(),
                parent: span.parent().map(|parent| parent.name().to_owned()),
                fields: HashMap::new(),
            };
            attrs.record(&mut FieldRecorder {
                fields: &mut data.fields,
            });
            span.extensions_mut().insert(data);
        }

        fn on_record(
            &self,
            id: &tracing::span::Id,
            values: &tracing::span::Record<'_>,
            ctx: Context<'_, S>,
        ) {
            let Some(span) = ctx.span(id) else {
                return;
            };
            let mut extensions = span.extensions_mut();
            let Some(data) = extensions.get_mut::<SpanData>() else {
                return;
            };
            values.record(&mut FieldRecorder {
                fields: &mut data.fields,
            });
        }

        fn on_close(&self, id: tracing::span::Id, ctx: Context<'_, S>) {
            let Some(span) = ctx.span(&id) else {
                return;
            };
            let Some(data) = span.extensions_mut().remove::<SpanData>() else {
                return;
            };
            self.spans.lock().expect("lock poisoned").push(SpanRecord {
                name: data.name,
                parent: data.parent,
                fields: data.fields,
            });
        }

        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut fields = HashMap::new();
            event.record(&mut FieldRecorder {
                fields: &mut fields,
            });
            self.events
                .lock()
                .expect("lock poisoned")
                .push(EventRecord {
                    level: *event.metadata().level(),
                    target: event.metadata().target().to_owned(),
                    fields,
                });
        }
    }

    struct FieldRecorder<'a> {
        fields: &'a mut HashMap<String, String>,
    }

    impl FieldRecorder<'_> {
        fn insert(&mut self, field: &Field, value: String) {
            self.fields.insert(field.name().to_owned(), value);
        }
    }

    impl Visit for FieldRecorder<'_> {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.insert(field, format!("{value:?}"));
        }

        fn record_str(&mut self, field: &Field, value: &str) {
            self.insert(field, value.to_owned());
        }

        fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
            self.insert(field, value.to_string());
        }

        fn record_bool(&mut self, field: &Field, value: bool) {
            self.insert(field, value.to_string());
        }

        fn record_i64(&mut self, field: &Field, value: i64) {
            self.insert(field, value.to_string());
        }

        fn record_u64(&mut self, field: &Field, value: u64) {
            self.insert(field, value.to_string());
        }

        fn record_f64(&mut self, field: &Field, value: f64) {
            self.insert(field, value.to_string());
        }
    }
}

pub mod fixtures {
    //! Scratch directories and helpers for inspecting written fixture files.
    use std::{
        fs, io,
        path::{Path, PathBuf},
    };

    use tempfile::TempDir;

    /// A temporary directory whose `data` subdirectory does not exist yet,
    /// so tests also exercise output directory creation.
    pub struct ScratchDir {
        root: TempDir,
    }

    impl ScratchDir {
        /// Creates a new scratch directory.
        ///
        /// # Errors
        /// Returns the I/O error raised while creating the temporary directory.
        pub fn new() -> io::Result<Self> {
            Ok(Self {
                root: tempfile::tempdir()?,
            })
        }

        /// Root of the scratch directory.
        #[must_use]
        pub fn root(&self) -> &Path {
            self.root.path()
        }

        /// Output directory to hand to the emitter.
        #[must_use]
        pub fn out_dir(&self) -> PathBuf {
            self.root.path().join("data")
        }

        /// Path of `file_name` inside [`ScratchDir::out_dir`].
        #[must_use]
        pub fn file(&self, file_name: &str) -> PathBuf {
            self.out_dir().join(file_name)
        }
    }

    /// Reads a CRLF-terminated file into its lines, without terminators.
    ///
    /// # Errors
    /// Returns the I/O error raised while reading `path`.
    ///
    /// # Examples
    /// ```
    /// use vecfix_test_support::fixtures::{ScratchDir, read_lines};
    ///
    /// let scratch = ScratchDir::new().expect("tempdir");
    /// let path = scratch.root().join("sample.csv");
    /// std::fs::write(&path, "v0\r\n1.000000\r\n").expect("write");
    /// assert_eq!(read_lines(&path).expect("read"), ["v0", "1.000000"]);
    /// ```
    pub fn read_lines(path: &Path) -> io::Result<Vec<String>> {
        let text = fs::read_to_string(path)?;
        Ok(text
            .split_terminator("\r\n")
            .map(ToOwned::to_owned)
            .collect())
    }

    /// Replaces one-based line `line` of `path` with the output of `edit`.
    ///
    /// # Errors
    /// Returns the I/O error raised while reading or writing `path`, or
    /// [`io::ErrorKind::InvalidInput`] when the line does not exist.
    pub fn rewrite_line(
        path: &Path,
        line: usize,
        edit: impl FnOnce(&str) -> String,
    ) -> io::Result<()> {
        let mut lines = read_lines(path)?;
        let target = line
            .checked_sub(1)
            .and_then(|index| lines.get_mut(index))
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "line out of range"))?;
        *target = edit(target.as_str());
        let mut text = lines.join("\r\n");
        text.push_str("\r\n");
        fs::write(path, text)
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{ScratchDir, read_lines, rewrite_line};
    use super::tracing::RecordingLayer;

    use rstest::rstest;
    use tracing::Level;

    #[rstest]
    fn capture_records_nested_spans_and_events() {
        let ((), layer) = RecordingLayer::capture(|| {
            let outer = tracing::info_span!("outer", seed = 9_u64);
            let _outer = outer.enter();
            tracing::info_span!("inner", kind = "queries").in_scope(|| {
                tracing::info!(rows = 3_u64, "written");
            });
        });

        let inner = layer.span("inner").expect("inner span recorded");
        assert_eq!(inner.parent.as_deref(), Some("outer"));
        assert_eq!(inner.field("kind"), Some("queries"));
        let outer = layer.span("outer").expect("outer span recorded");
        assert_eq!(outer.field("seed"), Some("9"));
        assert_eq!(outer.parent, None);
        assert!(layer.has_event(Level::INFO, "written"));
        assert!(!layer.has_event(Level::WARN, "written"));
    }

    #[rstest]
    fn rewrite_line_keeps_crlf_terminators() {
        let scratch = ScratchDir::new().expect("tempdir");
        let path = scratch.root().join("rows.csv");
        std::fs::write(&path, "id\r\na\r\nb\r\n").expect("write");

        rewrite_line(&path, 3, |line| format!("{line}!")).expect("line exists");
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "id\r\na\r\nb!\r\n");
        assert_eq!(read_lines(&path).expect("read"), ["id", "a", "b!"]);
        assert!(rewrite_line(&path, 0, |line| line.to_owned()).is_err());
        assert!(rewrite_line(&path, 9, |line| line.to_owned()).is_err());
    }

    #[rstest]
    fn out_dir_is_not_created_up_front() {
        let scratch = ScratchDir::new().expect("tempdir");
        assert!(!scratch.out_dir().exists());
        assert_eq!(scratch.file("queries.csv"), scratch.out_dir().join("queries.csv"));
    }
}
