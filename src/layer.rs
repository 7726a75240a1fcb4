//! `tracing` front end.
//!
//! [`AlignedLayer`] turns `tracing` events into [`Record`]s for an
//! [`AlignedHandler`]. Each entered span contributes its name as a group and
//! its fields as inherited attributes, outermost span first.
//!
//! ```no_run
//! use aligned_log::{AlignedHandler, AlignedLayer, HandlerOptions};
//! use tracing_subscriber::prelude::*;
//!
//! let handler = AlignedHandler::stderr(HandlerOptions::default())?;
//! tracing_subscriber::registry()
//!     .with(AlignedLayer::new(handler))
//!     .init();
//!
//! tracing::info!(port = 8080, "listening");
//! # Ok::<(), aligned_log::Error>(())
//! ```

use crate::diag::{DiagLevel, emit_diag};
use crate::handler::AlignedHandler;
use crate::record::{Attr, Level, Record, SourceLocation};
use crate::value::Value;
use chrono::Local;
use std::fmt;
use tracing::field::{Field, Visit};
use tracing::span;
use tracing::{Event, Metadata, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

const MESSAGE_FIELD: &str = "message";

/// Collects the fields of an event or span.
#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    attrs: Vec<Attr>,
}

impl FieldVisitor {
    fn push(&mut self, field: &Field, value: Value) {
        // Fields injected by tracing-log describe the log macro call site.
        if field.name().starts_with("log.") {
            return;
        }
        self.attrs.push(Attr::new(field.name(), value));
    }
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == MESSAGE_FIELD {
            self.message = Some(value.to_string());
        } else {
            self.push(field, Value::from(value));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, Value::I64(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, Value::U64(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(field, Value::F64(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, Value::Bool(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.push(field, Value::Str(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == MESSAGE_FIELD {
            self.message = Some(format!("{value:?}"));
        } else {
            self.push(field, Value::any(value));
        }
    }
}

/// Fields recorded on a span, stored in its extensions.
struct SpanAttrs(Vec<Attr>);

/// A [`Layer`] rendering events through an [`AlignedHandler`].
///
/// Write failures are reported through the diagnostics callback; they never
/// reach the instrumented code.
#[derive(Clone, Debug)]
pub struct AlignedLayer {
    handler: AlignedHandler,
}

impl AlignedLayer {
    #[must_use]
    pub fn new(handler: AlignedHandler) -> Self {
        Self { handler }
    }

    #[must_use]
    pub fn handler(&self) -> &AlignedHandler {
        &self.handler
    }

    /// The handler for an event, derived through every span in its scope.
    fn scoped_handler<S>(&self, event: &Event<'_>, ctx: &Context<'_, S>) -> AlignedHandler
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
    {
        let mut handler = self.handler.clone();
        let Some(scope) = ctx.event_scope(event) else {
            return handler;
        };
        for span in scope.from_root() {
            handler = handler.with_group(span.name());
            let extensions = span.extensions();
            if let Some(SpanAttrs(attrs)) = extensions.get::<SpanAttrs>() {
                if !attrs.is_empty() {
                    handler = handler.with_attrs(attrs.iter().cloned());
                }
            }
        }
        handler
    }
}

fn location_of(meta: &'static Metadata<'static>) -> Option<SourceLocation> {
    let file = meta.file()?;
    Some(SourceLocation::new(file, meta.line().unwrap_or(0)))
}

impl<S> Layer<S> for AlignedLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        metadata.is_span() || self.handler.enabled(Level::from(metadata.level()))
    }

    fn on_new_span(&self, attrs: &span::Attributes<'_>, id: &span::Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut visitor = FieldVisitor::default();
        attrs.record(&mut visitor);
        span.extensions_mut().insert(SpanAttrs(visitor.attrs));
    }

    fn on_record(&self, id: &span::Id, values: &span::Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut visitor = FieldVisitor::default();
        values.record(&mut visitor);
        let mut extensions = span.extensions_mut();
        match extensions.get_mut::<SpanAttrs>() {
            Some(SpanAttrs(attrs)) => attrs.extend(visitor.attrs),
            None => extensions.insert(SpanAttrs(visitor.attrs)),
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let meta = event.metadata();
        let level = Level::from(meta.level());
        if !self.handler.enabled(level) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        let record = Record {
            time: Some(Local::now()),
            level,
            message: visitor.message.unwrap_or_default(),
            location: location_of(meta),
            attrs: visitor.attrs,
        };

        let handler = self.scoped_handler(event, &ctx);
        if let Err(e) = handler.handle(&record) {
            emit_diag(DiagLevel::Error, &format!("failed to write log event: {e}"));
        }
    }
}
