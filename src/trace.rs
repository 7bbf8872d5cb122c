//! Span and event macros for the tracker's observable steps.
//!
//! Spans: `locate`, `heading`, `infer`, `load_resources` and
//! `rebuild_scaled_maps`. Info events: `maps_loaded`, `scaled_maps_rebuilt`,
//! `resources_ready` and `inference_completed`. Warnings: `map_skipped` for
//! unreadable map files, and `precision_ignored`, `threshold_ignored`,
//! `params_malformed`, `params_not_object` for host parameters replaced by
//! defaults. Without the `tracing` feature the macros expand to nothing.

/// Info span around one tracker step, e.g. `trace_span!("locate", scale = scale)`.
#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        tracing::info_span!($name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        $crate::trace::NoopSpan
    };
}

/// Info event carrying a step's outcome (match score, rebuild count, map count).
#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::info!(name: $name, $($key = $value),+)
    };
    ($name:expr) => {
        tracing::info!(name: $name)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($($value,)+);
    };
    ($name:expr) => {};
}

/// Warn event for input the tracker skips or replaces: an unreadable map file
/// or a host parameter that falls back to its default.
#[cfg(feature = "tracing")]
macro_rules! trace_warn {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::warn!(name: $name, $($key = $value),+)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_warn {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($($value,)+);
    };
}

pub(crate) use trace_event;
pub(crate) use trace_span;
pub(crate) use trace_warn;

/// Stand-in for `tracing::Span` so call sites keep `trace_span!(..).entered()`.
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}
