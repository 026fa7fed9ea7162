//! the propagation handle carried across nested call boundaries.

/// immutable carrier of the current (innermost open) span identity and
/// the trace's sampling decision.
///
/// starting a child span yields a fresh context for the callee side and
/// leaves the caller's untouched, so sibling calls each see the same
/// parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpanContext {
    pub(crate) current: Option<u64>,
    pub(crate) sampled: bool,
}

impl SpanContext {
    /// the empty context: the next span started from it is a trace root
    /// and triggers the sampling decision.
    pub fn empty() -> Self {
        SpanContext::default()
    }

    /// id of the innermost open span, if any.
    pub fn current_span(&self) -> Option<u64> {
        self.current
    }

    /// whether this trace is being recorded.
    /// meaningless on the empty context (no trace exists yet).
    pub fn is_sampled(&self) -> bool {
        self.sampled
    }
}
