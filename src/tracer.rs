//! the process-wide tracer facade and its global registry.
use super::context::SpanContext;
use super::error::ConfigError;
use super::sampler::Sampler;
use super::span::{now_nanos, AttrValue, SpanRecord};
use super::store::SpanStore;
use lazy_static::lazy_static;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

// ids are process-unique across every tracer instance, sampled or not,
// so ids quoted in logs stay consistent even for discarded traces.
static NEXT_SPAN_ID: AtomicU64 = AtomicU64::new(1);

fn next_span_id() -> u64 {
    NEXT_SPAN_ID.fetch_add(1, Ordering::Relaxed)
}

/// the facade composing sampler, propagation and store.
///
/// cheap to clone; clones share one store. a tracer can be installed
/// process-wide with [`install_global`] or used as an isolated instance,
/// which is what tests do.
#[derive(Debug, Clone)]
pub struct Tracer {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    sampler: Sampler,
    store: SpanStore,
}

impl Tracer {
    /// build a tracer keeping `fraction` of traces in a store of
    /// `capacity` spans. invalid values are rejected, never clamped.
    pub fn new(fraction: f64, capacity: usize) -> Result<Tracer, ConfigError> {
        // NaN fails the range check too
        if !(0.0..=1.0).contains(&fraction) {
            return Err(ConfigError::Fraction(fraction));
        }
        if capacity == 0 {
            return Err(ConfigError::Capacity);
        }
        Ok(Tracer {
            inner: Arc::new(Inner {
                sampler: Sampler::new(fraction),
                store: SpanStore::new(capacity),
            }),
        })
    }

    /// open a span for a unit of work.
    ///
    /// with the empty context the span is a trace root and the sampler
    /// fixes the whole trace's fate, once. otherwise the span hangs off
    /// the context's current span and inherits its decision unchanged.
    /// the returned context is for the callee side; the caller's stays
    /// valid and untouched.
    pub fn start_span(
        &self,
        context: &SpanContext,
        name: impl Into<String>,
    ) -> (Span, SpanContext) {
        let id = next_span_id();
        let (parent, sampled) = match context.current {
            Some(parent) => (Some(parent), context.sampled),
            None => (None, self.inner.sampler.should_sample()),
        };
        let span = Span {
            id,
            sampled,
            record: Some(SpanRecord::new(id, parent, name.into())),
            tracer: self.inner.clone(),
        };
        let child_context = SpanContext {
            current: Some(id),
            sampled,
        };
        (span, child_context)
    }

    /// point-in-time copy of the stored spans, oldest first.
    pub fn snapshot(&self) -> Vec<SpanRecord> {
        self.inner.store.snapshot()
    }

    pub fn capacity(&self) -> usize {
        self.inner.store.capacity()
    }

    /// look a stored span up by id.
    pub fn find_span(&self, id: u64) -> Option<SpanRecord> {
        self.inner.store.find(id)
    }

    /// the `n` most recently stored spans, newest last.
    pub fn last_spans(&self, n: usize) -> Vec<SpanRecord> {
        self.inner.store.last(n)
    }
}

/// an open unit of work, exclusively owned by the call frame that
/// started it.
///
/// finishing stamps the end time and, when the trace is sampled, moves
/// the record into the store. a span that is never finished is never
/// stored: the leak shows up as missing data instead of a silent
/// timeout, since the recorder cannot tell "still running" from
/// "abandoned".
#[derive(Debug)]
pub struct Span {
    id: u64,
    sampled: bool,
    // taken on finish; absence means the span is closed
    record: Option<SpanRecord>,
    tracer: Arc<Inner>,
}

impl Span {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_sampled(&self) -> bool {
        self.sampled
    }

    /// tag the span. last write for a key wins, insertion order is kept.
    /// writes after `finish` are dropped silently: the recorder must
    /// never turn into an application failure.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        if let Some(record) = self.record.as_mut() {
            record.set_attr(key.into(), value.into());
        }
    }

    /// close the span. the second call is a no-op: no second store
    /// entry, end time unchanged.
    pub fn finish(&mut self) {
        if let Some(mut record) = self.record.take() {
            record.end_ns = now_nanos();
            if self.sampled {
                self.tracer.store.push(record);
            }
        }
    }
}

lazy_static! {
    // the installed process-wide tracer, if any
    static ref GLOBAL: RwLock<Option<Tracer>> = RwLock::new(None);
    // fallback when nothing is installed: records nothing, costs nothing
    static ref DISABLED: Tracer = Tracer {
        inner: Arc::new(Inner {
            sampler: Sampler::new(0.0),
            store: SpanStore::new(1),
        }),
    };
}

/// install `tracer` as the process-wide instance.
///
/// the swap is atomic: spans started afterwards use the new tracer,
/// spans already open keep the instance they were created under and
/// finish into its store.
pub fn install_global(tracer: Tracer) {
    let mut slot = GLOBAL.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    let replaced = slot.replace(tracer);
    tracing::debug!(replaced = replaced.is_some(), "global tracer installed");
}

/// the installed tracer, or a disabled one recording nothing.
/// missing configuration must not fail instrumented code.
pub fn global() -> Tracer {
    GLOBAL
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .as_ref()
        .unwrap_or(&DISABLED)
        .clone()
}

/// open a span on the installed tracer. see [`Tracer::start_span`].
pub fn start_span(context: &SpanContext, name: impl Into<String>) -> (Span, SpanContext) {
    global().start_span(context, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn rejects_bad_fractions() {
        assert_eq!(
            Tracer::new(-0.1, 10).unwrap_err(),
            ConfigError::Fraction(-0.1)
        );
        assert_eq!(
            Tracer::new(1.1, 10).unwrap_err(),
            ConfigError::Fraction(1.1)
        );
        assert!(matches!(
            Tracer::new(f64::NAN, 10).unwrap_err(),
            ConfigError::Fraction(_)
        ));
    }

    #[test]
    fn rejects_zero_capacity() {
        assert_eq!(Tracer::new(0.5, 0).unwrap_err(), ConfigError::Capacity);
    }

    #[test]
    fn accepts_the_fraction_endpoints() {
        assert!(Tracer::new(0.0, 1).is_ok());
        assert!(Tracer::new(1.0, 1).is_ok());
    }

    #[test]
    fn ids_are_unique_even_for_unsampled_spans() {
        let recording = Tracer::new(1.0, 64).unwrap();
        let discarding = Tracer::new(0.0, 64).unwrap();
        let mut seen = HashSet::new();
        for _ in 0..50 {
            let (a, _) = recording.start_span(&SpanContext::empty(), "kept");
            let (b, _) = discarding.start_span(&SpanContext::empty(), "dropped");
            assert!(seen.insert(a.id()));
            assert!(seen.insert(b.id()));
        }
    }

    #[test]
    fn ids_are_unique_across_threads() {
        let tracer = Tracer::new(1.0, 8).unwrap();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let tracer = tracer.clone();
                std::thread::spawn(move || {
                    (0..200)
                        .map(|_| tracer.start_span(&SpanContext::empty(), "work").0.id())
                        .collect::<Vec<u64>>()
                })
            })
            .collect();
        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id));
            }
        }
    }

    #[test]
    fn finish_is_idempotent() {
        let tracer = Tracer::new(1.0, 10).unwrap();
        let (mut span, _) = tracer.start_span(&SpanContext::empty(), "once");
        span.finish();
        let first_end = tracer.snapshot()[0].end_ns;
        span.finish();
        let snapshot = tracer.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].end_ns, first_end);
    }

    #[test]
    fn unfinished_spans_are_never_stored() {
        let tracer = Tracer::new(1.0, 10).unwrap();
        let (_span, _) = tracer.start_span(&SpanContext::empty(), "leaked");
        assert!(tracer.snapshot().is_empty());
    }

    #[test]
    fn attribute_writes_after_finish_are_dropped() {
        let tracer = Tracer::new(1.0, 10).unwrap();
        let (mut span, _) = tracer.start_span(&SpanContext::empty(), "op");
        span.set_attribute("early", true);
        span.finish();
        span.set_attribute("late", true);
        let stored = tracer.snapshot().remove(0);
        assert_eq!(stored.attributes.len(), 1);
        assert_eq!(stored.attributes[0].0, "early");
    }

    #[test]
    fn children_inherit_the_root_decision() {
        let tracer = Tracer::new(0.0, 10).unwrap();
        let (mut root, context) = tracer.start_span(&SpanContext::empty(), "root");
        let (mut child, _) = tracer.start_span(&context, "child");
        assert!(!root.is_sampled());
        assert!(!child.is_sampled());
        child.finish();
        root.finish();
        assert!(tracer.snapshot().is_empty());
    }

    #[test]
    fn query_helpers_see_stored_spans() {
        let tracer = Tracer::new(1.0, 10).unwrap();
        let mut ids = Vec::new();
        for i in 0..4 {
            let (mut span, _) = tracer.start_span(&SpanContext::empty(), format!("op-{}", i));
            ids.push(span.id());
            span.finish();
        }
        assert_eq!(tracer.find_span(ids[2]).map(|r| r.id), Some(ids[2]));
        let last: Vec<u64> = tracer.last_spans(2).iter().map(|r| r.id).collect();
        assert_eq!(last, ids[2..]);
    }
}
