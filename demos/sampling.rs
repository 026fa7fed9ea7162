//! run many tiny traces through a 25% sampler and see roughly a quarter
//! of them land in the store.
use rpcz::{SpanContext, Tracer};

const TRACES: usize = 1000;

fn main() {
    // two spans per trace, so size the store for the worst case
    let tracer = Tracer::new(0.25, 2 * TRACES).expect("valid tracer configuration");

    for i in 0..TRACES {
        let (mut root, ctx) = tracer.start_span(&SpanContext::empty(), "request");
        root.set_attribute("index", i as i64);
        let (mut child, _) = tracer.start_span(&ctx, "handler");
        child.finish();
        root.finish();
    }

    let kept = tracer.snapshot();
    println!(
        "{} of {} traces kept ({} spans stored)",
        kept.len() / 2,
        TRACES,
        kept.len()
    );
}
