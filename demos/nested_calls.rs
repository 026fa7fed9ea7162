//! the classic three-hop trace: a client calling service a calling
//! service b, all in one process, then a dump of the recorded window.
use rpcz::{install_global, start_span, SpanContext, Tracer};
use std::thread::sleep;
use std::time::Duration;

fn main() {
    let tracer = Tracer::new(1.0, 100).expect("valid tracer configuration");
    install_global(tracer.clone());

    println!("=== trace: Client.Call -> ServiceA.Handle -> ServiceB.Handle ===");

    let (mut span, ctx) = start_span(&SpanContext::empty(), "Client.Call");
    sleep(Duration::from_millis(10));
    span.set_attribute("user_id", "10086");
    println!("1. client start (span id {})", span.id());

    call_service_a(&ctx);

    span.finish();
    println!("4. client end");

    let dump = serde_json::to_string_pretty(&tracer.snapshot()).expect("records serialize");
    println!("{}", dump);
}

fn call_service_a(ctx: &SpanContext) {
    let (mut span, ctx) = start_span(ctx, "ServiceA.Handle");
    println!("  -> 2. service a start (span id {})", span.id());
    sleep(Duration::from_millis(20));
    call_service_b(&ctx);
    span.finish();
}

fn call_service_b(ctx: &SpanContext) {
    let (mut span, _ctx) = start_span(ctx, "ServiceB.Handle");
    println!("    -> 3. service b start (span id {})", span.id());
    sleep(Duration::from_millis(50));
    span.set_attribute("db.query", "select * from users");
    span.finish();
}
