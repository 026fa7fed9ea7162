//! in-process span recorder: a bounded fifo window over sampled call
//! trees.
//!
//! a [`Tracer`] opens spans for nested units of work, keeps the
//! parent/child links through an explicit [`SpanContext`] handed across
//! call boundaries, samples whole traces once at their root, and stores
//! the closed spans of sampled traces in a fixed-capacity store for
//! later inspection.
//!
//! ```
//! use rpcz::{SpanContext, Tracer};
//!
//! let tracer = Tracer::new(1.0, 16).unwrap();
//! let (mut client, ctx) = tracer.start_span(&SpanContext::empty(), "Client.Call");
//! client.set_attribute("user_id", "10086");
//! let (mut callee, _ctx) = tracer.start_span(&ctx, "ServiceA.Handle");
//! callee.finish();
//! client.finish();
//! assert_eq!(tracer.snapshot().len(), 2);
//! ```

// span records, attribute values and the shared clock
mod span;
pub use span::{AttrValue, SpanRecord};
// sampling decision, taken once per trace root
mod sampler;
// the handle carrying the current span across call boundaries
mod context;
pub use context::SpanContext;
// bounded fifo store for closed spans
mod store;
// the facade tying sampler, context and store together
mod tracer;
pub use tracer::{global, install_global, start_span, Span, Tracer};
mod error;
pub use error::ConfigError;
