//! # Observability & Tracing
//!
//! [`setup_tracing`] initializes structured logging with the `tracing` crate.
//!
//! The subscriber uses a compact format that hides the crate/module prefix
//! (`with_target(false)`); every log line carries its own structured fields instead
//! (`entity_type`, `workflow`, `generation`, `customer`, ...).
//!
//! ## What Gets Traced
//!
//! - **Actor lifecycle**: startup, shutdown and final store size
//! - **Store operations**: `Get` and `Upsert` with the record key
//! - **Workflow generations**: every generation runs inside a
//!   `generation{workflow=.. generation=..}` span, so order logs are grouped by generation
//! - **Sub-task outcomes**: successful orders, failures and timeouts
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run     # Compact logs
//! RUST_LOG=debug cargo run    # Full payloads and store traffic
//! RUST_LOG=tavern_framework=debug,tavern=info cargo run
//! ```
//!
//! With `RUST_LOG=info` a restart looks like:
//!
//! ```text
//! INFO generation:process: Order made item=ale price=4.5 workflow="order-orchestrator" generation=1
//! INFO generation: Order completed item=ale price=4.5 customer=Alice workflow="order-orchestrator" generation=1
//! INFO generation: Draining in_flight=0 processed=3 workflow="order-orchestrator" generation=1
//! INFO generation: Restarting succeeded=3 failed=0 workflow="order-orchestrator" generation=1
//! INFO Continuing as new workflow="order-orchestrator" generation=1 pending=1
//! INFO generation: Generation running threshold=3 pending=1 workflow="order-orchestrator" generation=2
//! ```

/// Initializes the global tracing subscriber, filtered by `RUST_LOG`.
///
/// Call once, from the binary. Libraries and tests never install a subscriber.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Don't show module paths - fields carry the context
        .compact()
        .init();
}
