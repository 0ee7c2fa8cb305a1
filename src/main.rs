//! Demo: greet two visitors, take four orders, and close up.
//!
//! With the default threshold of 3 the fourth order is taken by the second generation.

use tavern::{CustomerInput, OrderEvent, Tavern, TavernConfig};
use tavern_framework::tracing::setup_tracing;
use tracing::{info, info_span, Instrument};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();

    let config = TavernConfig::from_env()?;
    let tavern = Tavern::new(config)?;
    let status = tavern.status();

    async {
        for visitor in [CustomerInput::new("Alice", 30), CustomerInput::new("Bob", 17)] {
            let record = tavern.greet_visitor(visitor).await?;
            info!(customer = %record.name, times_visited = record.times_visited, "Greeted");
        }
        anyhow::Ok(())
    }
    .instrument(info_span!("greetings"))
    .await?;

    // Alice is served, Bob is too young, Carol never came in.
    let orders = [
        OrderEvent::new("ale", 4.5, "Alice"),
        OrderEvent::new("cider", 5.0, "Bob"),
        OrderEvent::new("stew", 9.0, "Carol"),
        OrderEvent::new("pie", 6.5, "Alice"),
    ];
    for order in &orders {
        tavern.submit_order(order).await?;
    }

    // Shutdown drains every queued order before the orchestrator completes.
    let report = tavern.shutdown().await?;
    let last = status.borrow().clone();
    info!(
        generations = report.generations,
        last_generation_succeeded = last.succeeded,
        last_generation_failed = last.failed,
        "Done"
    );
    Ok(())
}
