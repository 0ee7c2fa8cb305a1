use std::time::Duration;
use tavern::customer_actor::CustomerError;
use tavern::{
    CustomerInput, CustomerRecord, OrchestratorStatus, OrderEvent, Phase, Tavern, TavernConfig,
};
use tokio::sync::watch;

async fn wait_until(
    status: &mut watch::Receiver<OrchestratorStatus>,
    condition: impl FnMut(&OrchestratorStatus) -> bool,
) -> OrchestratorStatus {
    tokio::time::timeout(Duration::from_secs(10), status.wait_for(condition))
        .await
        .expect("timed out waiting for status")
        .expect("orchestrator gone")
        .clone()
}

/// Full end-to-end test with the real directory and orchestrator.
#[tokio::test]
async fn test_three_orders_then_restart_then_one_more() {
    let tavern = Tavern::new(TavernConfig::default()).expect("Failed to open tavern");
    let mut status = tavern.status();

    tavern
        .greet_visitor(CustomerInput::new("Alice", 30))
        .await
        .expect("Failed to greet");

    for item in ["ale", "cider", "stew"] {
        tavern
            .submit_order(&OrderEvent::new(item, 5.0, "Alice"))
            .await
            .expect("Failed to submit");
    }
    let restarted = wait_until(&mut status, |s| s.generation == 2).await;
    assert_eq!(restarted.processed, 0);

    tavern
        .submit_order(&OrderEvent::new("pie", 6.5, "Alice"))
        .await
        .expect("Failed to submit");
    let second = wait_until(&mut status, |s| s.generation == 2 && s.succeeded == 1).await;
    assert_eq!(second.processed, 1);
    assert_eq!(second.phase, Phase::Running);

    let report = tavern.shutdown().await.expect("Failed to shut down");
    assert_eq!(report.generations, 2);
}

#[tokio::test]
async fn test_greeting_twice_counts_two_visits() {
    let tavern = Tavern::new(TavernConfig::default()).unwrap();
    let mut updates = tavern.subscribe_directory();

    let first = tavern
        .greet_visitor(CustomerInput::new("Alice", 30))
        .await
        .unwrap();
    let second = tavern
        .greet_visitor(CustomerInput::new("Alice", 30))
        .await
        .unwrap();

    assert_eq!(first.times_visited, 1);
    assert_eq!(second.times_visited, 2);
    assert!(second.last_visit >= first.last_visit);

    let update = updates.recv().await.unwrap();
    assert_eq!((update.times_visited, update.previous_visits), (1, None));
    let update = updates.recv().await.unwrap();
    assert_eq!((update.times_visited, update.previous_visits), (2, Some(1)));

    let stored = tavern.customers.get_customer("Alice").await.unwrap();
    assert_eq!(stored, second);

    tavern.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_overlapping_greetings_count_every_visit() {
    let tavern = Tavern::new(TavernConfig::default()).unwrap();

    let (a, b) = tokio::join!(
        tavern.greet_visitor(CustomerInput::new("Alice", 30)),
        tavern.greet_visitor(CustomerInput::new("Alice", 30)),
    );
    let mut counts = vec![a.unwrap().times_visited, b.unwrap().times_visited];
    counts.sort();
    assert_eq!(counts, vec![1, 2]);

    let stored = tavern.customers.get_customer("Alice").await.unwrap();
    assert_eq!(stored.times_visited, 2);

    tavern.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_directory_get_and_update() {
    let tavern = Tavern::new(TavernConfig::default()).unwrap();

    assert_eq!(
        tavern.customers.get_customer("Nobody").await,
        Err(CustomerError::NotFound("Nobody".to_string()))
    );

    let record = CustomerRecord::new("Dora", 44);
    tavern.customers.update_customer(record.clone()).await.unwrap();
    assert_eq!(tavern.customers.get_customer("Dora").await.unwrap(), record);

    // Last writer wins, whole record
    let older = CustomerRecord {
        times_visited: 9,
        ..CustomerRecord::new("Dora", 45)
    };
    tavern.customers.update_customer(older.clone()).await.unwrap();
    assert_eq!(tavern.customers.get_customer("Dora").await.unwrap(), older);

    tavern.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_keep_records_apart() {
    let tavern = Tavern::new(TavernConfig::default()).unwrap();

    let mut writers = Vec::new();
    for (name, age) in [("Erin", 21), ("Finn", 64)] {
        let customers = tavern.customers.clone();
        writers.push(tokio::spawn(async move {
            for visits in 1..=20 {
                let record = CustomerRecord {
                    times_visited: visits,
                    ..CustomerRecord::new(name, age)
                };
                customers.update_customer(record).await.unwrap();
            }
        }));
    }
    for writer in writers {
        writer.await.unwrap();
    }

    let erin = tavern.customers.get_customer("Erin").await.unwrap();
    let finn = tavern.customers.get_customer("Finn").await.unwrap();
    assert_eq!((erin.age, erin.times_visited), (21, 20));
    assert_eq!((finn.age, finn.times_visited), (64, 20));

    tavern.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_underage_order_fails_until_eighteen() {
    let tavern = Tavern::new(TavernConfig {
        restart_threshold: 10,
        ..TavernConfig::default()
    })
    .unwrap();
    let mut status = tavern.status();

    tavern
        .greet_visitor(CustomerInput::new("Tim", 17))
        .await
        .unwrap();
    tavern
        .submit_order(&OrderEvent::new("ale", 4.5, "Tim"))
        .await
        .unwrap();
    wait_until(&mut status, |s| s.failed == 1).await;

    // The refused order left the directory alone
    let record = tavern.customers.get_customer("Tim").await.unwrap();
    assert_eq!((record.age, record.times_visited), (17, 1));

    tavern
        .greet_visitor(CustomerInput::new("Tim", 18))
        .await
        .unwrap();
    tavern
        .submit_order(&OrderEvent::new("ale", 4.5, "Tim"))
        .await
        .unwrap();
    let settled = wait_until(&mut status, |s| s.succeeded == 1).await;
    assert_eq!(settled.failed, 1);

    tavern.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_unknown_customer_and_junk_payload() {
    let mut tavern = Tavern::new(TavernConfig::default()).unwrap();
    let mut status = tavern.status();

    tavern
        .submit_payload(serde_json::json!(["not", "an", "order"]))
        .await
        .unwrap();
    tavern
        .submit_order(&OrderEvent::new("stew", 9.0, "Carol"))
        .await
        .unwrap();

    let settled = wait_until(&mut status, |s| s.failed == 1).await;
    assert_eq!(settled.processed, 1);
    assert_eq!(settled.rejected, 1);

    let letter = tavern.next_dead_letter().await.unwrap();
    assert_eq!(letter.payload, serde_json::json!(["not", "an", "order"]));

    tavern.shutdown().await.unwrap();
}
