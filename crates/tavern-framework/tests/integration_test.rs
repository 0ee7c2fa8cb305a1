use async_trait::async_trait;
use tavern_framework::{ActorEntity, FrameworkError, ResourceActor};
use tokio::sync::mpsc;

// --- Test Entity ---

#[derive(Clone, Debug, PartialEq)]
struct Keg {
    label: String,
    litres: u32,
    refills: u32,
}

#[derive(Debug, thiserror::Error)]
#[error("keg {0} is overfilled")]
struct Overfilled(String);

#[async_trait]
impl ActorEntity for Keg {
    type Id = String;
    type Context = mpsc::UnboundedSender<String>;
    type Error = Overfilled;

    fn id(&self) -> String {
        self.label.clone()
    }

    async fn on_upsert(
        &mut self,
        previous: Option<&Self>,
        ctx: &Self::Context,
    ) -> Result<(), Self::Error> {
        if self.litres > 50 {
            return Err(Overfilled(self.label.clone()));
        }
        self.refills = previous.map_or(0, |p| p.refills + 1);
        let _ = ctx.send(self.label.clone());
        Ok(())
    }
}

fn keg(label: &str, litres: u32) -> Keg {
    Keg {
        label: label.to_string(),
        litres,
        refills: 0,
    }
}

// --- Test ---

#[tokio::test]
async fn test_store_get_and_upsert() {
    let (notify_tx, mut notify_rx) = mpsc::unbounded_channel();
    let (actor, client) = ResourceActor::new(10);
    let handle = tokio::spawn(actor.run(notify_tx));

    // 1. Missing key
    assert!(client.get("stout".to_string()).await.unwrap().is_none());

    // 2. Insert
    let stored = client.upsert(keg("stout", 30)).await.unwrap();
    assert_eq!(stored.refills, 0);
    assert_eq!(notify_rx.recv().await.as_deref(), Some("stout"));

    // 3. Replace: the hook sees the previous record
    let stored = client.upsert(keg("stout", 40)).await.unwrap();
    assert_eq!(stored.refills, 1);
    assert_eq!(client.get("stout".to_string()).await.unwrap(), Some(stored));

    // 4. Rejected write leaves the store untouched
    let result = client.upsert(keg("stout", 99)).await;
    assert!(matches!(result, Err(FrameworkError::EntityError(_))));
    let current = client.get("stout".to_string()).await.unwrap().unwrap();
    assert_eq!(current.litres, 40);

    // 5. Actor shuts down when the last client is dropped
    drop(client);
    handle.await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writers_do_not_corrupt_records() {
    let (notify_tx, _notify_rx) = mpsc::unbounded_channel();
    let (actor, client) = ResourceActor::new(4);
    tokio::spawn(actor.run(notify_tx));

    let mut writers = Vec::new();
    for (label, litres) in [("ale", 10), ("cider", 20)] {
        let client = client.clone();
        writers.push(tokio::spawn(async move {
            for _ in 0..25 {
                client.upsert(keg(label, litres)).await.unwrap();
            }
        }));
    }
    for writer in writers {
        writer.await.unwrap();
    }

    let ale = client.get("ale".to_string()).await.unwrap().unwrap();
    let cider = client.get("cider".to_string()).await.unwrap().unwrap();
    assert_eq!((ale.litres, ale.refills), (10, 24));
    assert_eq!((cider.litres, cider.refills), (20, 24));
}
