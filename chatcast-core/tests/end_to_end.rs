/*
    End-to-End Test - Mutation and Broadcast

    Drives the mutation service the way the HTTP layer does and checks that
    every accepted mutation shows up exactly once, in order, on a live
    subscription, while rejected ones leave both the store and the stream
    untouched.
*/

use chatcast_core::core_chat::{
    build_state, Attributes, Channel, ChangeEvent, ChatError, DeletedChannel, EntityId,
    EventBroadcaster, IdAllocator, MutationService, SeedData,
};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::broadcast::error::TryRecvError;

fn body(text: &str) -> Attributes {
    let mut attrs = Attributes::new();
    attrs.insert("body".to_string(), json!(text));
    attrs
}

fn seeded_service() -> (MutationService, EventBroadcaster) {
    let store = build_state(Arc::new(IdAllocator::new()), SeedData::default()).unwrap();
    let broadcaster = EventBroadcaster::new(64);
    let service = MutationService::new(store, Arc::new(broadcaster.clone()));
    (service, broadcaster)
}

/// **End-to-End Test: create, post, cascade delete**
///
/// Scenario:
/// 1. Seed store has general=1, random=2, current=1
/// 2. Create "dev" -> id 3
/// 3. Post to dev -> id 4
/// 4. Delete dev -> cascades message 4
/// 5. Only the seed channels remain
#[tokio::test]
async fn test_create_post_delete_scenario() {
    let (service, broadcaster) = seeded_service();
    let mut rx = broadcaster.subscribe();

    let snapshot = service.snapshot().await;
    assert_eq!(snapshot.current_channel_id, EntityId(1));

    let dev = service.create_channel("dev").await.unwrap();
    assert_eq!(dev, Channel::new(EntityId(3), "dev", true));

    let hi = service.create_message(dev.id, body("hi")).await.unwrap();
    assert_eq!(hi.id, EntityId(4));
    assert_eq!(hi.channel_id, EntityId(3));

    let deleted = service.delete_channel(dev.id).await.unwrap();
    assert_eq!(
        deleted,
        DeletedChannel {
            id: EntityId(3),
            cascaded_message_ids: vec![EntityId(4)],
        }
    );

    assert!(service.list_messages(EntityId(3)).await.is_empty());
    assert_eq!(
        service.list_channels().await,
        vec![
            Channel::new(EntityId(1), "general", false),
            Channel::new(EntityId(2), "random", false),
        ]
    );

    // One event per mutation, in apply order
    assert_eq!(rx.recv().await.unwrap(), ChangeEvent::ChannelCreated(dev));
    assert_eq!(rx.recv().await.unwrap(), ChangeEvent::MessageCreated(hi));
    assert_eq!(rx.recv().await.unwrap(), ChangeEvent::ChannelDeleted(deleted));
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_rejections_are_silent_on_the_stream() {
    let (service, broadcaster) = seeded_service();
    let mut rx = broadcaster.subscribe();
    let before = service.snapshot().await;

    assert_eq!(
        service.delete_channel(EntityId(1)).await,
        Err(ChatError::ChannelNotRemovable(EntityId(1)))
    );
    assert_eq!(
        service.delete_channel(EntityId(2)).await,
        Err(ChatError::ChannelNotRemovable(EntityId(2)))
    );
    assert_eq!(
        service.create_message(EntityId(30), body("x")).await,
        Err(ChatError::ChannelNotFound(EntityId(30)))
    );
    assert!(service.create_channel("").await.is_err());
    assert!(service.rename_channel(EntityId(30), "x").await.is_err());

    assert_eq!(service.snapshot().await, before);
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_listing_order_after_delete() {
    let (service, _broadcaster) = seeded_service();

    let a = service.create_channel("A").await.unwrap();
    service.create_channel("B").await.unwrap();
    service.delete_channel(a.id).await.unwrap();
    service.create_channel("C").await.unwrap();

    let names: Vec<String> = service
        .list_channels()
        .await
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["general", "random", "B", "C"]);
}

#[tokio::test]
async fn test_mutation_succeeds_without_subscribers() {
    let (service, broadcaster) = seeded_service();
    assert_eq!(broadcaster.subscriber_count(), 0);

    let channel = service.create_channel("quiet").await.unwrap();
    assert_eq!(channel.id, EntityId(3));
}

#[tokio::test]
async fn test_concurrent_writers_keep_integrity() {
    let (service, broadcaster) = seeded_service();
    let service = Arc::new(service);
    let mut rx = broadcaster.subscribe();

    let doomed = service.create_channel("doomed").await.unwrap();
    let _ = rx.recv().await;

    let mut handles = Vec::new();
    for i in 0..20 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            if i == 10 {
                service.delete_channel(doomed.id).await.map(|_| ())
            } else {
                service
                    .create_message(doomed.id, body("racing"))
                    .await
                    .map(|_| ())
            }
        }));
    }
    for handle in handles {
        let _ = handle.await.unwrap();
    }

    // Whatever interleaving happened, no message outlives its channel
    let snapshot = service.snapshot().await;
    assert!(snapshot
        .messages
        .iter()
        .all(|m| snapshot.channels.iter().any(|c| c.id == m.channel_id)));

    // And every message id the stream announced is unique
    let mut ids = Vec::new();
    while let Ok(event) = rx.try_recv() {
        ids.push(event.entity_id());
    }
    let total = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), total);
}
