//! These tests need a Redis server, `redis://localhost:6379/` unless
//! `REDIS_URL` says otherwise.
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use common_stream::{process_batch, DecodeFailurePolicy, StreamRecord};
use futures::StreamExt;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use redis_updater::event::TrackingMessage;
use redis_updater::handler::RedisPipeline;
use redis_updater::notify::{Notifier, RedisPublisher};
use redis_updater::store::{FieldMapStore, RedisFieldMapStore};

fn redis_url() -> String {
    std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379/".to_string())
}

fn client() -> redis::Client {
    redis::Client::open(redis_url()).expect("Failed to create redis client")
}

async fn connection() -> ConnectionManager {
    ConnectionManager::new(client())
        .await
        .expect("Failed to connect to redis")
}

fn unique_key(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{prefix}:{}:{nanos}", std::process::id())
}

fn tracking_message(program_id: &str) -> TrackingMessage {
    TrackingMessage {
        program_id: program_id.to_string(),
        checksum: "check123".to_string(),
        customer_id: 1234,
        customer_name: "myCustomer".to_string(),
        program_name: "myProgram".to_string(),
        is_valid: true,
    }
}

#[tokio::test]
async fn test_replace_drops_stale_fields() {
    let mut conn = connection().await;
    let store = RedisFieldMapStore::new(conn.clone());
    let key = unique_key("program");

    let _: () = conn
        .hset_multiple(&key, &[("stale", "x"), ("checksum", "old")])
        .await
        .unwrap();

    store
        .replace(&key, &tracking_message(&key).field_map())
        .await
        .unwrap();

    let fields = store.read(&key).await.unwrap();
    assert_eq!(fields.len(), 6);
    assert!(!fields.contains_key("stale"));
    assert_eq!(fields["checksum"], "check123");

    let _: () = conn.del(&key).await.unwrap();
}

#[tokio::test]
async fn test_unknown_key_reads_empty() {
    let store = RedisFieldMapStore::new(connection().await);

    assert!(store.read(&unique_key("missing")).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_batch_is_stored_and_published_once() {
    let conn = connection().await;
    let key = unique_key("program");
    let message = tracking_message(&key);

    let mut subscriber = client().get_async_pubsub().await.unwrap();
    subscriber.subscribe("c1").await.unwrap();
    let mut messages = subscriber.on_message();

    let store = RedisFieldMapStore::new(conn.clone());
    let pipeline = RedisPipeline::new(
        Arc::new(store.clone()),
        Notifier::new(Arc::new(RedisPublisher::new(conn.clone())), "c1"),
    );

    let summary = process_batch(
        &pipeline,
        DecodeFailurePolicy::Skip,
        vec![StreamRecord::new("1", serde_json::to_vec(&message).unwrap())],
    )
    .await
    .unwrap();
    assert_eq!(summary.delivered, 1);

    let fields = store.read(&key).await.unwrap();
    let stored = TrackingMessage::from_field_map(&key, &fields).unwrap();
    assert_eq!(stored.customer_id, 1234);
    assert_eq!(stored, message);

    let published = tokio::time::timeout(Duration::from_secs(2), messages.next())
        .await
        .expect("no message published")
        .expect("subscription closed");
    let published: TrackingMessage =
        serde_json::from_str(&published.get_payload::<String>().unwrap()).unwrap();
    assert_eq!(published, message);

    assert!(
        tokio::time::timeout(Duration::from_millis(200), messages.next())
            .await
            .is_err()
    );

    let _: () = conn.clone().del(&key).await.unwrap();
}

#[tokio::test]
async fn test_store_recovers_after_connection_is_killed() {
    let mut conn = connection().await;
    let store = RedisFieldMapStore::new(conn.clone());
    let key = unique_key("program");

    let id: i64 = redis::cmd("CLIENT")
        .arg("ID")
        .query_async(&mut conn)
        .await
        .unwrap();
    let mut admin = client().get_multiplexed_async_connection().await.unwrap();
    let _: () = redis::cmd("CLIENT")
        .arg("KILL")
        .arg("ID")
        .arg(id)
        .query_async(&mut admin)
        .await
        .unwrap();

    // The first command after the drop may fail while the manager reconnects.
    let mut written = false;
    for _ in 0..20 {
        if store
            .replace(&key, &tracking_message(&key).field_map())
            .await
            .is_ok()
        {
            written = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    assert!(written);
    assert_eq!(store.read(&key).await.unwrap()["programId"], key);

    let _: () = admin.del(&key).await.unwrap();
}
