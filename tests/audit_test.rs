//! Audit trail tests.

mod common;

use common::*;
use ideabay::audit;
use serde_json::json;

#[tokio::test]
async fn log_and_read_back() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let boss = admin(pool, "root").await;

    audit::log(
        pool,
        boss.id,
        "idea.exclusive_granted",
        "idea",
        42,
        json!({ "display_number": "20250601-001" }),
    )
    .await
    .expect("log");

    let entries = audit::find_recent(pool, 10).await.expect("read");
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.user_id, boss.id);
    assert_eq!(entry.action, "idea.exclusive_granted");
    assert_eq!(entry.target_type, "idea");
    assert_eq!(entry.target_id, 42);
    assert_eq!(entry.details["display_number"], "20250601-001");
}

#[tokio::test]
async fn find_recent_orders_newest_first_and_respects_limit() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let boss = admin(pool, "root").await;

    for i in 0..5 {
        audit::log(pool, boss.id, "idea.created", "idea", i, json!({}))
            .await
            .expect("log");
    }

    let entries = audit::find_recent(pool, 3).await.expect("read");
    assert_eq!(entries.len(), 3);
    // Newest first: the highest target ids were written last.
    assert_eq!(entries[0].target_id, 4);
    assert_eq!(entries[1].target_id, 3);
    assert_eq!(entries[2].target_id, 2);
}
