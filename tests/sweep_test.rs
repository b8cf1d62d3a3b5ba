//! Deadline sweep tests: which ideas move to overdue, scoping, and the
//! shape of the outcome report.

mod common;

use chrono::Utc;
use common::*;
use ideabay::models::idea::{self, IdeaStatus};
use ideabay::sweep::{run_sweep, SweepScope};

#[tokio::test]
async fn sweep_moves_expired_published_ideas_to_overdue() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let author = member(pool, "alice").await;

    let expired = publish_idea(pool, &author, "Expired", past_deadline()).await;
    let current = publish_idea(pool, &author, "Current", future_deadline()).await;

    let outcome = run_sweep(pool, SweepScope::Global, Utc::now()).await.expect("sweep");
    assert_eq!(outcome.failed, 0);
    assert_eq!(outcome.updated_count, 1);
    assert_eq!(outcome.updated.len(), 1);
    assert_eq!(outcome.updated[0].id, expired.id);
    assert_eq!(outcome.updated[0].display_number, expired.display_number);

    let expired = idea::find_by_id(pool, expired.id).await.expect("query").expect("exists");
    assert_eq!(expired.status, IdeaStatus::Overdue);
    let current = idea::find_by_id(pool, current.id).await.expect("query").expect("exists");
    assert_eq!(current.status, IdeaStatus::Published);
}

#[tokio::test]
async fn missing_deadline_counts_as_expired() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let author = member(pool, "alice").await;

    let no_deadline = publish_idea(pool, &author, "No deadline", None).await;
    let outcome = run_sweep(pool, SweepScope::Global, Utc::now()).await.expect("sweep");
    assert_eq!(outcome.updated.len(), 1);
    assert_eq!(outcome.updated[0].id, no_deadline.id);
}

#[tokio::test]
async fn author_scoped_sweep_leaves_other_authors_alone() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let alice = member(pool, "alice").await;
    let bob = member(pool, "bob").await;

    let alices = publish_idea(pool, &alice, "Alice late", past_deadline()).await;
    let bobs = publish_idea(pool, &bob, "Bob late", past_deadline()).await;

    let outcome = run_sweep(pool, SweepScope::Author(alice.id), Utc::now())
        .await
        .expect("sweep");
    assert_eq!(outcome.updated.len(), 1);
    assert_eq!(outcome.updated[0].author_id, alice.id);

    let alices = idea::find_by_id(pool, alices.id).await.expect("query").expect("exists");
    assert_eq!(alices.status, IdeaStatus::Overdue);
    let bobs = idea::find_by_id(pool, bobs.id).await.expect("query").expect("exists");
    assert_eq!(bobs.status, IdeaStatus::Published);
}

#[tokio::test]
async fn sweep_ignores_non_published_ideas() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let author = member(pool, "alice").await;

    let already = publish_idea(pool, &author, "Already overdue", past_deadline()).await;
    idea::mark_overdue(pool, already.id, Utc::now()).await.expect("mark overdue");

    let outcome = run_sweep(pool, SweepScope::Global, Utc::now()).await.expect("sweep");
    assert!(outcome.updated.is_empty());
}

#[tokio::test]
async fn second_sweep_is_a_no_op() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let author = member(pool, "alice").await;
    publish_idea(pool, &author, "Expired", past_deadline()).await;

    let first = run_sweep(pool, SweepScope::Global, Utc::now()).await.expect("sweep");
    assert_eq!(first.updated.len(), 1);
    let second = run_sweep(pool, SweepScope::Global, Utc::now()).await.expect("sweep");
    assert!(second.updated.is_empty());
    assert_eq!(second.updated_count, 0);
    assert_eq!(second.failed, 0);
}
