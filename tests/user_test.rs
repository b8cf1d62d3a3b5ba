//! Account model tests: creation, lookup, and password hashing.

mod common;

use common::*;
use ideabay::auth::guard::Role;
use ideabay::auth::password;
use ideabay::models::user::{self, NewUser};

#[tokio::test]
async fn create_and_find_by_username() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let id = user::create(
        pool,
        &NewUser {
            username: "carol".to_string(),
            password: "hashed".to_string(),
            display_name: "Carol".to_string(),
            role: Role::Member,
        },
    )
    .await
    .expect("create");
    assert!(id > 0);

    let found = user::find_by_username(pool, "carol").await.expect("query").expect("exists");
    assert_eq!(found.id, id);
    assert_eq!(found.display_name, "Carol");
    assert_eq!(found.role, Role::Member);
}

#[tokio::test]
async fn username_exists_is_exact() {
    let db = setup_test_db().await;
    let pool = db.pool();
    member(pool, "dave").await;

    assert!(user::username_exists(pool, "dave").await.expect("query"));
    assert!(!user::username_exists(pool, "dav").await.expect("query"));
}

#[tokio::test]
async fn duplicate_username_is_rejected_by_the_schema() {
    let db = setup_test_db().await;
    let pool = db.pool();
    member(pool, "erin").await;

    let result = user::create(
        pool,
        &NewUser {
            username: "erin".to_string(),
            password: "hashed".to_string(),
            display_name: "Erin again".to_string(),
            role: Role::Member,
        },
    )
    .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn admin_role_round_trips() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let boss = admin(pool, "root").await;

    let found = user::find_by_id(pool, boss.id).await.expect("query").expect("exists");
    assert_eq!(found.role, Role::Admin);
    assert!(boss.is_admin());
}

#[test]
fn password_hash_round_trip() {
    let hash = password::hash_password("hunter2hunter2").expect("hash");
    assert_ne!(hash, "hunter2hunter2");
    assert!(password::verify_password("hunter2hunter2", &hash).expect("verify"));
    assert!(!password::verify_password("wrong password", &hash).expect("verify"));
}
