// ABOUTME: Common test utilities for billing integration tests
// ABOUTME: In-memory database setup and fixture helpers for properties and files

use chrono::Utc;
use sqlx::SqlitePool;

/// Fresh in-memory database with all migrations applied
pub async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create database pool");

    sqlx::migrate!("../storage/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Insert `count` active properties for `owner`
pub async fn seed_properties(pool: &SqlitePool, owner: &str, count: usize) {
    let now = Utc::now().to_rfc3339();
    for i in 0..count {
        sqlx::query(
            "INSERT INTO properties (id, owner_id, name, address, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(format!("{}-prop-{}", owner, i))
        .bind(owner)
        .bind(format!("Unit {}", i))
        .bind(format!("{} Park Street", i + 1))
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await
        .unwrap();
    }
}

/// Attribute a document of `bytes` to `owner`
#[allow(dead_code)]
pub async fn seed_document(pool: &SqlitePool, owner: &str, bytes: i64) {
    sqlx::query(
        "INSERT INTO documents (id, owner_id, file_name, file_url, file_size, created_at)
         VALUES (?, ?, 'scan.pdf', 'files/scan.pdf', ?, ?)",
    )
    .bind(rentwise_core::generate_id())
    .bind(owner)
    .bind(bytes)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await
    .unwrap();
}
