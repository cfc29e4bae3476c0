//! Integration tests for the infrastructure components
//!
//! These tests verify that the PostgreSQL database and Redis cache
//! are properly configured and that the schema migrations apply cleanly.

use common::{
    cache::{RedisConfig, RedisPool},
    database::{DatabaseConfig, health_check, init_pool, run_migrations},
};
use sqlx::Row;

/// Verifies both PostgreSQL and Redis are reachable and the schema is in place
#[tokio::test]
#[ignore = "requires running PostgreSQL and Redis instances"]
async fn test_infrastructure_integration() -> Result<(), Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    assert!(health_check(&pool).await?, "Database health check failed");

    run_migrations(&pool).await?;

    let row = sqlx::query(
        "SELECT COUNT(*) AS tables FROM information_schema.tables \
         WHERE table_name IN ('users', 'media')",
    )
    .fetch_one(&pool)
    .await?;
    let tables: i64 = row.get("tables");
    assert_eq!(tables, 2, "users and media tables should exist");

    let redis_config = RedisConfig::from_env()?;
    let redis_pool = RedisPool::new(&redis_config).await?;
    assert!(
        redis_pool.health_check().await?,
        "Redis health check failed"
    );

    let test_key = "revoked_session:integration-test";
    redis_pool.set_expiring(test_key, "1", 1).await?;
    assert!(redis_pool.exists(test_key).await?, "Redis SET/EXISTS failed");

    tokio::time::sleep(std::time::Duration::from_millis(2100)).await;
    assert!(
        !redis_pool.exists(test_key).await?,
        "Redis key outlived its TTL"
    );

    Ok(())
}

/// The owner foreign key rejects media rows without a matching user
#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_media_requires_existing_owner() -> Result<(), Box<dyn std::error::Error>> {
    let pool = init_pool(&DatabaseConfig::from_env()?).await?;
    run_migrations(&pool).await?;

    let result = sqlx::query(
        "INSERT INTO media (user_id, title, media_type, status) VALUES ($1, 'Dune', 'movie', 'watching')",
    )
    .bind(-1_i64)
    .execute(&pool)
    .await;

    assert!(result.is_err(), "orphan media row must be rejected");
    Ok(())
}
