use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::PgPool;
use sqlx::types::Json;

/// Row key for the claim engine's snapshot.
pub const CLAIMS_ENGINE: &str = "claims";
/// Row key for the siege engine's snapshot.
pub const SIEGES_ENGINE: &str = "sieges";

/// Store one engine's snapshot, replacing the previous one.
pub async fn save_snapshot<T>(pool: &PgPool, engine: &str, snapshot: &T) -> Result<(), sqlx::Error>
where
    T: Serialize + Sync,
{
    sqlx::query(include_str!("../../sql/upsert_snapshot.sql"))
        .bind(engine)
        .bind(Json(snapshot))
        .execute(pool)
        .await?;
    Ok(())
}

/// Fetch one engine's snapshot. `None` when nothing was saved yet.
pub async fn load_snapshot<T>(pool: &PgPool, engine: &str) -> Result<Option<T>, sqlx::Error>
where
    T: DeserializeOwned + Send + Unpin + 'static,
{
    let row: Option<(Json<T>,)> = sqlx::query_as(include_str!("../../sql/select_snapshot.sql"))
        .bind(engine)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(Json(body),)| body))
}
