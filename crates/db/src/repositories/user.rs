use crate::models::DbUser;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_user(
    pool: &Pool<Postgres>,
    name: &str,
    email: &str,
    role: &str,
    workshop_id: Option<Uuid>,
) -> Result<DbUser> {
    let id = Uuid::new_v4();

    tracing::debug!("Creating user: id={}, email={}, role={}", id, email, role);

    let user = sqlx::query_as::<_, DbUser>(
        r#"
        INSERT INTO users (id, name, email, role, workshop_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, email, role, workshop_id, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(email)
    .bind(role)
    .bind(workshop_id)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn get_user_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, name, email, role, workshop_id, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// The mechanic directory for a workshop: users with role `mechanic`
/// assigned to it. Ordering is deterministic so mechanic assignment
/// tie-breaks the same way on every request.
pub async fn get_mechanics(pool: &Pool<Postgres>, workshop_id: Uuid) -> Result<Vec<DbUser>> {
    tracing::debug!("Getting mechanics for workshop: {}", workshop_id);

    let mechanics = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, name, email, role, workshop_id, created_at
        FROM users
        WHERE role = 'mechanic' AND workshop_id = $1
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(workshop_id)
    .fetch_all(pool)
    .await?;

    Ok(mechanics)
}
