//! User repository (`utilisateurs` table)

use super::log_failure;
use crate::domain::User;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::mysql::MySqlQueryResult;
use sqlx::{Connection, MySqlConnection, MySqlPool};
use tracing::{debug, error, info, warn};

const TABLE: &str = "utilisateurs";
const INSERT_USER: &str = "INSERT INTO utilisateurs (nom, email) VALUES (?, ?)";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All rows, in whatever order the server returns them
    async fn find_all(&self) -> Result<Vec<User>>;
    async fn find_by_id(&self, id: i32) -> Result<Option<User>>;
    /// Insert `user` and write the generated key back into `user.id`
    async fn save(&self, user: &mut User) -> Result<()>;
    /// Overwrite name and email of the row `user.id`; `NotFound` if there is none
    async fn update(&self, user: &User) -> Result<()>;
    async fn delete(&self, id: i32) -> Result<()>;
    /// Insert every record in one transaction, all or nothing.
    ///
    /// Generated keys are written back only once the transaction has committed.
    async fn save_all(&self, users: &mut [User]) -> Result<()>;
    async fn count(&self) -> Result<i64>;
}

pub struct UserRepositoryImpl {
    pool: MySqlPool,
}

impl UserRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn insert_batch(conn: &mut MySqlConnection, users: &[User]) -> Result<Vec<i32>> {
        let mut ids = Vec::with_capacity(users.len());
        for (index, user) in users.iter().enumerate() {
            let result = sqlx::query(INSERT_USER)
                .bind(&user.name)
                .bind(&user.email)
                .execute(&mut *conn)
                .await
                .map_err(|e| {
                    let err = AppError::from(e);
                    warn!(index, error = %err, "Batch insert rejected");
                    err
                })?;
            ids.push(generated_id(&result)?);
        }
        Ok(ids)
    }
}

fn generated_id(result: &MySqlQueryResult) -> Result<i32> {
    let raw = result.last_insert_id();
    i32::try_from(raw)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Generated id {} out of range", raw)))
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn find_all(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT id, nom, email FROM utilisateurs")
            .fetch_all(&self.pool)
            .await
            .map_err(log_failure(TABLE, "find_all"))?;

        Ok(users)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT id, nom, email FROM utilisateurs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(log_failure(TABLE, "find_by_id"))?;

        Ok(user)
    }

    async fn save(&self, user: &mut User) -> Result<()> {
        let result = sqlx::query(INSERT_USER)
            .bind(&user.name)
            .bind(&user.email)
            .execute(&self.pool)
            .await
            .map_err(log_failure(TABLE, "save"))?;

        user.id = generated_id(&result)?;
        debug!(id = user.id, "User saved");
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<()> {
        let result = sqlx::query("UPDATE utilisateurs SET nom = ?, email = ? WHERE id = ?")
            .bind(&user.name)
            .bind(&user.email)
            .bind(user.id)
            .execute(&self.pool)
            .await
            .map_err(log_failure(TABLE, "update"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", user.id)));
        }

        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM utilisateurs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(log_failure(TABLE, "delete"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }

        Ok(())
    }

    async fn save_all(&self, users: &mut [User]) -> Result<()> {
        if users.is_empty() {
            return Ok(());
        }

        let mut conn = self.pool.acquire().await.map_err(|e| {
            error!(error = %e, "save_all could not acquire a connection");
            AppError::Connection(e)
        })?;
        debug!(batch = users.len(), "Connection acquired");

        let outcome = match conn.begin().await {
            Err(e) => {
                error!(error = %e, "save_all could not begin a transaction");
                Err(AppError::from(e))
            }
            Ok(mut tx) => match Self::insert_batch(&mut tx, users).await {
                Ok(ids) => match tx.commit().await {
                    Ok(()) => {
                        for (user, id) in users.iter_mut().zip(ids) {
                            user.id = id;
                        }
                        info!(batch = users.len(), "Batch committed");
                        Ok(())
                    }
                    // A failed commit leaves the transaction open; dropping it rolls back
                    Err(e) => {
                        error!(error = %e, "Batch commit failed");
                        Err(AppError::from(e))
                    }
                },
                Err(err) => {
                    if let Err(rollback_err) = tx.rollback().await {
                        error!(error = %rollback_err, "Batch rollback failed");
                    } else {
                        warn!(batch = users.len(), "Batch rolled back");
                    }
                    Err(err)
                }
            },
        };

        drop(conn);
        debug!("Connection released");
        outcome
    }

    async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM utilisateurs")
            .fetch_one(&self.pool)
            .await
            .map_err(log_failure(TABLE, "count"))?;
        Ok(row.0)
    }
}
