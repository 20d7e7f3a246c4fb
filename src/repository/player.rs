//! Player repository (`JOUEUR` table)

use super::log_failure;
use crate::domain::Player;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;
use tracing::debug;

const TABLE: &str = "JOUEUR";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    async fn create(&self, player: &mut Player) -> Result<()>;
    /// Renames the player; the stored sex is left as is
    async fn update(&self, player: &Player) -> Result<()>;
    async fn delete(&self, id: i64) -> Result<()>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Player>>;
    async fn find_by_name(&self, last_name: &str, first_name: &str) -> Result<Option<Player>>;
    async fn list_all(&self) -> Result<Vec<Player>>;
}

pub struct PlayerRepositoryImpl {
    pool: MySqlPool,
}

impl PlayerRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlayerRepository for PlayerRepositoryImpl {
    async fn create(&self, player: &mut Player) -> Result<()> {
        let result = sqlx::query("INSERT INTO JOUEUR (NOM, PRENOM, SEXE) VALUES (?, ?, ?)")
            .bind(&player.last_name)
            .bind(&player.first_name)
            .bind(player.sex)
            .execute(&self.pool)
            .await
            .map_err(log_failure(TABLE, "create"))?;

        player.id = i64::try_from(result.last_insert_id()).map_err(|_| {
            AppError::Internal(anyhow::anyhow!(
                "Generated id {} out of range",
                result.last_insert_id()
            ))
        })?;

        debug!(id = player.id, "Player created");
        Ok(())
    }

    async fn update(&self, player: &Player) -> Result<()> {
        let result = sqlx::query("UPDATE JOUEUR SET NOM = ?, PRENOM = ? WHERE ID = ?")
            .bind(&player.last_name)
            .bind(&player.first_name)
            .bind(player.id)
            .execute(&self.pool)
            .await
            .map_err(log_failure(TABLE, "update"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Player {} not found", player.id)));
        }

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM JOUEUR WHERE ID = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(log_failure(TABLE, "delete"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Player {} not found", id)));
        }

        Ok(())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Player>> {
        let player = sqlx::query_as::<_, Player>(
            "SELECT ID, NOM, PRENOM, SEXE FROM JOUEUR WHERE ID = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(log_failure(TABLE, "get_by_id"))?;

        Ok(player)
    }

    async fn find_by_name(&self, last_name: &str, first_name: &str) -> Result<Option<Player>> {
        let player = sqlx::query_as::<_, Player>(
            r#"
            SELECT ID, NOM, PRENOM, SEXE
            FROM JOUEUR
            WHERE NOM = ? AND PRENOM = ?
            LIMIT 1
            "#,
        )
        .bind(last_name)
        .bind(first_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(log_failure(TABLE, "find_by_name"))?;

        Ok(player)
    }

    async fn list_all(&self) -> Result<Vec<Player>> {
        let players = sqlx::query_as::<_, Player>("SELECT ID, NOM, PRENOM, SEXE FROM JOUEUR")
            .fetch_all(&self.pool)
            .await
            .map_err(log_failure(TABLE, "list_all"))?;

        Ok(players)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sex;
    use crate::repository::{unreachable_pool, CapturedLogs};
    use mockall::predicate::*;

    #[tokio::test]
    async fn test_mock_player_repository() {
        let mut mock = MockPlayerRepository::new();

        mock.expect_find_by_name()
            .with(eq("Poinas"), eq("Yannick"))
            .returning(|last, first| {
                Ok(Some(Player {
                    id: 44,
                    ..Player::new(last, first, Sex::Male)
                }))
            });

        let player = mock.find_by_name("Poinas", "Yannick").await.unwrap().unwrap();
        assert_eq!(player.id, 44);
        assert_eq!(player.sex, Sex::Male);
    }

    #[tokio::test]
    async fn test_query_failure_is_logged_with_table() {
        let logs = CapturedLogs::default();
        let _guard = logs.install();
        let repo = PlayerRepositoryImpl::new(unreachable_pool());

        let err = repo.list_all().await.unwrap_err();

        assert!(matches!(err, AppError::Connection(_)));
        let output = logs.contents();
        assert!(output.contains("Query failed"));
        assert!(output.contains("JOUEUR"));
        assert!(output.contains("list_all"));
    }
}
