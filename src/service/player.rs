//! Player business logic

use crate::domain::{Player, Sex};
use crate::error::{AppError, Result};
use crate::repository::PlayerRepository;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub struct PlayerService<R: PlayerRepository> {
    repo: Arc<R>,
}

impl<R: PlayerRepository> PlayerService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Player>> {
        self.repo.list_all().await
    }

    pub async fn get(&self, id: i64) -> Result<Player> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Player {} not found", id)))
    }

    pub async fn find_by_name(&self, last_name: &str, first_name: &str) -> Result<Player> {
        self.repo
            .find_by_name(last_name, first_name)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Player '{} {}' not found", last_name, first_name))
            })
    }

    pub async fn create(&self, last_name: String, first_name: String, sex: Sex) -> Result<Player> {
        let mut player = Player::new(last_name, first_name, sex);
        player.validate()?;

        self.repo.create(&mut player).await?;

        info!(id = player.id, "Player created");
        Ok(player)
    }

    pub async fn rename(&self, id: i64, last_name: String, first_name: String) -> Result<Player> {
        let mut player = self.get(id).await?;
        player.last_name = last_name;
        player.first_name = first_name;
        player.validate()?;

        self.repo.update(&player).await?;

        info!(id, "Player renamed");
        Ok(player)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.repo.delete(id).await?;
        info!(id, "Player deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::player::MockPlayerRepository;
    use mockall::predicate::*;

    #[tokio::test]
    async fn test_create_player() {
        let mut mock = MockPlayerRepository::new();
        mock.expect_create()
            .withf(|p| p.last_name == "Djokovic" && p.sex == Sex::Male)
            .returning(|p| {
                p.id = 1;
                Ok(())
            });

        let service = PlayerService::new(Arc::new(mock));
        let player = service
            .create("Djokovic".to_string(), "Novak".to_string(), Sex::Male)
            .await
            .unwrap();
        assert_eq!(player.id, 1);
    }

    #[tokio::test]
    async fn test_create_player_rejects_empty_name() {
        let mut mock = MockPlayerRepository::new();
        mock.expect_create().never();

        let service = PlayerService::new(Arc::new(mock));
        let result = service
            .create(String::new(), "Novak".to_string(), Sex::Male)
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_rename_keeps_sex() {
        let mut mock = MockPlayerRepository::new();
        mock.expect_get_by_id().with(eq(20)).returning(|id| {
            Ok(Some(Player {
                id,
                ..Player::new("Williams", "Serena", Sex::Female)
            }))
        });
        mock.expect_update()
            .withf(|p| p.id == 20 && p.last_name == "Williams" && p.first_name == "Venus")
            .returning(|_| Ok(()));

        let service = PlayerService::new(Arc::new(mock));
        let player = service
            .rename(20, "Williams".to_string(), "Venus".to_string())
            .await
            .unwrap();
        assert_eq!(player.sex, Sex::Female);
    }

    #[tokio::test]
    async fn test_find_by_name_not_found() {
        let mut mock = MockPlayerRepository::new();
        mock.expect_find_by_name().returning(|_, _| Ok(None));

        let service = PlayerService::new(Arc::new(mock));
        let result = service.find_by_name("Poinas", "Yannick").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_player() {
        let mut mock = MockPlayerRepository::new();
        mock.expect_delete()
            .with(eq(45))
            .returning(|id| Err(AppError::NotFound(format!("Player {} not found", id))));

        let service = PlayerService::new(Arc::new(mock));
        assert!(matches!(
            service.delete(45).await,
            Err(AppError::NotFound(_))
        ));
    }
}
