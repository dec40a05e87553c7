//! Pacticipants service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::info;

use crate::{
    config::resources::NameMatching,
    database::Db,
    domain::pacticipants::{
        data::NewPacticipant, errors::PacticipantsServiceError, records::PacticipantRecord,
        repository::PgPacticipantsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgPacticipantsService {
    db: Db,
    repository: PgPacticipantsRepository,
    name_matching: NameMatching,
}

impl PgPacticipantsService {
    #[must_use]
    pub fn new(db: Db, name_matching: NameMatching) -> Self {
        Self {
            db,
            repository: PgPacticipantsRepository::new(),
            name_matching,
        }
    }
}

#[async_trait]
impl PacticipantsService for PgPacticipantsService {
    #[tracing::instrument(
        name = "pacticipants.service.create_pacticipant",
        skip(self, pacticipant),
        fields(pacticipant_name = %pacticipant.name),
        err
    )]
    async fn create_pacticipant(
        &self,
        pacticipant: NewPacticipant,
    ) -> Result<PacticipantRecord, PacticipantsServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_pacticipant(&mut tx, pacticipant, Timestamp::now())
            .await?;

        tx.commit().await?;

        info!(pacticipant_id = %created.id, "created pacticipant");

        Ok(created)
    }

    async fn find_pacticipant_by_name(
        &self,
        name: String,
    ) -> Result<PacticipantRecord, PacticipantsServiceError> {
        let mut tx = self.db.begin().await?;

        let pacticipant = self
            .repository
            .find_pacticipant_by_name(&mut tx, &name, self.name_matching)
            .await?;

        tx.commit().await?;

        pacticipant.ok_or(PacticipantsServiceError::NotFound)
    }
}

#[automock]
#[async_trait]
/// Pacticipant persistence operations.
pub trait PacticipantsService: Send + Sync {
    /// Creates a new pacticipant.
    async fn create_pacticipant(
        &self,
        pacticipant: NewPacticipant,
    ) -> Result<PacticipantRecord, PacticipantsServiceError>;

    /// Finds the pacticipant whose name matches `name`, honouring the configured
    /// case sensitivity.
    async fn find_pacticipant_by_name(
        &self,
        name: String,
    ) -> Result<PacticipantRecord, PacticipantsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn create_pacticipant_returns_name() -> TestResult {
        let ctx = TestContext::new().await;

        let pacticipant = ctx
            .pacticipants
            .create_pacticipant(NewPacticipant {
                name: "Foo".to_string(),
                display_name: None,
            })
            .await?;

        assert_eq!(pacticipant.name, "Foo");
        assert_eq!(pacticipant.created_at, pacticipant.updated_at);

        Ok(())
    }

    #[tokio::test]
    async fn create_pacticipant_duplicate_name_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.create_pacticipant("Foo").await;

        let result = ctx
            .pacticipants
            .create_pacticipant(NewPacticipant {
                name: "Foo".to_string(),
                display_name: None,
            })
            .await;

        assert!(
            matches!(result, Err(PacticipantsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn find_pacticipant_by_name_ignores_case_when_configured() -> TestResult {
        let ctx = TestContext::new().await;
        let created = ctx.create_pacticipant("Foo").await;

        let insensitive = PgPacticipantsService::new(ctx.db(), NameMatching::CaseInsensitive);
        let found = insensitive.find_pacticipant_by_name("foo".to_string()).await?;

        assert_eq!(found.id, created.id);

        let sensitive = PgPacticipantsService::new(ctx.db(), NameMatching::CaseSensitive);
        let result = sensitive.find_pacticipant_by_name("foo".to_string()).await;

        assert!(
            matches!(result, Err(PacticipantsServiceError::NotFound)),
            "expected NotFound for case-sensitive lookup, got {result:?}"
        );

        Ok(())
    }
}
