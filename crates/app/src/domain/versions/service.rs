//! Versions service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        pacticipants::records::PacticipantId,
        versions::{
            data::NewVersion, errors::VersionsServiceError, records::VersionRecord,
            repository::PgVersionsRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgVersionsService {
    db: Db,
    repository: PgVersionsRepository,
}

impl PgVersionsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgVersionsRepository::new(),
        }
    }
}

#[async_trait]
impl VersionsService for PgVersionsService {
    #[tracing::instrument(
        name = "versions.service.create_version",
        skip(self, version),
        fields(pacticipant_id = %version.pacticipant_id, version_number = %version.number),
        err
    )]
    async fn create_version(&self, version: NewVersion) -> Result<VersionRecord, VersionsServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_version(&mut tx, version, Timestamp::now())
            .await?;

        tx.commit().await?;

        info!(version_id = %created.id, "created version");

        Ok(created)
    }

    async fn find_version(
        &self,
        pacticipant: PacticipantId,
        number: String,
    ) -> Result<VersionRecord, VersionsServiceError> {
        let mut tx = self.db.begin().await?;

        let version = self
            .repository
            .find_version(&mut tx, pacticipant, &number)
            .await?;

        tx.commit().await?;

        version.ok_or(VersionsServiceError::NotFound)
    }
}

#[automock]
#[async_trait]
/// Version persistence operations.
pub trait VersionsService: Send + Sync {
    /// Creates a version of a pacticipant.
    async fn create_version(&self, version: NewVersion) -> Result<VersionRecord, VersionsServiceError>;

    /// Finds a pacticipant's version by its number.
    async fn find_version(
        &self,
        pacticipant: PacticipantId,
        number: String,
    ) -> Result<VersionRecord, VersionsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn find_version_returns_created_version() -> TestResult {
        let ctx = TestContext::new().await;
        let pacticipant = ctx.create_pacticipant("Foo").await;

        let created = ctx
            .versions
            .create_version(NewVersion {
                pacticipant_id: pacticipant.id,
                number: "1.2.3".to_string(),
            })
            .await?;

        let found = ctx
            .versions
            .find_version(pacticipant.id, "1.2.3".to_string())
            .await?;

        assert_eq!(found.id, created.id);
        assert_eq!(found.number, "1.2.3");

        Ok(())
    }

    #[tokio::test]
    async fn create_version_for_unknown_pacticipant_returns_invalid_reference() {
        let ctx = TestContext::new().await;

        let result = ctx
            .versions
            .create_version(NewVersion {
                pacticipant_id: PacticipantId::from_i64(i64::MAX),
                number: "1".to_string(),
            })
            .await;

        assert!(
            matches!(result, Err(VersionsServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );
    }
}
