use rusqlite::{OptionalExtension, params, params_from_iter};
use tracing::debug;
use uuid::Uuid;

use seekr_types::models::{
    Application, ApplicationDetails, ApplicationListItem, ApplicationStatus, OwnerId,
};

use crate::error::{Operation, RepoError, RepoResult};
use crate::models::{APPLICATION_COLUMNS, application_from_row};
use crate::{Database, Insertion, queries};

/// Which applications `delete_applications` removes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteSelector {
    /// Every application owned by `owner_id`.
    ByOwner { owner_id: OwnerId },
    /// The listed applications, whoever owns them. Callers that act on
    /// behalf of a user must establish ownership before using this.
    ByIds { ids: Vec<Uuid> },
}

/// Owner-scoped access to the `applications` table.
#[derive(Clone)]
pub struct ApplicationsRepository {
    db: Database,
}

impl ApplicationsRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn get_all_applications(
        &self,
        owner: &OwnerId,
    ) -> RepoResult<Vec<ApplicationListItem>> {
        let owner = owner.clone();
        self.db
            .call(Operation::ReadApplications, move |conn| {
                queries::query_application_list(conn, &owner)
            })
            .await
    }

    /// The application and its interviews, earliest interview first. Both
    /// reads share one transaction, so the interview list always belongs to
    /// the application that passed the ownership check.
    pub async fn get_application_by_id(
        &self,
        owner: &OwnerId,
        id: Uuid,
    ) -> RepoResult<ApplicationDetails> {
        let owner = owner.clone();
        self.db
            .call(Operation::ReadApplications, move |conn| {
                let tx = conn.transaction()?;
                let Some(application) = queries::query_application(&tx, &owner, id)? else {
                    return Ok(None);
                };
                let interviews = queries::query_interviews_for_application(&tx, id)?;
                tx.commit()?;

                Ok(Some(ApplicationDetails {
                    application,
                    interviews,
                }))
            })
            .await?
            .ok_or(RepoError::NotFound)
    }

    /// Every application of the owner with its interviews, for reports.
    pub async fn get_application_history(
        &self,
        owner: &OwnerId,
    ) -> RepoResult<Vec<ApplicationDetails>> {
        let owner = owner.clone();
        self.db
            .call(Operation::ReadApplications, move |conn| {
                let tx = conn.transaction()?;
                let history = queries::query_application_history(&tx, &owner)?;
                tx.commit()?;
                Ok(history)
            })
            .await
    }

    pub async fn set_application_status(
        &self,
        owner: &OwnerId,
        id: Uuid,
        status: ApplicationStatus,
    ) -> RepoResult<Application> {
        let owner = owner.clone();
        self.db
            .call(Operation::UpdateApplication, move |conn| {
                let sql = format!(
                    "UPDATE applications SET status = ?1
                     WHERE id = ?2 AND user_id = ?3
                     RETURNING {APPLICATION_COLUMNS}"
                );
                conn.query_row(
                    &sql,
                    params![status.as_str(), id.to_string(), owner.as_str()],
                    application_from_row,
                )
                .optional()
            })
            .await?
            .ok_or(RepoError::NotFound)
    }

    pub async fn set_application_job_description(
        &self,
        owner: &OwnerId,
        id: Uuid,
        job_description: String,
    ) -> RepoResult<Application> {
        let owner = owner.clone();
        self.db
            .call(Operation::UpdateApplication, move |conn| {
                let sql = format!(
                    "UPDATE applications SET job_description = ?1
                     WHERE id = ?2 AND user_id = ?3
                     RETURNING {APPLICATION_COLUMNS}"
                );
                conn.query_row(
                    &sql,
                    params![job_description, id.to_string(), owner.as_str()],
                    application_from_row,
                )
                .optional()
            })
            .await?
            .ok_or(RepoError::NotFound)
    }

    /// Inserts `application` unless its id is taken. A taken id is
    /// `AlreadyExists` only when the row belongs to the same owner; an id
    /// held by someone else is `NotFound`, like any other foreign row.
    pub async fn add_application(
        &self,
        application: Application,
    ) -> RepoResult<Insertion<Application>> {
        self.db
            .call(Operation::InsertApplication, move |conn| {
                let tx = conn.transaction()?;
                let sql = format!(
                    "INSERT INTO applications ({APPLICATION_COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                     ON CONFLICT DO NOTHING
                     RETURNING {APPLICATION_COLUMNS}"
                );
                let inserted = tx
                    .query_row(
                        &sql,
                        params![
                            application.id.to_string(),
                            application.user_id.as_str(),
                            application.company,
                            application.position,
                            application.application_date,
                            application.status.as_str(),
                            application.job_description,
                            application.job_posting_url,
                        ],
                        application_from_row,
                    )
                    .optional()?;

                let outcome = match inserted {
                    Some(application) => Some(Insertion::Created(application)),
                    None if queries::application_exists(
                        &tx,
                        &application.user_id,
                        application.id,
                    )? =>
                    {
                        Some(Insertion::AlreadyExists)
                    }
                    None => None,
                };
                tx.commit()?;
                Ok(outcome)
            })
            .await?
            .ok_or(RepoError::NotFound)
    }

    /// Interviews and their comments go with the application through
    /// `ON DELETE CASCADE`.
    pub async fn delete_applications(&self, selector: DeleteSelector) -> RepoResult<()> {
        self.db
            .call(Operation::DeleteApplications, move |conn| {
                let removed = match &selector {
                    DeleteSelector::ByOwner { owner_id } => conn.execute(
                        "DELETE FROM applications WHERE user_id = ?1",
                        [owner_id.as_str()],
                    )?,
                    DeleteSelector::ByIds { ids } if ids.is_empty() => 0,
                    DeleteSelector::ByIds { ids } => {
                        let placeholders: Vec<String> =
                            (1..=ids.len()).map(|i| format!("?{}", i)).collect();
                        let sql = format!(
                            "DELETE FROM applications WHERE id IN ({})",
                            placeholders.join(", ")
                        );
                        conn.execute(&sql, params_from_iter(ids.iter().map(Uuid::to_string)))?
                    }
                };
                debug!("Deleted {} applications ({:?})", removed, selector);
                Ok(())
            })
            .await
    }
}
