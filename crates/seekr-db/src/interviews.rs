use rusqlite::{OptionalExtension, params};
use uuid::Uuid;

use seekr_types::models::{Interview, InterviewComment, InterviewDetails, OwnerId};

use crate::error::{Operation, RepoError, RepoResult};
use crate::models::{COMMENT_COLUMNS, INTERVIEW_COLUMNS, comment_from_row, interview_from_row};
use crate::{Database, Insertion, queries};

/// Interviews and their comments. Ownership is resolved through the parent
/// application, so every call takes the owner id.
#[derive(Clone)]
pub struct InterviewsRepository {
    db: Database,
}

impl InterviewsRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// `NotFound` when the parent application is not the owner's, or when
    /// the id is already taken by an interview the owner cannot reach.
    pub async fn add_interview(
        &self,
        owner: &OwnerId,
        interview: Interview,
    ) -> RepoResult<Insertion<Interview>> {
        let owner = owner.clone();
        self.db
            .call(Operation::InsertInterview, move |conn| {
                let tx = conn.transaction()?;
                if !queries::application_exists(&tx, &owner, interview.application_id)? {
                    return Ok(None);
                }

                let sql = format!(
                    "INSERT INTO interviews ({INTERVIEW_COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                     ON CONFLICT DO NOTHING
                     RETURNING {INTERVIEW_COLUMNS}"
                );
                let inserted = tx
                    .query_row(
                        &sql,
                        params![
                            interview.id.to_string(),
                            interview.application_id.to_string(),
                            interview.interview_date,
                            interview.topic,
                            interview.participants,
                            interview.prep_notes,
                        ],
                        interview_from_row,
                    )
                    .optional()?;

                let outcome = match inserted {
                    Some(interview) => Some(Insertion::Created(interview)),
                    None if queries::query_interview(&tx, &owner, interview.id)?.is_some() => {
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

    pub async fn get_interview_by_id(
        &self,
        owner: &OwnerId,
        id: Uuid,
    ) -> RepoResult<InterviewDetails> {
        let owner = owner.clone();
        self.db
            .call(Operation::ReadInterviews, move |conn| {
                let tx = conn.transaction()?;
                let Some(interview) = queries::query_interview(&tx, &owner, id)? else {
                    return Ok(None);
                };
                let comments = queries::query_comments(&tx, id)?;
                tx.commit()?;

                Ok(Some(InterviewDetails {
                    interview,
                    comments,
                }))
            })
            .await?
            .ok_or(RepoError::NotFound)
    }

    /// `NotFound` when the interview is not reachable by the owner, or when
    /// the id is already taken by a comment the owner cannot reach.
    pub async fn add_comment(
        &self,
        owner: &OwnerId,
        comment: InterviewComment,
    ) -> RepoResult<Insertion<InterviewComment>> {
        let owner = owner.clone();
        self.db
            .call(Operation::InsertComment, move |conn| {
                let tx = conn.transaction()?;
                if queries::query_interview(&tx, &owner, comment.interview_id)?.is_none() {
                    return Ok(None);
                }

                let sql = format!(
                    "INSERT INTO interview_comments ({COMMENT_COLUMNS})
                     VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT DO NOTHING
                     RETURNING {COMMENT_COLUMNS}"
                );
                let inserted = tx
                    .query_row(
                        &sql,
                        params![
                            comment.id.to_string(),
                            comment.interview_id.to_string(),
                            comment.comment,
                            comment.pinned,
                        ],
                        comment_from_row,
                    )
                    .optional()?;

                let outcome = match inserted {
                    Some(comment) => Some(Insertion::Created(comment)),
                    None if queries::comment_exists(&tx, &owner, comment.id)? => {
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

    pub async fn delete_comment(
        &self,
        owner: &OwnerId,
        interview_id: Uuid,
        comment_id: Uuid,
    ) -> RepoResult<()> {
        let owner = owner.clone();
        let removed = self
            .db
            .call(Operation::DeleteComment, move |conn| {
                conn.execute(
                    "DELETE FROM interview_comments
                     WHERE id = ?1 AND interview_id = ?2
                       AND interview_id IN (
                           SELECT i.id FROM interviews i
                           JOIN applications a ON a.id = i.application_id
                           WHERE a.user_id = ?3
                       )",
                    params![comment_id.to_string(), interview_id.to_string(), owner.as_str()],
                )
            })
            .await?;

        if removed == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
