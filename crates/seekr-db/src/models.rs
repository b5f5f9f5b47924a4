//! Row mapping between SQLite rows and the `seekr-types` records.
//!
//! Each `*_COLUMNS` list is the column order its `*_from_row` function
//! expects, so statements that select or return a record splice the list in
//! rather than spelling the columns out again.

use rusqlite::Row;
use rusqlite::types::Type;
use uuid::Uuid;

use seekr_types::models::{Application, ApplicationStatus, Interview, InterviewComment, OwnerId};

pub const APPLICATION_COLUMNS: &str = "id, user_id, company, position, application_date, status, job_description, job_posting_url";

pub const INTERVIEW_COLUMNS: &str =
    "id, application_id, interview_date, topic, participants, prep_notes";

pub const COMMENT_COLUMNS: &str = "id, interview_id, comment, pinned";

/// Prefixes every column of `columns` with `alias.` for use in joins.
pub fn qualified(alias: &str, columns: &str) -> String {
    columns
        .split(", ")
        .map(|column| format!("{alias}.{column}"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn application_from_row(row: &Row) -> rusqlite::Result<Application> {
    Ok(Application {
        id: uuid_at(row, 0)?,
        user_id: OwnerId::new(row.get::<_, String>(1)?),
        company: row.get(2)?,
        position: row.get(3)?,
        application_date: row.get(4)?,
        status: status_at(row, 5)?,
        job_description: row.get(6)?,
        job_posting_url: row.get(7)?,
    })
}

pub fn interview_from_row(row: &Row) -> rusqlite::Result<Interview> {
    Ok(Interview {
        id: uuid_at(row, 0)?,
        application_id: uuid_at(row, 1)?,
        interview_date: row.get(2)?,
        topic: row.get(3)?,
        participants: row.get(4)?,
        prep_notes: row.get(5)?,
    })
}

pub fn comment_from_row(row: &Row) -> rusqlite::Result<InterviewComment> {
    Ok(InterviewComment {
        id: uuid_at(row, 0)?,
        interview_id: uuid_at(row, 1)?,
        comment: row.get(2)?,
        pinned: row.get(3)?,
    })
}

fn uuid_at(row: &Row, idx: usize) -> rusqlite::Result<Uuid> {
    let text: String = row.get(idx)?;
    text.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn status_at(row: &Row, idx: usize) -> rusqlite::Result<ApplicationStatus> {
    let text: String = row.get(idx)?;
    text.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_prefixes_each_column() {
        assert_eq!(
            qualified("c", COMMENT_COLUMNS),
            "c.id, c.interview_id, c.comment, c.pinned"
        );
    }
}
