//! Read queries shared by the repositories. Every function takes a plain
//! `&Connection` so callers can run several of them inside one transaction.

use std::collections::HashMap;

use rusqlite::{Connection, OptionalExtension, params};
use uuid::Uuid;

use seekr_types::models::{
    Application, ApplicationDetails, ApplicationListItem, Interview, InterviewComment, OwnerId,
};

use crate::models::{
    APPLICATION_COLUMNS, COMMENT_COLUMNS, INTERVIEW_COLUMNS, application_from_row,
    comment_from_row, interview_from_row, qualified,
};

/// Applications of `owner` with the number of interviews each one has,
/// newest application first.
pub fn query_application_list(
    conn: &Connection,
    owner: &OwnerId,
) -> rusqlite::Result<Vec<ApplicationListItem>> {
    // LEFT JOIN keeps applications without interviews; COUNT(i.id) skips the NULL row.
    let sql = format!(
        "SELECT {}, COUNT(i.id)
         FROM applications a
         LEFT JOIN interviews i ON i.application_id = a.id
         WHERE a.user_id = ?1
         GROUP BY a.id
         ORDER BY a.application_date DESC, a.id",
        qualified("a", APPLICATION_COLUMNS)
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([owner.as_str()], |row| {
            Ok(ApplicationListItem {
                application: application_from_row(row)?,
                interviews_count: row.get(8)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn query_application(
    conn: &Connection,
    owner: &OwnerId,
    id: Uuid,
) -> rusqlite::Result<Option<Application>> {
    let sql = format!("SELECT {APPLICATION_COLUMNS} FROM applications WHERE user_id = ?1 AND id = ?2");
    conn.query_row(
        &sql,
        params![owner.as_str(), id.to_string()],
        application_from_row,
    )
    .optional()
}

pub fn application_exists(conn: &Connection, owner: &OwnerId, id: Uuid) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM applications WHERE user_id = ?1 AND id = ?2)",
        params![owner.as_str(), id.to_string()],
        |row| row.get(0),
    )
}

/// Interviews of one application, earliest first. Ownership is not checked
/// here; callers resolve the application for the owner beforehand.
pub fn query_interviews_for_application(
    conn: &Connection,
    application_id: Uuid,
) -> rusqlite::Result<Vec<Interview>> {
    let sql = format!(
        "SELECT {INTERVIEW_COLUMNS} FROM interviews
         WHERE application_id = ?1
         ORDER BY interview_date, id"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([application_id.to_string()], interview_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Every application of `owner` with its interviews, oldest application
/// first. Two statements, grouped in memory, so the cost does not grow with
/// the number of applications.
pub fn query_application_history(
    conn: &Connection,
    owner: &OwnerId,
) -> rusqlite::Result<Vec<ApplicationDetails>> {
    let sql = format!(
        "SELECT {APPLICATION_COLUMNS} FROM applications
         WHERE user_id = ?1
         ORDER BY application_date, id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let applications = stmt
        .query_map([owner.as_str()], application_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let sql = format!(
        "SELECT {}
         FROM interviews i
         JOIN applications a ON a.id = i.application_id
         WHERE a.user_id = ?1
         ORDER BY i.interview_date, i.id",
        qualified("i", INTERVIEW_COLUMNS)
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut by_application: HashMap<Uuid, Vec<Interview>> = HashMap::new();
    for interview in stmt.query_map([owner.as_str()], interview_from_row)? {
        let interview = interview?;
        by_application
            .entry(interview.application_id)
            .or_default()
            .push(interview);
    }

    Ok(applications
        .into_iter()
        .map(|application| ApplicationDetails {
            interviews: by_application.remove(&application.id).unwrap_or_default(),
            application,
        })
        .collect())
}

/// An interview, provided its application belongs to `owner`.
pub fn query_interview(
    conn: &Connection,
    owner: &OwnerId,
    id: Uuid,
) -> rusqlite::Result<Option<Interview>> {
    let sql = format!(
        "SELECT {}
         FROM interviews i
         JOIN applications a ON a.id = i.application_id
         WHERE a.user_id = ?1 AND i.id = ?2",
        qualified("i", INTERVIEW_COLUMNS)
    );
    conn.query_row(&sql, params![owner.as_str(), id.to_string()], interview_from_row)
        .optional()
}

/// Whether comment `id` exists under an interview of `owner`.
pub fn comment_exists(conn: &Connection, owner: &OwnerId, id: Uuid) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS (
             SELECT 1 FROM interview_comments c
             JOIN interviews i ON i.id = c.interview_id
             JOIN applications a ON a.id = i.application_id
             WHERE a.user_id = ?1 AND c.id = ?2
         )",
        params![owner.as_str(), id.to_string()],
        |row| row.get(0),
    )
}

/// Comments of one interview in the order they were stored.
pub fn query_comments(
    conn: &Connection,
    interview_id: Uuid,
) -> rusqlite::Result<Vec<InterviewComment>> {
    let sql = format!(
        "SELECT {COMMENT_COLUMNS} FROM interview_comments
         WHERE interview_id = ?1
         ORDER BY rowid"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([interview_id.to_string()], comment_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
