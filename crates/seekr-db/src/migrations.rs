use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE applications (
                id                  TEXT PRIMARY KEY,
                user_id             TEXT NOT NULL,
                company             TEXT NOT NULL,
                position            TEXT NOT NULL,
                application_date    TEXT NOT NULL,
                status              TEXT NOT NULL DEFAULT 'applied'
                    CHECK (status IN ('applied', 'interviewing', 'offer', 'rejected')),
                job_description     TEXT NOT NULL DEFAULT '',
                job_posting_url     TEXT NOT NULL DEFAULT ''
            );

            CREATE INDEX idx_applications_user
                ON applications(user_id, application_date);

            CREATE TABLE interviews (
                id              TEXT PRIMARY KEY,
                application_id  TEXT NOT NULL REFERENCES applications(id) ON DELETE CASCADE,
                interview_date  TEXT NOT NULL,
                topic           TEXT NOT NULL,
                participants    TEXT NOT NULL DEFAULT '',
                prep_notes      TEXT NOT NULL DEFAULT ''
            );

            CREATE INDEX idx_interviews_application
                ON interviews(application_id, interview_date);

            CREATE TABLE interview_comments (
                id              TEXT PRIMARY KEY,
                interview_id    TEXT NOT NULL REFERENCES interviews(id) ON DELETE CASCADE,
                comment         TEXT NOT NULL,
                pinned          INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX idx_comments_interview
                ON interview_comments(interview_id);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
