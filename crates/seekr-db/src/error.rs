use std::fmt;

use thiserror::Error;

/// The storage operation a failure belongs to. Its `Display` is the prefix
/// of every failure message the repositories hand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ReadApplications,
    UpdateApplication,
    InsertApplication,
    DeleteApplications,
    ReadInterviews,
    InsertInterview,
    InsertComment,
    DeleteComment,
}

impl Operation {
    pub fn intent(self) -> &'static str {
        match self {
            Self::ReadApplications => "Failed to read from the applications table",
            Self::UpdateApplication => "Failed to update the application",
            Self::InsertApplication => "Failed to insert into the applications table",
            Self::DeleteApplications => "Failed to delete user applications",
            Self::ReadInterviews => "Failed to read from the interviews table",
            Self::InsertInterview => "Failed to insert into the interviews table",
            Self::InsertComment => "Failed to insert into the interview comments table",
            Self::DeleteComment => "Failed to delete the interview comment",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.intent())
    }
}

/// Failure of a repository call.
///
/// `NotFound` covers both "no such row" and "row owned by someone else";
/// the two are never distinguished.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found")]
    NotFound,

    #[error("{op}: {message}")]
    Storage { op: Operation, message: String },

    #[error("{op}: unknown error")]
    Unknown { op: Operation },
}

impl RepoError {
    pub fn storage(op: Operation, err: rusqlite::Error) -> Self {
        Self::Storage {
            op,
            message: err.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

pub type RepoResult<T> = Result<T, RepoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_operation_intent() {
        let err = RepoError::storage(
            Operation::ReadApplications,
            rusqlite::Error::QueryReturnedNoRows,
        );
        assert!(
            err.to_string()
                .starts_with("Failed to read from the applications table: ")
        );

        let err = RepoError::Unknown {
            op: Operation::UpdateApplication,
        };
        assert_eq!(err.to_string(), "Failed to update the application: unknown error");
        assert_eq!(RepoError::NotFound.to_string(), "Not found");
    }
}
