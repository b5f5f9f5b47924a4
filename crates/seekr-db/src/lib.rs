pub mod applications;
pub mod error;
pub mod interviews;
pub mod migrations;
pub mod models;
pub mod queries;

pub use applications::{ApplicationsRepository, DeleteSelector};
pub use error::{Operation, RepoError, RepoResult};
pub use interviews::InterviewsRepository;

use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Outcome of an insert-or-ignore write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion<T> {
    Created(T),
    /// The key was already taken; nothing was written.
    AlreadyExists,
}

/// Shared handle to the SQLite store. Cloning is cheap; all clones use the
/// same connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;

        let db = Self::init(conn)?;
        info!("Database opened at {}", path.display());
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        // Cascading deletes depend on this.
        conn.pragma_update(None, "foreign_keys", "ON")?;

        migrations::run(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Synchronous access for setup and maintenance code.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))?;
        f(&conn)
    }

    /// Runs `f` on the blocking pool and waits for it. Driver errors are tagged
    /// with `op`; a poisoned lock or a panicking closure becomes
    /// [`RepoError::Unknown`].
    pub async fn call<F, T>(&self, op: Operation, f: F) -> RepoResult<T>
    where
        F: FnOnce(&mut Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let joined = tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|_| RepoError::Unknown { op })?;
            f(&mut guard).map_err(|e| RepoError::storage(op, e))
        })
        .await;

        let result = match joined {
            Ok(result) => result,
            Err(e) => {
                warn!("{}: blocking task failed: {}", op, e);
                Err(RepoError::Unknown { op })
            }
        };

        if let Err(e) = &result {
            warn!("{}", e);
        }
        result
    }
}
