pub mod migrations;
pub mod queries;

use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

/// Stands in for the connection pool's connect timeout: how long a statement
/// waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(10);

/// Process-wide database handle. Opened once at startup, shared through
/// `AppState`, and closed explicitly when the server shuts down.
pub struct Database {
    conn: Mutex<Option<Connection>>,
}

impl Database {
    pub fn open(path: &str) -> anyhow::Result<Self> {
        let conn = init_db(path)?;
        Ok(Self {
            conn: Mutex::new(Some(conn)),
        })
    }

    /// Runs `f` against the shared connection.
    pub fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> anyhow::Result<T>,
    ) -> anyhow::Result<T> {
        let guard = self
            .conn
            .lock()
            .map_err(|_| anyhow::anyhow!("database lock poisoned"))?;
        let conn = guard.as_ref().context("database is closed")?;
        f(conn)
    }

    /// Closes the connection. Later calls to `with_conn` fail.
    pub fn close(&self) -> anyhow::Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| anyhow::anyhow!("database lock poisoned"))?
            .take();

        match conn {
            Some(conn) => {
                conn.close()
                    .map_err(|(_, e)| e)
                    .context("failed to close database")?;
                tracing::info!("database connection closed");
            }
            None => tracing::debug!("database already closed"),
        }
        Ok(())
    }
}

pub fn init_db(path: &str) -> anyhow::Result<Connection> {
    let conn = Connection::open(path).context("failed to open database")?;

    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
        .context("failed to set database pragmas")?;
    conn.busy_timeout(BUSY_TIMEOUT)
        .context("failed to set busy timeout")?;
    register_functions(&conn)?;

    migrations::run_migrations(&conn)?;

    Ok(conn)
}

/// Adds `casefold(text)`, a Unicode-aware lowercase. SQLite's own `lower()`
/// and `LIKE` only fold ASCII.
fn register_functions(conn: &Connection) -> anyhow::Result<()> {
    conn.create_scalar_function(
        "casefold",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value: Option<String> = ctx.get(0)?;
            Ok(value.map(|v| v.to_lowercase()))
        },
    )
    .context("failed to register casefold function")?;
    Ok(())
}

/// Extended SQLite result code of a constraint violation, if `err` is one.
pub fn violated_constraint(err: &anyhow::Error) -> Option<i32> {
    match err.downcast_ref::<rusqlite::Error>()? {
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation => {
            Some(e.extended_code)
        }
        _ => None,
    }
}

pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    violated_constraint(err) == Some(rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE)
}

pub fn is_foreign_key_violation(err: &anyhow::Error) -> bool {
    violated_constraint(err) == Some(rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY)
}
