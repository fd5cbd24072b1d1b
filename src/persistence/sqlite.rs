use super::file::RosterSnapshot;
use super::{PersistenceResult, RosterStore};
use crate::Roster;
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::Mutex;

/// Single-row state store: the whole roster is serialized as JSON under a
/// fixed state identifier.
pub struct SqliteRosterStore {
    connection: Mutex<Connection>,
}

const STATE_ID: i64 = 1;

impl SqliteRosterStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS roster_state (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                state_json TEXT NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }
}

impl RosterStore for SqliteRosterStore {
    fn save_roster(&self, roster: &Roster) -> PersistenceResult<()> {
        let snapshot = RosterSnapshot::from_roster(roster)?;
        let json = serde_json::to_string(&snapshot)?;

        let mut conn = self.connection.lock().expect("sqlite mutex poisoned");
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM roster_state", [])?;
        tx.execute(
            "INSERT INTO roster_state (id, state_json) VALUES (?1, ?2)",
            params![STATE_ID, json],
        )?;
        tx.commit()?;
        log::debug!("saved roster state ({} bytes)", json.len());
        Ok(())
    }

    fn load_roster(&self) -> PersistenceResult<Option<Roster>> {
        let conn = self.connection.lock().expect("sqlite mutex poisoned");

        let mut stmt = conn.prepare("SELECT state_json FROM roster_state WHERE id = ?1")?;
        let json_opt: Option<String> = stmt
            .query_row(params![STATE_ID], |row| row.get(0))
            .optional()?;

        let Some(json) = json_opt else {
            return Ok(None);
        };

        let snapshot: RosterSnapshot = serde_json::from_str(&json)?;
        Ok(Some(snapshot.into_roster()?))
    }
}
