use super::{ExportResult, ProcurementRecord, ScheduleExport, ScheduleStore};
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::Mutex;

/// Stores the latest exported schedule and procurement timeline.
pub struct SqliteScheduleStore {
    connection: Mutex<Connection>,
}

impl SqliteScheduleStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> ExportResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub fn in_memory() -> ExportResult<Self> {
        let connection = Connection::open_in_memory()?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> ExportResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS schedule_header (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                header_json TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY,
                task_json TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS procurement (
                position INTEGER PRIMARY KEY,
                material_name TEXT NOT NULL,
                record_json TEXT NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.connection
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ScheduleStore for SqliteScheduleStore {
    fn save_schedule(&self, export: &ScheduleExport) -> ExportResult<()> {
        let mut header = export.clone();
        let tasks = std::mem::take(&mut header.tasks);
        let header_json = serde_json::to_string(&header)?;

        let mut conn = self.connection();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM schedule_header", [])?;
        tx.execute(
            "INSERT INTO schedule_header (id, header_json) VALUES (1, ?1)",
            params![header_json],
        )?;
        tx.execute("DELETE FROM tasks", [])?;
        {
            let mut stmt = tx.prepare("INSERT INTO tasks (id, task_json) VALUES (?1, ?2)")?;
            for task in &tasks {
                stmt.execute(params![task.id, serde_json::to_string(task)?])?;
            }
        }
        tx.commit()?;
        tracing::debug!(tasks = tasks.len(), "schedule snapshot stored");
        Ok(())
    }

    fn load_schedule(&self) -> ExportResult<Option<ScheduleExport>> {
        let conn = self.connection();

        let mut stmt = conn.prepare("SELECT header_json FROM schedule_header WHERE id = 1")?;
        let header_json: Option<String> = stmt.query_row([], |row| row.get(0)).optional()?;
        let Some(header_json) = header_json else {
            return Ok(None);
        };
        let mut export: ScheduleExport = serde_json::from_str(&header_json)?;

        let mut stmt = conn.prepare("SELECT task_json FROM tasks ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        for json in rows {
            export.tasks.push(serde_json::from_str(&json?)?);
        }
        Ok(Some(export))
    }

    fn save_procurement(&self, records: &[ProcurementRecord]) -> ExportResult<()> {
        let mut conn = self.connection();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM procurement", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO procurement (position, material_name, record_json) VALUES (?1, ?2, ?3)",
            )?;
            for (position, record) in records.iter().enumerate() {
                stmt.execute(params![
                    position as i64,
                    record.material_name,
                    serde_json::to_string(record)?
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn load_procurement(&self) -> ExportResult<Vec<ProcurementRecord>> {
        let conn = self.connection();
        let mut stmt = conn.prepare("SELECT record_json FROM procurement ORDER BY position ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut records = Vec::new();
        for json in rows {
            records.push(serde_json::from_str(&json?)?);
        }
        Ok(records)
    }
}
