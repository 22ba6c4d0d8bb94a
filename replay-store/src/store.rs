use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use mcts_primitives::RwLock as OptimisticRwLock;
use rusqlite::{params, Connection};
use tracing::debug;

use crate::error::ReplayStoreError;
use crate::record::Record;
use crate::sampler::Sampler;

/// A SQLite-backed replay buffer with a double-buffered "recent records" cache for
/// sampling.
///
/// Grounded on ELF's `SharedRWBuffer`: inserts accumulate in a buffer behind a mutex and
/// are flushed as one batched write; a background-ish refresh (`refresh_recent`, driven
/// by the caller rather than a timer, same as the original's `table_read_recent`) swaps
/// a freshly-queried snapshot into whichever of the two buffers is not the one readers
/// currently see, guarded by [`OptimisticRwLock`] the same way `rw_lock_` guards
/// `curr_idx_` in the original.
pub struct ReplayStore {
    conn: Mutex<Connection>,
    table_name: String,
    insert_buffer: Mutex<Vec<Record>>,
    rw_lock: OptimisticRwLock,
    write_mutex: Mutex<()>,
    recent: Mutex<[Vec<Record>; 2]>,
    curr_idx: Mutex<usize>,
    verbose: bool,
}

impl ReplayStore {
    /// Opens (creating if necessary) a SQLite database at `path` with a table named
    /// `table_name`.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayStoreError::Sqlite`] if the database cannot be opened or the
    /// table cannot be created.
    pub fn open(path: impl AsRef<std::path::Path>, table_name: impl Into<String>) -> Result<Self, ReplayStoreError> {
        let conn = Connection::open(path)?;
        let table_name = table_name.into();
        let store = Self {
            conn: Mutex::new(conn),
            table_name,
            insert_buffer: Mutex::new(Vec::new()),
            rw_lock: OptimisticRwLock::new(),
            write_mutex: Mutex::new(()),
            recent: Mutex::new([Vec::new(), Vec::new()]),
            curr_idx: Mutex::new(0),
            verbose: false,
        };
        store.create_table_if_missing()?;
        Ok(store)
    }

    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn create_table_if_missing(&self) -> Result<(), ReplayStoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                TIME    INTEGER PRIMARY KEY NOT NULL,
                GAME_ID INTEGER NOT NULL,
                MACHINE TEXT    NOT NULL,
                SEQ     INTEGER NOT NULL,
                PRI     REAL    NOT NULL,
                REWARD  REAL    NOT NULL,
                CONTENT BLOB
            );
            CREATE INDEX IF NOT EXISTS idx_{table}_pri ON {table}(PRI);
            CREATE INDEX IF NOT EXISTS idx_{table}_reward ON {table}(REWARD);",
            table = self.table_name,
        ))?;
        Ok(())
    }

    /// Buffers `record` for insertion, stamping it with the current time if its
    /// `timestamp` is `0`. When `flush` is `true`, writes the whole buffer out as one
    /// batched, parameterized `INSERT` — mirroring `Insert(r, send_sql)` in the original.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayStoreError::Sqlite`] if the flush fails.
    pub fn insert(&self, mut record: Record, flush: bool) -> Result<(), ReplayStoreError> {
        if record.timestamp == 0 {
            record.timestamp = now_millis();
        }

        let mut buffer = self.insert_buffer.lock().unwrap();
        buffer.push(record);

        if flush {
            self.flush_locked(&mut buffer)?;
        }
        Ok(())
    }

    /// Flushes any buffered, unwritten records.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayStoreError::Sqlite`] if the write fails.
    pub fn flush(&self) -> Result<(), ReplayStoreError> {
        let mut buffer = self.insert_buffer.lock().unwrap();
        self.flush_locked(&mut buffer)
    }

    fn flush_locked(&self, buffer: &mut Vec<Record>) -> Result<(), ReplayStoreError> {
        if buffer.is_empty() {
            return Ok(());
        }

        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        {
            let sql = format!(
                "INSERT INTO {} (TIME, GAME_ID, MACHINE, SEQ, PRI, REWARD, CONTENT) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                self.table_name
            );
            let mut stmt = tx.prepare(&sql)?;
            for record in buffer.iter() {
                stmt.execute(params![
                    record.timestamp as i64,
                    record.game_id as i64,
                    record.machine,
                    record.seq,
                    f64::from(record.pri),
                    f64::from(record.reward),
                    record.content,
                ])?;
            }
        }
        tx.commit()?;

        if self.verbose {
            debug!(count = buffer.len(), table = %self.table_name, "flushed replay records");
        }
        buffer.clear();
        Ok(())
    }

    /// Re-queries the `max_num_records` most recent rows and swaps them into the buffer
    /// readers see next. Grounded on `table_read_recent` + `cb_save_start`/`cb_save`/
    /// `cb_save_end`: the query fills the buffer readers are *not* currently using, then
    /// a brief write lock flips which buffer is current.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayStoreError::Sqlite`] if the query fails.
    pub fn refresh_recent(&self, max_num_records: i64) -> Result<(), ReplayStoreError> {
        let _write_guard = self.write_mutex.lock().unwrap();

        let curr = *self.curr_idx.lock().unwrap();
        let alt = 1 - curr;

        let loaded = {
            let conn = self.conn.lock().unwrap();
            let sql = format!(
                "SELECT TIME, GAME_ID, MACHINE, SEQ, PRI, REWARD, CONTENT FROM {} ORDER BY TIME DESC LIMIT ?1",
                self.table_name
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![max_num_records], |row| {
                let timestamp: i64 = row.get(0)?;
                let game_id: i64 = row.get(1)?;
                let pri: f64 = row.get(4)?;
                let reward: f64 = row.get(5)?;
                Ok(Record {
                    timestamp: timestamp as u64,
                    game_id: game_id as u64,
                    machine: row.get(2)?,
                    seq: row.get(3)?,
                    pri: pri as f32,
                    reward: reward as f32,
                    content: row.get(6)?,
                })
            })?;
            rows.collect::<Result<Vec<_>, _>>()?
        };

        {
            let mut recent = self.recent.lock().unwrap();
            recent[alt] = loaded;
        }

        {
            let _guard = self.rw_lock.write_lock();
            *self.curr_idx.lock().unwrap() = alt;
        }

        if self.verbose {
            debug!(table = %self.table_name, "recent buffer refreshed");
        }
        Ok(())
    }

    pub(crate) fn read_recent<R>(&self, f: impl FnOnce(&[Record]) -> R) -> R {
        self.rw_lock.read_shared_lock();
        let result = {
            let idx = *self.curr_idx.lock().unwrap();
            let recent = self.recent.lock().unwrap();
            f(&recent[idx])
        };
        self.rw_lock.read_shared_unlock();
        result
    }

    #[must_use]
    pub fn sampler(&self) -> Sampler<'_> {
        Sampler::new(self)
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock should postdate the Unix epoch")
        .as_millis() as u64
}
