use spigot::{
    Connection, Cursor, Error, Isolation, ParamTarget, PrepareOptions, Prepared, Result, Value,
};
use std::{
    collections::{HashSet, VecDeque},
    sync::{Arc, Mutex, MutexGuard},
};

/// Operations of the fake session that can be armed to fail exactly once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailPoint {
    Prepare,
    Execute,
    ExecuteUpdate,
    ExecuteQuery,
    ExecuteBatch,
    GeneratedKeys,
    Advance,
    Commit,
    Rollback,
    SetAutoCommit,
    SetIsolation,
    CloseCursor,
    CloseStatement,
    CloseConnection,
}

/// One scripted result set served by [`FakeConnection`].
#[derive(Clone, Debug, Default)]
pub struct FakeRows {
    pub labels: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

struct State {
    events: Vec<String>,
    prepared: Vec<String>,
    writes: Vec<(u64, Value)>,
    scripted_rows: VecDeque<FakeRows>,
    scripted_keys: VecDeque<FakeRows>,
    update_counts: VecDeque<u64>,
    execute_results: VecDeque<bool>,
    fail_once: HashSet<FailPoint>,
    auto_commit: bool,
    isolation: Isolation,
    committed: Vec<String>,
    pending: Vec<String>,
    closed: bool,
}

impl State {
    fn new() -> Self {
        Self {
            events: Vec::new(),
            prepared: Vec::new(),
            writes: Vec::new(),
            scripted_rows: VecDeque::new(),
            scripted_keys: VecDeque::new(),
            update_counts: VecDeque::new(),
            execute_results: VecDeque::new(),
            fail_once: HashSet::new(),
            auto_commit: true,
            isolation: Isolation::ReadCommitted,
            committed: Vec::new(),
            pending: Vec::new(),
            closed: false,
        }
    }

    fn hit(&mut self, point: FailPoint) -> Result<()> {
        if self.fail_once.remove(&point) {
            return Err(Error::msg(format!("injected {:?} failure", point)));
        }
        Ok(())
    }

    fn journal(&mut self, sql: &str) {
        if self.auto_commit {
            self.committed.push(sql.to_owned());
        } else {
            self.pending.push(sql.to_owned());
        }
    }
}

/// An in-memory session capability for tests.
///
/// Records every prepared SQL text, every positional value write and a
/// coarse event log for ordering assertions. Query results and generated
/// keys are scripted through [`FakeConnection::push_rows`] /
/// [`FakeConnection::push_keys`]; any operation can be armed to fail once.
/// Updates are journalled into a pending list while autocommit is off and
/// only become visible in [`FakeConnection::committed`] after a commit,
/// which is enough to observe transaction atomicity from the outside.
///
/// Cloning yields another handle onto the same session state, so a test can
/// keep one handle for inspection while the other is consumed.
#[derive(Clone)]
pub struct FakeConnection {
    state: Arc<Mutex<State>>,
}

impl Default for FakeConnection {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeConnection {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::new())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("fake session state is poisoned")
    }

    /// Scripts the next query result set.
    pub fn push_rows(&self, labels: &[&str], rows: Vec<Vec<Value>>) {
        self.lock().scripted_rows.push_back(FakeRows {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            rows,
        });
    }

    /// Scripts the next generated-keys result set.
    pub fn push_keys(&self, labels: &[&str], rows: Vec<Vec<Value>>) {
        self.lock().scripted_keys.push_back(FakeRows {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            rows,
        });
    }

    /// Scripts the next update execute's affected row count.
    pub fn push_update_count(&self, count: u64) {
        self.lock().update_counts.push_back(count);
    }

    /// Scripts the next generic execute's produced-result-set flag.
    pub fn push_execute_result(&self, produced_rows: bool) {
        self.lock().execute_results.push_back(produced_rows);
    }

    /// Arms `point` to fail on its next use.
    pub fn fail_once(&self, point: FailPoint) {
        self.lock().fail_once.insert(point);
    }

    pub fn events(&self) -> Vec<String> {
        self.lock().events.clone()
    }

    pub fn prepared_sql(&self) -> Vec<String> {
        self.lock().prepared.clone()
    }

    /// All positional value writes in order, across statements.
    pub fn writes(&self) -> Vec<(u64, Value)> {
        self.lock().writes.clone()
    }

    pub fn clear_writes(&self) {
        self.lock().writes.clear();
    }

    /// Update SQL visible to a fresh read: journalled under autocommit or
    /// moved over by a commit.
    pub fn committed(&self) -> Vec<String> {
        self.lock().committed.clone()
    }

    /// Update SQL journalled inside a still-open transaction.
    pub fn pending(&self) -> Vec<String> {
        self.lock().pending.clone()
    }

    pub fn auto_commit_now(&self) -> bool {
        self.lock().auto_commit
    }

    pub fn isolation_now(&self) -> Isolation {
        self.lock().isolation
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }
}

impl Connection for FakeConnection {
    type Prepared = FakePrepared;

    fn prepare(&mut self, sql: &str, options: PrepareOptions) -> Result<FakePrepared> {
        let mut state = self.lock();
        state.events.push(format!("prepare:{}", sql));
        state.hit(FailPoint::Prepare)?;
        state.prepared.push(sql.to_owned());
        Ok(FakePrepared {
            state: self.state.clone(),
            sql: sql.to_owned(),
            options,
            queued: 0,
        })
    }

    fn auto_commit(&mut self) -> Result<bool> {
        Ok(self.lock().auto_commit)
    }

    fn set_auto_commit(&mut self, enabled: bool) -> Result<()> {
        let mut state = self.lock();
        state.events.push(format!("auto_commit:{}", enabled));
        state.hit(FailPoint::SetAutoCommit)?;
        state.auto_commit = enabled;
        Ok(())
    }

    fn isolation(&mut self) -> Result<Isolation> {
        Ok(self.lock().isolation)
    }

    fn set_isolation(&mut self, level: Isolation) -> Result<()> {
        let mut state = self.lock();
        state.events.push(format!("isolation:{}", level));
        state.hit(FailPoint::SetIsolation)?;
        state.isolation = level;
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        let mut state = self.lock();
        state.events.push("commit".to_owned());
        state.hit(FailPoint::Commit)?;
        let pending = std::mem::take(&mut state.pending);
        state.committed.extend(pending);
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        let mut state = self.lock();
        state.events.push("rollback".to_owned());
        state.hit(FailPoint::Rollback)?;
        state.pending.clear();
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let mut state = self.lock();
        state.events.push("close_connection".to_owned());
        state.hit(FailPoint::CloseConnection)?;
        state.closed = true;
        Ok(())
    }
}

/// Statement handle of [`FakeConnection`].
pub struct FakePrepared {
    state: Arc<Mutex<State>>,
    sql: String,
    options: PrepareOptions,
    queued: usize,
}

impl FakePrepared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("fake session state is poisoned")
    }

    fn looks_like_query(&self) -> bool {
        self.sql
            .trim_start()
            .get(..6)
            .is_some_and(|head| head.eq_ignore_ascii_case("select"))
    }
}

impl ParamTarget for FakePrepared {
    fn set_value(&mut self, position: u64, value: Value) -> Result<()> {
        self.lock().writes.push((position, value));
        Ok(())
    }
}

impl Prepared for FakePrepared {
    type Cursor = FakeCursor;

    fn execute(&mut self) -> Result<bool> {
        let mut state = self.lock();
        state.events.push(format!("execute:{}", self.sql));
        state.hit(FailPoint::Execute)?;
        if let Some(scripted) = state.execute_results.pop_front() {
            return Ok(scripted);
        }
        let is_query = self.looks_like_query();
        if !is_query {
            state.journal(&self.sql);
        }
        Ok(is_query)
    }

    fn execute_update(&mut self) -> Result<u64> {
        let mut state = self.lock();
        state.events.push(format!("update:{}", self.sql));
        state.hit(FailPoint::ExecuteUpdate)?;
        state.journal(&self.sql);
        Ok(state.update_counts.pop_front().unwrap_or(1))
    }

    fn execute_query(&mut self) -> Result<FakeCursor> {
        let mut state = self.lock();
        state.events.push(format!("query:{}", self.sql));
        state.hit(FailPoint::ExecuteQuery)?;
        let data = state.scripted_rows.pop_front().unwrap_or_default();
        Ok(FakeCursor {
            state: self.state.clone(),
            data,
            at: 0,
        })
    }

    fn add_batch(&mut self) -> Result<()> {
        self.queued += 1;
        self.lock().events.push("add_batch".to_owned());
        Ok(())
    }

    fn execute_batch(&mut self) -> Result<Vec<u64>> {
        let mut state = self.lock();
        state.events.push(format!("execute_batch:{}", self.queued));
        state.hit(FailPoint::ExecuteBatch)?;
        let counts = (0..self.queued)
            .map(|_| {
                state.journal(&self.sql);
                state.update_counts.pop_front().unwrap_or(1)
            })
            .collect();
        drop(state);
        self.queued = 0;
        Ok(counts)
    }

    fn generated_keys(&mut self) -> Result<FakeCursor> {
        let mut state = self.lock();
        state.events.push("generated_keys".to_owned());
        state.hit(FailPoint::GeneratedKeys)?;
        if !self.options.generated_keys {
            return Err(Error::msg(
                "statement was not prepared for generated key retrieval",
            ));
        }
        let data = state.scripted_keys.pop_front().unwrap_or_default();
        Ok(FakeCursor {
            state: self.state.clone(),
            data,
            at: 0,
        })
    }

    fn close(&mut self) -> Result<()> {
        let mut state = self.lock();
        state.events.push("close_statement".to_owned());
        state.hit(FailPoint::CloseStatement)
    }
}

/// Row cursor of [`FakeConnection`], positioned before the first row.
pub struct FakeCursor {
    state: Arc<Mutex<State>>,
    data: FakeRows,
    at: usize,
}

impl Cursor for FakeCursor {
    fn advance(&mut self) -> Result<bool> {
        self.state
            .lock()
            .expect("fake session state is poisoned")
            .hit(FailPoint::Advance)?;
        if self.at < self.data.rows.len() {
            self.at += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn labels(&self) -> &[String] {
        &self.data.labels
    }

    fn value(&self, index: usize) -> Result<Value> {
        let Some(row) = self.at.checked_sub(1).and_then(|at| self.data.rows.get(at)) else {
            return Err(Error::msg("cursor is not positioned on a row"));
        };
        row.get(index)
            .cloned()
            .ok_or_else(|| Error::msg(format!("no column at index {}", index)))
    }

    fn close(&mut self) -> Result<()> {
        let mut state = self.state.lock().expect("fake session state is poisoned");
        state.events.push("close_cursor".to_owned());
        state.hit(FailPoint::CloseCursor)
    }
}
