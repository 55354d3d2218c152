use crate::{AsValue, Result, Value};
use std::fmt::{self, Display, Formatter};

/// Options passed to [`Connection::prepare`].
///
/// Query-shaped executions prepare read-only / forward-only; the
/// insert-returning-keys shape asks the backend to expose generated keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PrepareOptions {
    /// Request access to backend-generated keys after an update execute.
    pub generated_keys: bool,
    /// Hint that the statement will only be read from, forward-only.
    pub read_only: bool,
}

impl PrepareOptions {
    pub const fn new() -> Self {
        Self {
            generated_keys: false,
            read_only: false,
        }
    }

    pub const fn generated_keys(mut self) -> Self {
        self.generated_keys = true;
        self
    }

    pub const fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}

/// Standard transaction isolation levels.
///
/// Being an enum, an invalid isolation constant is unrepresentable; the
/// validation the original JDBC-style surface performed at construction time
/// is done here by the type system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Isolation {
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl Display for Isolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Isolation::ReadUncommitted => "READ UNCOMMITTED",
            Isolation::ReadCommitted => "READ COMMITTED",
            Isolation::RepeatableRead => "REPEATABLE READ",
            Isolation::Serializable => "SERIALIZABLE",
        })
    }
}

/// The object-safe parameter-writing subset of [`Prepared`].
///
/// Positions are 1-based: the first `?` in the generated SQL is position 1.
pub trait ParamTarget {
    /// Write `value` as the parameter at `position`.
    fn set_value(&mut self, position: u64, value: Value) -> Result<()>;
}

/// A backend-prepared statement handle.
///
/// This is the consumed capability spigot executes through; the crate never
/// issues named parameters to it, full substitution into positional `?`
/// placeholders happens before [`Connection::prepare`].
///
/// `close` is explicit rather than Drop-only so close-time faults can be
/// aggregated onto a primary fault; implementations should still release in
/// Drop as a fallback.
pub trait Prepared: ParamTarget {
    type Cursor: Cursor;

    /// Generic execute; returns whether a result set was produced.
    fn execute(&mut self) -> Result<bool>;
    /// Update-style execute; returns the affected row count.
    fn execute_update(&mut self) -> Result<u64>;
    /// Query-style execute; returns the row cursor.
    fn execute_query(&mut self) -> Result<Self::Cursor>;
    /// Queue the currently bound parameter set as one batch item.
    fn add_batch(&mut self) -> Result<()>;
    /// Execute all queued batch items in one round trip; returns the
    /// per-item affected row counts.
    fn execute_batch(&mut self) -> Result<Vec<u64>>;
    /// Cursor over the keys generated by the latest update execute.
    /// Requires [`PrepareOptions::generated_keys`].
    fn generated_keys(&mut self) -> Result<Self::Cursor>;
    /// Release the statement.
    fn close(&mut self) -> Result<()>;
}

/// A pull-based row cursor positioned before the first row.
pub trait Cursor {
    /// Advance to the next row; false once the rows are exhausted.
    fn advance(&mut self) -> Result<bool>;
    /// Column labels, aligned by index with [`Cursor::value`].
    fn labels(&self) -> &[String];
    /// Value of the column at 0-based `index` in the current row.
    fn value(&self, index: usize) -> Result<Value>;
    /// Value of the column named `label` in the current row.
    fn value_by_label(&self, label: &str) -> Result<Value> {
        match self.labels().iter().position(|l| l == label) {
            Some(index) => self.value(index),
            None => Err(crate::Error::invalid_argument(format!(
                "no column labeled `{}`",
                label
            ))),
        }
    }
    /// Release the cursor.
    fn close(&mut self) -> Result<()>;
}

/// Typed column getters layered over [`Cursor::value`]. NULL-ness travels
/// inside [`Value`], so decoding into a non-`Option` type fails on NULL.
pub trait CursorExt: Cursor {
    fn get<T: AsValue>(&self, index: usize) -> Result<T> {
        T::try_from_value(self.value(index)?)
    }

    fn get_by_label<T: AsValue>(&self, label: &str) -> Result<T> {
        T::try_from_value(self.value_by_label(label)?)
    }
}

impl<C: Cursor + ?Sized> CursorExt for C {}

/// A database connection capability.
///
/// This is the sole boundary between spigot and the backing database: spigot
/// hands over standard positional-placeholder SQL text and otherwise only
/// drives the autocommit / isolation / commit / rollback surface from the
/// transaction wrapper. Timeouts, retries and fault classification are the
/// backend's business and pass through untouched.
pub trait Connection {
    type Prepared: Prepared;

    fn prepare(&mut self, sql: &str, options: PrepareOptions) -> Result<Self::Prepared>;
    fn auto_commit(&mut self) -> Result<bool>;
    fn set_auto_commit(&mut self, enabled: bool) -> Result<()>;
    fn isolation(&mut self) -> Result<Isolation>;
    fn set_isolation(&mut self, level: Isolation) -> Result<()>;
    fn commit(&mut self) -> Result<()>;
    fn rollback(&mut self) -> Result<()>;
    fn close(&mut self) -> Result<()>;
}
