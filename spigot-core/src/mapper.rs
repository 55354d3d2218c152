use crate::{AsValue, Cursor, Error, Result, Value};
use std::marker::PhantomData;
use std::sync::Arc;

/// Caller-supplied capability converting the current row of a live cursor
/// into a value of type `R`.
///
/// Closures of shape `Fn(&dyn Cursor) -> Result<R>` implement this directly:
///
/// ```rust,ignore
/// let names = binder.fetch_all(&mut session, |row: &dyn Cursor| row.get::<String>(0))?;
/// ```
pub trait RowMapper<R> {
    /// Map the row the cursor is currently positioned on. The mapper must
    /// not advance or close the cursor.
    fn map_row(&self, row: &dyn Cursor) -> Result<R>;

    /// Composes this mapper with a post-processing function.
    fn remap<T, F>(self, f: F) -> Remapped<Self, F, R>
    where
        Self: Sized,
        F: Fn(R) -> T,
    {
        Remapped {
            mapper: self,
            f,
            _result: PhantomData,
        }
    }
}

impl<R, F> RowMapper<R> for F
where
    F: Fn(&dyn Cursor) -> Result<R>,
{
    fn map_row(&self, row: &dyn Cursor) -> Result<R> {
        self(row)
    }
}

/// A [`RowMapper`] composed with a post-processing function, see
/// [`RowMapper::remap`].
pub struct Remapped<M, F, R> {
    mapper: M,
    f: F,
    _result: PhantomData<fn() -> R>,
}

impl<R, T, M, F> RowMapper<T> for Remapped<M, F, R>
where
    M: RowMapper<R>,
    F: Fn(R) -> T,
{
    fn map_row(&self, row: &dyn Cursor) -> Result<T> {
        self.mapper.map_row(row).map(&self.f)
    }
}

/// A materialized row with its column labels, for callers that do not map
/// into a custom type.
#[derive(Clone, Debug)]
pub struct LabeledRow {
    /// Column names, reference counted so rows stay cheap to clone.
    pub labels: Arc<[String]>,
    /// Column values, aligned by index with `labels`.
    pub values: Box<[Value]>,
}

impl LabeledRow {
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn column(&self, label: &str) -> Option<&Value> {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|at| &self.values[at])
    }

    /// Decode the column named `label` into a native type.
    pub fn get<T: AsValue>(&self, label: &str) -> Result<T> {
        let Some(value) = self.column(label) else {
            return Err(Error::invalid_argument(format!(
                "no column labeled `{}`",
                label
            )));
        };
        T::try_from_value(value.clone())
    }
}

/// A ready-made [`RowMapper`] that materializes every row as a
/// [`LabeledRow`].
pub fn labeled_row() -> impl RowMapper<LabeledRow> {
    |row: &dyn Cursor| {
        let labels: Arc<[String]> = row.labels().into();
        let values = (0..labels.len())
            .map(|at| row.value(at))
            .collect::<Result<Box<[_]>>>()?;
        Ok(LabeledRow { labels, values })
    }
}
