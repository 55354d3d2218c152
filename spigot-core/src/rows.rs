use crate::{Cursor, Error, Prepared, Result, RowMapper};
use std::marker::PhantomData;

/// A lazy, single-pass iterator of mapped rows over a live cursor.
///
/// Owns the backend statement and cursor that produced it; both are released
/// when the rows are exhausted, when [`Rows::close`] is called, or on drop,
/// whichever comes first. The sequence cannot be restarted or split: after
/// exhaustion or a fault, further calls to `next` return `None` without
/// touching the cursor again. The true row count is unknown before a full
/// scan, so `size_hint` stays unbounded.
///
/// Any fault raised while advancing or mapping is surfaced as the single
/// [`crate::ErrorKind::Advance`] kind wrapping the cause, so consumers of
/// the iterator never depend on the backend's native fault type.
pub struct Rows<R, P, M>
where
    P: Prepared,
    M: RowMapper<R>,
{
    statement: Option<P>,
    cursor: Option<P::Cursor>,
    mapper: M,
    done: bool,
    _result: PhantomData<fn() -> R>,
}

impl<R, P, M> Rows<R, P, M>
where
    P: Prepared,
    M: RowMapper<R>,
{
    pub(crate) fn new(statement: P, cursor: P::Cursor, mapper: M) -> Self {
        Self {
            statement: Some(statement),
            cursor: Some(cursor),
            mapper,
            done: false,
            _result: PhantomData,
        }
    }

    /// Releases the cursor, then the statement, best effort. Once the rows
    /// have been consumed a close-time fault carries no actionable
    /// information, so both failures are logged and swallowed; each release
    /// runs even if the other fails. Runs at most once, `Drop` calls it as
    /// a fallback.
    pub fn close(&mut self) {
        if let Some(mut cursor) = self.cursor.take() {
            if let Err(error) = cursor.close() {
                log::warn!("Failed to close the cursor of a lazy result: {}", error);
            }
        }
        if let Some(mut statement) = self.statement.take() {
            if let Err(error) = statement.close() {
                log::warn!("Failed to close the statement of a lazy result: {}", error);
            }
        }
    }
}

impl<R, P, M> std::fmt::Debug for Rows<R, P, M>
where
    P: Prepared,
    M: RowMapper<R>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rows")
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl<R, P, M> Iterator for Rows<R, P, M>
where
    P: Prepared,
    M: RowMapper<R>,
{
    type Item = Result<R>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let advanced = match self.cursor.as_mut() {
            Some(cursor) => cursor.advance(),
            None => {
                self.done = true;
                return None;
            }
        };
        let step = match advanced {
            Ok(true) => match self.cursor.as_ref() {
                Some(cursor) => self.mapper.map_row(cursor).map(Some),
                None => Ok(None),
            },
            Ok(false) => Ok(None),
            Err(error) => Err(error),
        };
        match step {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => {
                self.done = true;
                self.close();
                None
            }
            Err(error) => {
                self.done = true;
                self.close();
                Some(Err(Error::advance(error)))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, None)
    }
}

impl<R, P, M> Drop for Rows<R, P, M>
where
    P: Prepared,
    M: RowMapper<R>,
{
    fn drop(&mut self) {
        self.close();
    }
}
