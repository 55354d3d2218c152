use crate::{
    Binder, Bindings, Connection, Cursor, Error, NamedStatement, PrepareOptions, Prepared,
    Result, RowMapper, binder::scoped_cursor, error::chain_cleanup, printable_sql,
};

/// Collects independently bound parameter sets over one statement and
/// executes them as a single multi-row batch round trip.
///
/// All entries share the SQL text generated from the first entry, so every
/// entry must bind the same names with the same arities; list bindings of
/// differing lengths across entries make the placeholder count diverge from
/// the generated text and the results are undefined. This is a documented
/// caller contract, the batch does not detect it.
///
/// Batches are not thread-safe: build-up mutates an internal entry list and
/// must stay confined to one logical bind sequence.
#[derive(Debug)]
pub struct Batch<'q> {
    statement: &'q NamedStatement,
    entries: Vec<Bindings>,
    executed: bool,
}

impl<'q> Batch<'q> {
    pub fn new(statement: &'q NamedStatement) -> Self {
        Self {
            statement,
            entries: Vec::new(),
            executed: false,
        }
    }

    /// Opens a fresh, independently chainable bind sequence for one entry.
    pub fn start(&self) -> Binder<'q> {
        Binder::new(self.statement)
    }

    /// Validates `entry` is complete and strictly scoped to this batch's
    /// statement, then appends its bindings snapshot. Consumes the entry
    /// handle, so a finalized entry cannot be bound further.
    pub fn add(&mut self, entry: Binder<'q>) -> Result<&mut Self> {
        if self.executed {
            return Err(Error::state_conflict("batch has already been executed"));
        }
        if !std::ptr::eq(self.statement, entry.statement()) {
            return Err(Error::invalid_argument(
                "batch entry was built for a different statement",
            ));
        }
        self.statement.check_all_bindings_present(entry.bindings())?;
        self.statement.check_no_extra_bindings(entry.bindings())?;
        self.entries.push(entry.into_bindings());
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Executes all entries in one round trip, returning per-entry affected
    /// row counts. Fails fast on an empty batch.
    pub fn execute<C: Connection>(&mut self, session: &mut C) -> Result<Vec<u64>> {
        self.run(session, PrepareOptions::new(), |prepared| {
            prepared.execute_batch()
        })
    }

    /// Like [`Batch::execute`], additionally harvesting whatever generated
    /// keys the backend exposes after the batch, mapped through `mapper`.
    ///
    /// Key retrieval for batches is backend dependent: some return a key per
    /// entry, some only for the last entry, some none at all. The key list
    /// length is therefore advisory; only the counts are reliable.
    pub fn execute_returning<C, K>(
        &mut self,
        session: &mut C,
        mapper: impl RowMapper<K>,
    ) -> Result<(Vec<u64>, Vec<K>)>
    where
        C: Connection,
    {
        self.run(
            session,
            PrepareOptions::new().generated_keys(),
            |prepared| {
                let counts = prepared.execute_batch()?;
                let keys = scoped_cursor(prepared.generated_keys()?, |cursor| {
                    let mut keys = Vec::new();
                    while cursor.advance()? {
                        keys.push(mapper.map_row(&*cursor)?);
                    }
                    Ok(keys)
                })?;
                Ok((counts, keys))
            },
        )
    }

    fn run<C, T>(
        &mut self,
        session: &mut C,
        options: PrepareOptions,
        f: impl FnOnce(&mut C::Prepared) -> Result<T>,
    ) -> Result<T>
    where
        C: Connection,
    {
        if self.executed {
            return Err(Error::state_conflict("batch has already been executed"));
        }
        let Some(first) = self.entries.first() else {
            return Err(Error::state_conflict("cannot execute an empty batch"));
        };
        let sql = self.statement.sql(first)?;
        log::debug!(
            "Executing a batch of {}: {}",
            self.entries.len(),
            printable_sql(&sql)
        );
        let mut prepared = session.prepare(&sql, options)?;
        let mut result = (|| {
            for entry in &self.entries {
                self.statement.bind_to(&mut prepared, entry)?;
                prepared.add_batch()?;
            }
            f(&mut prepared)
        })();
        chain_cleanup(&mut result, prepared.close());
        self.executed = true;
        result
    }
}
