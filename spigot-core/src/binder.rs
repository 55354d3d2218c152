use crate::{
    AsValue, Binding, Bindings, Connection, Cursor, Error, NamedStatement, ParamTarget,
    PrepareOptions, Prepared, Result, RowMapper, Rows, error::chain_cleanup, printable_sql,
};

/// Runs `f` against an open cursor, closing it on every exit path; a
/// close-time fault is chained onto the primary fault or becomes primary.
pub(crate) fn scoped_cursor<Cur: Cursor, T>(
    mut cursor: Cur,
    f: impl FnOnce(&mut Cur) -> Result<T>,
) -> Result<T> {
    let mut result = f(&mut cursor);
    chain_cleanup(&mut result, cursor.close());
    result
}

/// An immutable builder pairing a parsed statement with an accumulated set
/// of bindings.
///
/// Every bind call validates the name against the statement and returns a
/// new binder, leaving the receiver reusable; several complete variants can
/// fan out from one partially bound prototype. Terminal methods check
/// completeness first, prepare one backend statement scoped to the call and
/// guarantee its closure on every exit path.
#[derive(Clone, Debug)]
pub struct Binder<'q> {
    statement: &'q NamedStatement,
    bindings: Bindings,
}

impl<'q> Binder<'q> {
    pub fn new(statement: &'q NamedStatement) -> Self {
        Self {
            statement,
            bindings: Bindings::new(),
        }
    }

    pub fn statement(&self) -> &'q NamedStatement {
        self.statement
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub(crate) fn into_bindings(self) -> Bindings {
        self.bindings
    }

    fn check_parameter(&self, name: &str) -> Result<()> {
        if !self.statement.contains_parameter(name)? {
            return Err(Error::invalid_argument(format!(
                "statement has no parameter :{}",
                name
            )));
        }
        Ok(())
    }

    fn with_bindings(&self, bindings: Bindings) -> Self {
        Self {
            statement: self.statement,
            bindings,
        }
    }

    /// New binder with `name` bound to `value`. `Option::None` binds the
    /// typed SQL NULL of the value type.
    pub fn bind(&self, name: &str, value: impl AsValue) -> Result<Self> {
        self.bind_with(name, Binding::value(value))
    }

    /// New binder with `name` bound to an untyped SQL NULL.
    pub fn bind_null(&self, name: &str) -> Result<Self> {
        self.bind_with(name, Binding::null())
    }

    /// New binder with `name` bound through an arbitrary setter capability.
    pub fn bind_with(&self, name: &str, binding: Binding) -> Result<Self> {
        self.check_parameter(name)?;
        Ok(self.with_bindings(self.bindings.value_binding(name, binding)?))
    }

    /// New binder with `name` bound to a list, expanded to one placeholder
    /// per element for `IN (...)` style use. An empty list expands to `()`.
    pub fn bind_list<V: AsValue>(
        &self,
        name: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self> {
        self.bind_list_with(name, values.into_iter().map(Binding::value).collect())
    }

    /// List variant of [`Binder::bind_with`].
    pub fn bind_list_with(&self, name: &str, bindings: Vec<Binding>) -> Result<Self> {
        self.check_parameter(name)?;
        Ok(self.with_bindings(self.bindings.list_binding(name, bindings)?))
    }

    pub fn check_all_bindings_present(&self) -> Result<()> {
        self.statement.check_all_bindings_present(&self.bindings)
    }

    /// The positional-placeholder SQL the terminal methods will prepare.
    pub fn sql(&self) -> Result<String> {
        self.statement.sql(&self.bindings)
    }

    /// Writes the accumulated values into a live prepared statement.
    pub fn bind_to(&self, target: &mut dyn ParamTarget) -> Result<()> {
        self.statement.bind_to(target, &self.bindings)
    }

    fn with_prepared<C, T>(
        &self,
        session: &mut C,
        options: PrepareOptions,
        f: impl FnOnce(&mut C::Prepared) -> Result<T>,
    ) -> Result<T>
    where
        C: Connection,
    {
        self.check_all_bindings_present()?;
        let sql = self.sql()?;
        log::debug!("Executing: {}", printable_sql(&sql));
        let mut prepared = session.prepare(&sql, options)?;
        let mut result = self
            .bind_to(&mut prepared)
            .and_then(|_| f(&mut prepared));
        chain_cleanup(&mut result, prepared.close());
        result
    }

    /// Generic execute: returns whether a result set was produced.
    pub fn run<C: Connection>(&self, session: &mut C) -> Result<bool> {
        self.with_prepared(session, PrepareOptions::new(), |prepared| prepared.execute())
    }

    /// Update execute: returns the affected row count.
    pub fn execute<C: Connection>(&self, session: &mut C) -> Result<u64> {
        self.with_prepared(session, PrepareOptions::new(), |prepared| {
            prepared.execute_update()
        })
    }

    /// Update execute harvesting backend-generated keys through `mapper`
    /// into an ordered list. The keys cursor is closed before returning,
    /// mapper failure included.
    pub fn insert<C, K>(&self, session: &mut C, mapper: impl RowMapper<K>) -> Result<Vec<K>>
    where
        C: Connection,
    {
        self.with_prepared(
            session,
            PrepareOptions::new().generated_keys(),
            |prepared| {
                prepared.execute_update()?;
                scoped_cursor(prepared.generated_keys()?, |cursor| {
                    let mut keys = Vec::new();
                    while cursor.advance()? {
                        keys.push(mapper.map_row(&*cursor)?);
                    }
                    Ok(keys)
                })
            },
        )
    }

    /// Query execute mapping the first row, if any; additional rows are
    /// left unread.
    pub fn fetch_first<C, R>(
        &self,
        session: &mut C,
        mapper: impl RowMapper<R>,
    ) -> Result<Option<R>>
    where
        C: Connection,
    {
        self.with_prepared(session, PrepareOptions::new().read_only(), |prepared| {
            scoped_cursor(prepared.execute_query()?, |cursor| {
                if cursor.advance()? {
                    mapper.map_row(&*cursor).map(Some)
                } else {
                    Ok(None)
                }
            })
        })
    }

    /// Query execute mapping every row into an ordered list.
    pub fn fetch_all<C, R>(&self, session: &mut C, mapper: impl RowMapper<R>) -> Result<Vec<R>>
    where
        C: Connection,
    {
        self.with_prepared(session, PrepareOptions::new().read_only(), |prepared| {
            scoped_cursor(prepared.execute_query()?, |cursor| {
                let mut rows = Vec::new();
                while cursor.advance()? {
                    rows.push(mapper.map_row(&*cursor)?);
                }
                Ok(rows)
            })
        })
    }

    /// Query execute handing the raw cursor to a side-effecting procedure;
    /// no result is synthesized.
    pub fn with_cursor<C: Connection>(
        &self,
        session: &mut C,
        f: impl FnOnce(&mut dyn Cursor) -> Result<()>,
    ) -> Result<()> {
        self.with_prepared(session, PrepareOptions::new().read_only(), |prepared| {
            scoped_cursor(prepared.execute_query()?, |cursor| f(cursor))
        })
    }

    /// Query execute returning a lazy, single-pass iterator of mapped rows.
    ///
    /// Unlike the other shapes, the prepared statement and cursor outlive
    /// this call: the returned [`Rows`] owns both and releases them on
    /// exhaustion, on [`Rows::close`] or on drop.
    pub fn fetch_lazy<C, R, M>(&self, session: &mut C, mapper: M) -> Result<Rows<R, C::Prepared, M>>
    where
        C: Connection,
        M: RowMapper<R>,
    {
        self.check_all_bindings_present()?;
        let sql = self.sql()?;
        log::debug!("Executing: {}", printable_sql(&sql));
        let mut prepared = session.prepare(&sql, PrepareOptions::new().read_only())?;
        let result = self
            .bind_to(&mut prepared)
            .and_then(|_| prepared.execute_query());
        match result {
            Ok(cursor) => Ok(Rows::new(prepared, cursor, mapper)),
            Err(mut error) => {
                if let Err(e) = prepared.close() {
                    error.suppress(e);
                }
                Err(error)
            }
        }
    }
}
