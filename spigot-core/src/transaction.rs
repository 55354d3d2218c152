use crate::{Connection, Error, Isolation, Result, error::chain_cleanup};

/// Executes a unit of work inside one database transaction.
///
/// The wrapper itself is immutable configuration: [`Transaction::isolation`]
/// returns a copy carrying the override. One invocation of
/// [`Transaction::run`] walks autocommit-suspended → committed | rolled-back
/// → restored exactly once and holds no state across calls.
#[derive(Clone, Copy, Debug, Default)]
pub struct Transaction {
    isolation: Option<Isolation>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of this wrapper overriding the isolation level for the duration
    /// of the transaction; the prior level is restored afterwards.
    pub fn isolation(self, level: Isolation) -> Self {
        Self {
            isolation: Some(level),
        }
    }

    /// Acquires a connection from `connect`, runs `work` transactionally and
    /// closes the connection.
    ///
    /// Commit happens on success, rollback on failure. Autocommit and an
    /// overridden isolation level are restored on every path; faults raised
    /// by rollback, restoration or close are chained onto the primary fault
    /// as suppressed causes, never replacing it and never dropped.
    pub fn run<C, T>(
        &self,
        connect: impl FnOnce() -> Result<C>,
        work: impl FnOnce(&mut C) -> Result<T>,
    ) -> Result<T>
    where
        C: Connection,
    {
        let mut connection = connect()?;
        let mut result = self.run_on(&mut connection, work);
        chain_cleanup(&mut result, connection.close());
        result
    }

    /// Like [`Transaction::run`] on an already acquired connection; the
    /// connection is left open for the caller.
    pub fn run_on<C, T>(
        &self,
        connection: &mut C,
        work: impl FnOnce(&mut C) -> Result<T>,
    ) -> Result<T>
    where
        C: Connection,
    {
        if !connection.auto_commit()? {
            return Err(Error::state_conflict(
                "autocommit is already off: an open transaction would not roll back to this point",
            ));
        }
        let mut saved_isolation = None;
        let mut result = self.attempt(connection, &mut saved_isolation, work);
        chain_cleanup(&mut result, connection.set_auto_commit(true));
        if let Some(level) = saved_isolation {
            chain_cleanup(&mut result, connection.set_isolation(level));
        }
        result
    }

    fn attempt<C, T>(
        &self,
        connection: &mut C,
        saved_isolation: &mut Option<Isolation>,
        work: impl FnOnce(&mut C) -> Result<T>,
    ) -> Result<T>
    where
        C: Connection,
    {
        if let Some(level) = self.isolation {
            let prior = connection.isolation()?;
            connection.set_isolation(level)?;
            *saved_isolation = Some(prior);
        }
        connection.set_auto_commit(false)?;
        let value = match work(connection) {
            Ok(value) => value,
            Err(mut error) => {
                log::debug!("Rolling back after: {}", error);
                if let Err(e) = connection.rollback() {
                    error.suppress(e);
                }
                return Err(error);
            }
        };
        if let Err(mut error) = connection.commit() {
            if let Err(e) = connection.rollback() {
                error.suppress(e);
            }
            return Err(error);
        }
        Ok(value)
    }
}
