use crate::{
    Connection, Error, PrepareOptions, Prepared, Result, Token, error::chain_cleanup,
    printable_sql, tokenize,
};
use std::{mem, str::FromStr};

/// An ordered list of individually executable SQL statements, split from one
/// text blob on `;` delimiters with quotes and comments respected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Script {
    statements: Vec<String>,
}

impl Script {
    /// Tokenizes the whole blob and splits it on statement ends. The
    /// trailing text after the last `;` counts as a statement too; blank
    /// statements are dropped.
    pub fn parse(text: impl AsRef<str>) -> Result<Self> {
        let tokens = tokenize(text.as_ref())?;
        let mut statements = Vec::new();
        let mut buffer = String::new();
        for token in &tokens {
            match token {
                Token::StatementEnd => statements.push(mem::take(&mut buffer)),
                other => other.write(&mut buffer),
            }
        }
        statements.push(buffer);
        statements.retain(|statement| !statement.trim().is_empty());
        Ok(Self { statements })
    }

    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Prepares and executes each statement independently and in order,
    /// collecting whether each produced a result set. No shared transaction
    /// is implied by this alone; run it through a [`crate::Transaction`] if
    /// the script must be atomic.
    pub fn execute<C: Connection>(&self, session: &mut C) -> Result<Vec<bool>> {
        let mut outcomes = Vec::with_capacity(self.statements.len());
        for sql in &self.statements {
            log::debug!("Executing script statement: {}", printable_sql(sql));
            let mut prepared = session.prepare(sql, PrepareOptions::new())?;
            let mut result = prepared.execute();
            chain_cleanup(&mut result, prepared.close());
            outcomes.push(result?);
        }
        Ok(outcomes)
    }
}

impl FromStr for Script {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        Self::parse(text)
    }
}
