use crate::{
    Batch, Binder, Bindings, Error, ParamTarget, Result, Token, separated_by, tokenize,
};
use std::collections::BTreeSet;

/// A SQL statement with named `:parameter` placeholders, parsed once.
///
/// Construction tokenizes the text eagerly and records the distinct
/// parameter names plus the ordered list of occurrences. The occurrence
/// order is the positional order: the Nth `?` of the generated SQL receives
/// the Nth value write, regardless of the order the caller bound names in.
///
/// Instances are immutable and safe to share across threads; many concurrent
/// executions can reuse one parsed statement, each with its own [`Bindings`].
#[derive(Clone, Debug)]
pub struct NamedStatement {
    sql: String,
    tokens: Vec<Token>,
    names: BTreeSet<String>,
    occurrences: Vec<String>,
}

impl NamedStatement {
    /// Parses `sql`. Fails only if the text cannot be tokenized
    /// (unterminated quote or block comment).
    pub fn parse(sql: impl Into<String>) -> Result<Self> {
        let sql = sql.into();
        let tokens = tokenize(&sql)?;
        let mut names = BTreeSet::new();
        let mut occurrences = Vec::new();
        for token in &tokens {
            if let Token::NamedParam(name) = token {
                names.insert(name.clone());
                occurrences.push(name.clone());
            }
        }
        Ok(Self {
            sql,
            tokens,
            names,
            occurrences,
        })
    }

    /// The original SQL text, named placeholders included.
    pub fn source(&self) -> &str {
        &self.sql
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Distinct parameter names, order irrelevant.
    pub fn parameters(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Parameter occurrences in positional order; a name repeats once per
    /// occurrence.
    pub fn occurrences(&self) -> impl Iterator<Item = &str> {
        self.occurrences.iter().map(String::as_str)
    }

    pub fn contains_parameter(&self, name: &str) -> Result<bool> {
        if name.is_empty() {
            return Err(Error::invalid_argument("parameter name must not be empty"));
        }
        Ok(self.names.contains(name))
    }

    /// Materializes positional-placeholder SQL: every named parameter is
    /// replaced by its binding's placeholder fragment (`?`, or `(?,?,…)` for
    /// a list), everything else passes through verbatim.
    pub fn sql(&self, bindings: &Bindings) -> Result<String> {
        let mut out = String::with_capacity(self.sql.len());
        for token in &self.tokens {
            match token {
                Token::NamedParam(name) => bindings.get(name)?.append_placeholder(&mut out),
                other => other.write(&mut out),
            }
        }
        Ok(out)
    }

    /// Writes the bound values into a live prepared statement, walking the
    /// occurrence list with a running 1-based position counter. Must be used
    /// with SQL generated by [`NamedStatement::sql`] from the same bindings,
    /// so placeholder text and write order line up.
    pub fn bind_to(&self, target: &mut dyn ParamTarget, bindings: &Bindings) -> Result<()> {
        let mut position = 1;
        for name in &self.occurrences {
            position = bindings.get(name)?.write(target, position)?;
        }
        Ok(())
    }

    /// Fails with a state conflict listing the parameters `bindings` does
    /// not cover. A superset of bindings passes.
    pub fn check_all_bindings_present(&self, bindings: &Bindings) -> Result<()> {
        let missing = self
            .names
            .iter()
            .filter(|name| !bindings.contains(name))
            .collect::<Vec<_>>();
        if missing.is_empty() {
            return Ok(());
        }
        let mut listed = String::new();
        separated_by(&mut listed, missing, ", ", |out, name| {
            out.push(':');
            out.push_str(name);
        });
        Err(Error::state_conflict(format!(
            "missing bindings for parameters: {}",
            listed
        )))
    }

    /// Stricter inverse of [`NamedStatement::check_all_bindings_present`]:
    /// fails if `bindings` covers a name this statement does not have.
    pub fn check_no_extra_bindings(&self, bindings: &Bindings) -> Result<()> {
        let extra = bindings
            .names()
            .filter(|name| !self.names.contains(*name))
            .collect::<Vec<_>>();
        if extra.is_empty() {
            return Ok(());
        }
        let mut listed = String::new();
        separated_by(&mut listed, extra, ", ", |out, name| {
            out.push(':');
            out.push_str(name);
        });
        Err(Error::state_conflict(format!(
            "bindings for unknown parameters: {}",
            listed
        )))
    }

    /// A fresh binder rooted at an empty accumulator.
    pub fn binder(&self) -> Binder<'_> {
        Binder::new(self)
    }

    /// A fresh batch accumulator over this statement.
    pub fn batch(&self) -> Batch<'_> {
        Batch::new(self)
    }
}
