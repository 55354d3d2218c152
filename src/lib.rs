//! Spigot: named-parameter SQL for Rust.
//!
//! Write SQL with `:named` placeholders, bind values or lists to the names
//! in any order, and execute the statement through a plain row-cursor
//! database session. Named parameters never reach the backend: the parsed
//! statement expands them into standard positional `?` placeholders before
//! `prepare`, list bindings into one placeholder per element.
//!
//! ```rust,ignore
//! use spigot::{CursorExt, NamedStatement};
//!
//! let statement = NamedStatement::parse(
//!     "SELECT id FROM orders WHERE status IN :statuses AND amount > :floor",
//! )?;
//! let ids = statement
//!     .binder()
//!     .bind_list("statuses", ["OPEN", "HELD"])?
//!     .bind("floor", 250)?
//!     .fetch_all(&mut session, |row: &dyn spigot::Cursor| row.get::<i64>(0))?;
//! ```
//!
//! The statement is parsed once and is safe to reuse concurrently; binders
//! and binding accumulators are immutable and fan out on every bind call.
//! Batches, multi-statement scripts and a transaction wrapper with
//! guaranteed autocommit/isolation restoration sit on the same session
//! capability traits.

pub use spigot_core::*;
