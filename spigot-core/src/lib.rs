mod as_value;
mod batch;
mod binder;
mod binding;
mod bindings;
mod error;
mod mapper;
mod rows;
mod script;
mod session;
mod statement;
mod token;
mod transaction;
mod util;
mod value;

pub use as_value::*;
pub use batch::*;
pub use binder::Binder;
pub use binding::*;
pub use bindings::*;
pub use error::{Error, ErrorKind};
pub use mapper::*;
pub use rows::*;
pub use script::*;
pub use session::*;
pub use statement::*;
pub use token::*;
pub use transaction::*;
pub use util::*;
pub use value::*;

pub type Result<T> = std::result::Result<T, Error>;
