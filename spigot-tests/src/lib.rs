pub mod fake;

mod batch1;
mod lists;
mod script1;
mod simple;
mod streaming;
mod transaction1;

pub use batch1::batch1;
pub use lists::lists;
pub use script1::script1;
pub use simple::simple;
pub use streaming::streaming;
pub use transaction1::transaction1;

use log::LevelFilter;
use spigot::Connection;
use std::env;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Runs every backend-agnostic scenario against `connection`.
///
/// The scenarios only assert what holds for any conforming session
/// implementation (success, generated SQL text, fail-fast caller errors,
/// state restoration); content-level assertions against scripted results
/// live in the repository tests that drive the fake session directly.
pub fn execute_tests<C: Connection>(connection: &mut C) {
    script1(connection);
    simple(connection);
    lists(connection);
    streaming(connection);
    batch1(connection);
    transaction1(connection);
}
