pub mod bootstrap;
pub mod datasource;
pub mod error;
pub mod presentation;
pub mod storage;

pub use bootstrap::{Configuration, Settings};
pub use datasource::{DatabaseClient, Entity, Mapper, Value};
pub use error::{AppError, AppResult};
pub use storage::{CsvReader, FileMode, FileStore};

// Test-only printing helper: expands to eprintln! during tests and debug builds.
// Usage: tprintln!("debug: {}", value);
#[cfg(any(test, debug_assertions))]
#[macro_export]
macro_rules! tprintln {
    ($($arg:tt)*) => ( eprintln!($($arg)*) );
}

// In non-test builds, provide a no-op tprintln! so calls compile without effect.
#[cfg(not(any(test, debug_assertions)))]
#[macro_export]
macro_rules! tprintln {
    ($($arg:tt)*) => ({
        // Preserve formatting checks in release without producing code
        if false { let _ = format!($($arg)*); }
    });
}
