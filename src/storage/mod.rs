//! SQLite access: statement execution, the optional read-only guard, and the
//! demo database.

pub mod executor;
pub mod guard;
pub mod seed;

pub use executor::QueryExecutor;
pub use guard::StatementGuard;
pub use seed::{create_demo_database, DEMO_STUDENTS};
