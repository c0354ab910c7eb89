pub mod client;
pub mod memory;
pub mod sqlite;

pub use client::LedgerAccessor;
#[cfg(test)]
pub use client::MockLedgerAccessor;
pub use memory::InMemoryLedger;
pub use sqlite::SqliteLedger;
