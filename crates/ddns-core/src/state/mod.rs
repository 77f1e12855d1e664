// # Domain Store Implementations
//
// The in-memory store lives here; the SQLite store is its own crate
// (`ddns-store-sqlite`) so the core stays free of database drivers.

pub mod memory;

pub use memory::MemoryDomainStore;
