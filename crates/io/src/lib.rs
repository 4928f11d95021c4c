// File I/O: INI codec, SQLite store, Engine.ini export, hardware probe

pub mod engine_ini;
pub mod hardware;
pub mod ini;
pub mod seed;
pub mod sqlite;

pub use engine_ini::{export_engine_ini, import_engine_ini, EngineIniError, ExportSummary};
pub use hardware::SysinfoProbe;
pub use sqlite::SqliteStore;

/// Settings database schema version.
/// Increment when the schema changes in a way that old versions can't read.
pub const SCHEMA_VERSION: u32 = 1;
