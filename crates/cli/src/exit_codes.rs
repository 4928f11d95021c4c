//! CLI Exit Code Registry
//!
//! Exit codes are part of the shell contract. Scripts that launch the
//! settings manager rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 1    | General error (terminal setup, drawing)              |
//! | 2    | Usage error (bad arguments, reported by clap)        |
//! | 3    | Storage error (database could not be opened/seeded)  |

/// Success - the TUI exited normally.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - terminal or logging setup failed.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments. clap exits with this code itself.
#[allow(dead_code)]
pub const EXIT_USAGE: u8 = 2;

/// Storage error - the settings database could not be opened, created or
/// seeded.
pub const EXIT_STORAGE: u8 = 3;
