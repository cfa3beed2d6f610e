//! Command handlers: bridge CLI args -> collector -> output formatting.

pub mod collect;
pub mod config_cmd;
pub mod control;
pub mod watch;
