//! different utility modules used by the binary: logging, task files and the integration session
/// tiny module to set up terminal and file logging
pub mod logger;
/// integration session: compiled formula cache, task runner, summary tables
pub mod session;
/// parse a TOML task file with settings, logging options and [[task]] tables
pub mod task_parser;
