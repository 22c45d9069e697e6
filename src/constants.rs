//! Global constants for MarkerX

/// How many identifiers the engine draws before giving up on finding one
/// that is not already in the store
pub const MAX_ID_ATTEMPTS: usize = 16;

/// Application name used in configuration files and paths
pub const APP_NAME: &str = "MarkerX";
