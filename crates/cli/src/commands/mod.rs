//! CLI commands for the crossline scanner.

pub mod audit;
pub mod match_title;
pub mod scan;
pub mod watch;

pub use audit::{run_audit, AuditArgs};
pub use match_title::{run_match, MatchArgs};
pub use scan::{run_scan, ScanArgs};
pub use watch::{run_watch, WatchArgs};
