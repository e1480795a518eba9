//! CLI command handlers, one per file.

mod clear;
mod run;
mod song;
mod status;
mod unlock;

pub use clear::run_clear;
pub use run::run_queue;
pub use song::run_song;
pub use status::run_status;
pub use unlock::run_unlock;
