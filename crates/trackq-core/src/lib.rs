pub mod config;
pub mod logging;
pub mod paths;

pub mod control;
pub mod fetcher;
pub mod instance_lock;
pub mod pacing;
pub mod playlist;
pub mod queue;
pub mod retry;
pub mod runner;
pub mod track;
