pub mod config;
pub mod headless;
pub mod watch;
