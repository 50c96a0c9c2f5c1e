pub mod api;
pub mod board_io;
pub mod config_io;
pub mod dispatch;
pub mod logging;
pub mod watcher;
