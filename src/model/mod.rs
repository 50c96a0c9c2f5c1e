pub mod board;
pub mod card;
pub mod config;
pub mod record;
pub mod text;

pub use board::*;
pub use card::*;
pub use config::*;
pub use record::*;
pub use text::*;
