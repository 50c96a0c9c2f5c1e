//! Terminal client for a server-rendered CRM board.
//!
//! `model` and `ops` hold the headless interaction core (board, drag/drop,
//! record detail, mention autocomplete); `io` talks to the server and the
//! filesystem; `tui` and `cli` are the two front ends.

pub mod cli;
pub mod io;
pub mod model;
pub mod ops;
pub mod tui;
pub mod util;
