//! Command-line host for `animals-core`: a ureq `Transport` and a terminal
//! `View`.

pub mod transport;
pub mod view;

pub use transport::UreqTransport;
pub use view::TerminalView;
