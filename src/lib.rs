pub mod alias;
pub mod codec;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod graph;
pub mod import;
pub mod plugin;
pub mod rename;
pub mod server;
#[doc(hidden)]
pub mod test_support;
