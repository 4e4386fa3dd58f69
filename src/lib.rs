pub mod config;
pub mod derive;
pub mod error;
pub mod filter;
pub mod loader;
pub mod output;
pub mod pager;
pub mod selection;
pub mod session;
pub mod stats;
pub mod table;

pub use error::{DataSourceError, Error, InvalidSelectionError, Result};
