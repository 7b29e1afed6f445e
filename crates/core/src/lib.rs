pub mod chunking;
pub mod config;
pub mod document;
pub mod error;

pub use chunking::*;
pub use config::Config;
pub use document::*;
pub use error::*;
