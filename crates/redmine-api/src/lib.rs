pub mod client;
mod convert;
pub mod dates;
pub mod envelope;
pub mod error;
pub mod models;
mod transport;


pub use client::RedmineClient;
pub use envelope::Resource;
pub use error::{RedmineError, Result};
pub use models::*;
pub use transport::compile_query;
