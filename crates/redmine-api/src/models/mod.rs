pub mod admin;
pub mod attachment;
pub mod category;
pub mod common;
pub mod issue;
pub mod membership;
pub mod news;
pub mod project;
pub mod relation;
pub mod search;
pub mod time_entry;
pub mod user;
pub mod version;
pub mod wiki;

pub use admin::*;
pub use attachment::*;
pub use category::*;
pub use common::{CustomFieldValue, FieldValue, LinkObject, Pagination};
pub use issue::*;
pub use membership::*;
pub use news::*;
pub use project::*;
pub use relation::*;
pub use search::*;
pub use time_entry::*;
pub use user::*;
pub use version::*;
pub use wiki::*;
