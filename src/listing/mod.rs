//! List-query pipeline shared by every collection endpoint.

mod page;
mod query;

pub use page::{process, PageResult};
pub use query::{FieldSet, ListParams, ListQuery};
