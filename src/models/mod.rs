pub mod user;
pub mod usage;
pub mod query;
pub mod ai;

pub use user::*;
pub use usage::*;
pub use query::*;
pub use ai::*;
