pub mod metrics;
pub mod query_guard;
pub mod quota;
pub mod upstream;

pub use metrics::*;
pub use query_guard::*;
pub use quota::*;
pub use upstream::*;
