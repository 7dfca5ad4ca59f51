mod error;
mod interests;
mod tasks;

pub use error::StoreError;
pub use interests::{InterestRecord, InterestStore};
pub use tasks::TaskStore;
