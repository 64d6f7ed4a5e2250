pub mod merge;
pub mod types;

pub use merge::{merge_results, SourceResults};
pub use types::MergedRecord;
