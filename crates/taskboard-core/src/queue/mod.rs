//! Queue module: the pending priority queue and the completed history.
//!
//! Both containers are plain owned values. Only `TaskManager` mutates them.

mod history;
mod pending;

pub use history::CompletedHistory;
pub use pending::PendingQueue;
