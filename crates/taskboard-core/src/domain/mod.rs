//! Domain model (ids, tasks, errors, manager state, events).

pub mod errors;
pub mod events;
pub mod ids;
pub mod state;
pub mod task;

pub use self::errors::{Result, TaskBoardError};
pub use self::events::{BoardEvent, BoardSnapshot};
pub use self::ids::TaskId;
pub use self::state::ManagerState;
pub use self::task::{Priority, Task, parse_priority};
