//! Subordinate uid/gid bookkeeping: interval sets of delegated ids and the
//! name maps stored in `/etc/subuid` and `/etc/subgid`.

pub mod config;
pub mod error;
pub mod idmap;
pub mod interval;
pub mod interval_set;

pub use config::{GROUP_SUB_ID_FILE, IdKind, IdMapConfig, USER_SUB_ID_FILE};
pub use error::{Error, RecordError, Result};
pub use idmap::IdMap;
pub use interval::Interval;
pub use interval_set::IntervalSet;
