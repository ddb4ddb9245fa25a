//! # Backends
//!
//! Concrete [`Operator`](crate::Operator) implementations.
//!
//! | Backend | Storage | Enumeration | `change_permissions` |
//! |---------|---------|-------------|----------------------|
//! | [`LocalOperator`] | `std::fs` | lazy, live OS stream | POSIX bits on Unix, read-only flag elsewhere |
//! | [`MemoryOperator`] | `BTreeMap` behind `RwLock` | snapshot at call time | recorded, not enforced |

mod local;
mod memory;

pub use local::LocalOperator;
pub use memory::MemoryOperator;
