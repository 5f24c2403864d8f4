pub mod record;
pub mod stack_map;
pub mod stack_record;

pub use record::{FovRecord, FovRow, PaddedAxis};
pub use stack_map::StackMap;
pub use stack_record::{StackFovRecord, StackFovRow};
