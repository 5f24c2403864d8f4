pub mod check;
pub mod decompose;
pub mod merge;
pub mod pipeline;
pub mod reproject;

pub use check::{evaluate, ChipSet, DiagnosticReason, Verdict};
pub use decompose::decompose;
pub use merge::union;
pub use pipeline::{check_observation, combine_stack, CheckReport};
pub use reproject::reproject;
