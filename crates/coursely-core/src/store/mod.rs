// ── Resource store ──
//
// Ordered course caches and per-operation lifecycle records.

mod collection;
mod course_store;
mod lifecycle;

pub use course_store::CourseStore;
pub use lifecycle::{Lifecycle, OperationKind, Phase};
