//! Controller layer: command orchestration and navigation side effects.

pub mod navigation;
pub mod orchestration;
