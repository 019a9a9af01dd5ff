mod node;
mod preset;

pub use node::{total_secs, Flow, NotifyKind, Step};
pub use preset::Preset;
