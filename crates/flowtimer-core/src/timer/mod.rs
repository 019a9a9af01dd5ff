mod attribution;
mod effects;
mod engine;
mod ticker;

pub use attribution::{AttributionPolicy, ContributionKind};
pub use effects::EffectRouter;
pub use engine::{FlowEngine, Phase};
pub use ticker::Ticker;
