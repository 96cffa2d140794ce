pub mod engagement;
pub mod interactions;
pub mod plans;

pub use engagement::{EngagementStore, PgEngagementStore};
pub use interactions::{InteractionEventStore, PgInteractionEventStore};
pub use plans::{PgPlanStore, PlanStore};
