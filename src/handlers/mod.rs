pub mod hotness_handlers;
pub mod interaction_handlers;
