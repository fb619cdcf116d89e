pub mod assess;
pub mod classify;
pub mod registry;
