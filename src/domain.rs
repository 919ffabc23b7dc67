pub mod edit;
pub mod graph;
pub mod index;
pub mod invalidation;
pub mod relations;
pub mod session;
pub mod state;
pub mod task;
pub mod validation;
pub mod view;
