//! Ports (trait boundaries) for pluggable behavior.
//!
//! These traits separate the game core from the decision-making strategies,
//! the observation machinery, and the persistence layer. Concrete
//! implementations live in `strategy/`, `pipeline/`, and `adapters/`.

pub mod observer;
pub mod repository;
pub mod strategy;

pub use observer::Observer;
pub use repository::PolicyRepository;
pub use strategy::Strategy;
