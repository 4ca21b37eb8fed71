//! Infrastructure adapters implementing the crate's ports.

pub mod json_policy;

pub use json_policy::JsonPolicyRepository;
