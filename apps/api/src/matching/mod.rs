// Job matching: skill normalization, overlap scoring, per-user match generation.
// Storage goes through the traits in `store`; nothing here touches the pool directly.

pub mod generator;
pub mod handlers;
pub mod locks;
pub mod scoring;
pub mod skills;
pub mod store;

#[cfg(test)]
pub mod memory;
