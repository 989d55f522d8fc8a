#[cfg(test)]
pub mod common;

mod dialect_mapping;
