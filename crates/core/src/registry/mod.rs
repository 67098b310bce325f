pub mod registry;
pub mod registry_builder;
