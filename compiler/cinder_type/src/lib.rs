// Type system for the Cinder language.

pub mod types;
