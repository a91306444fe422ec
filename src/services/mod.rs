pub mod embedding;
pub mod encoder;
pub mod features;
pub mod providers;
pub mod recommendations;
pub mod registry;
pub mod vocab;
