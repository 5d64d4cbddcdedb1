pub mod fabric;
pub mod forge;
pub mod processor;
