pub mod plugins;
pub mod resources;
pub mod settings;
