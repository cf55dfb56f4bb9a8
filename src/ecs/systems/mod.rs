pub mod command_layer;
pub mod disasters;
pub mod economy;
pub mod presentation;
