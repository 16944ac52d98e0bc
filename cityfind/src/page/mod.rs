pub mod color_scheme;
pub mod command;
pub mod keymap;
pub mod page;
pub mod render;
