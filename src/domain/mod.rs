pub mod grid;
pub mod inventory;
pub mod light;
