pub mod terminal;
pub mod views;
