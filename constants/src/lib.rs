pub mod grid;
pub mod sampling;
pub mod session;
pub mod ui;
