// UI layer - Slint integration and event loop coordination

pub mod bridge;
pub mod controller;

pub use bridge::{UiBridge, UiBridgeHandle};
pub use controller::GuiController;
