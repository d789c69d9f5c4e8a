pub mod components;
pub mod controller;
pub mod registry;
pub mod viewport;

pub use components::Rect;
pub use controller::{Controller, ViewState};
pub use registry::{HoverRegistry, RegionHandle};
pub use viewport::{fit, Bounds, FitOptions, FitScheduler, FitTicket, Transform};
