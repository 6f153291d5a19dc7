//! UI layer: the retained list document and the egui shell that paints it.

pub mod app;
pub mod view;

pub use app::EventManagerApp;
