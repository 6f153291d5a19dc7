//! Controller layer: UI actions, backend results, and the flows that tie them to model and view.

pub mod event_controller;
pub mod events;
pub mod orchestration;

pub use event_controller::EventController;
