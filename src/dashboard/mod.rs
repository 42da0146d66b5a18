//! Dashboard controller: state transitions, rendering and the event loop

pub mod render;
pub mod runtime;
pub mod state;

pub use render::{DashboardView, Presenter, RenderOptions, TableRow};
pub use runtime::{DashboardHandle, DashboardRuntime};
pub use state::{CycleState, DashboardState, Effect, Event, RequestToken};
