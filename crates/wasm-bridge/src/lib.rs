//! Bridge crate for the algae forecast views
//! Connects prediction runs to the chart slots of each prediction screen

pub mod registry;
pub mod view;

#[cfg(feature = "wasm")]
pub mod wasm_api;

pub use registry::{ChartHandle, ChartRegistry, RenderedChart};
pub use view::PredictionView;

#[cfg(feature = "wasm")]
pub use wasm_api::WasmPredictionView;
