//! Camera and projection side of the snnviz visualizer
//!
//! This crate turns the simulated network into something a renderer can
//! draw without owning any rendering itself:
//!
//! - [`OrbitCamera`] orbits a movable anchor and clamps every update;
//! - [`PendingInput`] collects pointer, wheel and key deltas between frames;
//! - [`Projector`] maps world points to canvas pixels;
//! - [`Visualizer`] owns a [`SimulationEngine`](snnviz_runtime::SimulationEngine)
//!   and a camera and runs one frame at a time.
//!
//! # Example
//!
//! ```
//! use snnviz_runtime::SimulationConfig;
//! use snnviz_view::{CameraParams, Viewport, Visualizer};
//!
//! let mut vis = Visualizer::new(
//!     SimulationConfig::default().with_seed(1),
//!     CameraParams::default(),
//!     Viewport::new(800.0, 600.0),
//! );
//! vis.input_mut().wheel(-1.0);
//! let report = vis.frame();
//! assert_eq!(report.ticks, 1);
//!
//! let projector = vis.projector();
//! for neuron in vis.engine().network().neurons() {
//!     let p = projector.project(neuron.position());
//!     assert!(p.scale.is_finite());
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod camera;
pub mod input;
pub mod picking;
pub mod projector;
pub mod visualizer;

pub use camera::{CameraBasis, CameraParams, OrbitCamera, PITCH_LIMIT};
pub use input::{MoveInput, PendingInput};
pub use picking::{pick_neuron, DEFAULT_PICK_RADIUS};
pub use projector::{Projection, Projector, Viewport, FOCAL_LENGTH, MIN_VIEW_DISTANCE};
pub use visualizer::{Visualizer, TRACE_LEN};
