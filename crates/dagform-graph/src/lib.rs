//! dagform-graph: the per-session dependency DAG and its rendering.
//!
//!   - `engine`  variable set + accepted dependencies, cycle-safe edge insertion
//!   - `layout`  force-directed (spring) node placement
//!   - `render`  replaceable graph → image capability, SVG implementation

pub mod engine;
pub mod error;
pub mod layout;
pub mod render;

pub use engine::{AddOutcome, DependencyGraph};
pub use error::{GraphError, Result};
pub use render::{GraphRenderer, RenderedImage, SpringRenderer};
