pub mod animation;
pub mod canvas;
pub mod config;
pub mod geometry;
pub mod grazing;
pub mod hit;
pub mod interaction;
pub mod layers;
pub mod layout;
pub mod logger;
pub mod region;
pub mod render;
pub mod rng;
pub mod snapshot;
pub mod web;

pub use config::LayoutParameters;
pub use geometry::{Geometry, Viewport};
pub use interaction::{Destination, InteractionController};
pub use region::{HoverTarget, Region};
pub use render::{LayerRenderer, RenderReport};
