//! gapviz
//!
//! A small responsive visualization engine: growth-gap line charts, force-packed
//! bubble charts and zoomable choropleth world maps, drawn into a retained scene
//! graph and exported to SVG or PNG. Pairs with the `gapviz` CLI.
//!
//! ### Features
//! - Linear scales with round-number ticks and locale-aware labels
//! - Linear or cardinal-spline series, gap areas between two series, markers and labels
//! - Collision-free bubble packing with a decaying force simulation
//! - Choropleth maps from TopoJSON/GeoJSON with hover tooltips, pan and zoom
//! - A host that dispatches resizes, animation frames and geometry fetches,
//!   and tears every chart down cleanly on unmount
//!
//! ### Example
//! ```no_run
//! use gapviz::charts::{ChartData, ChartKind, Surface};
//! use gapviz::models::Size;
//! use gapviz::{Host, Options, datasets};
//!
//! let mut host = Host::new(Size::new(800.0, 600.0));
//! let handle = host.mount(
//!     Surface::for_chart(ChartKind::Growth, 800.0),
//!     ChartData::Growth(datasets::growth_gap()),
//!     &Options::default(),
//! );
//! host.resize(Size::new(500.0, 600.0));
//! if let Some(scene) = host.scene(handle) {
//!     gapviz::viz::save(scene, "growth.svg")?;
//! }
//! host.unmount(handle);
//! # Ok::<(), gapviz::VizError>(())
//! ```

pub mod charts;
pub mod choropleth;
pub mod color;
pub mod config;
pub mod datasets;
pub mod error;
pub mod force;
pub mod geo;
pub mod host;
pub mod models;
pub mod scale;
pub mod storage;
pub mod viz;
pub mod viz_plotters_adapter;

pub use charts::{ChartData, ChartKind, PointerEvent, Sizing, Surface, Visualization};
pub use color::{Color, ColorBuckets};
pub use config::{Interpolation, Options};
pub use error::{Result, VizError};
pub use host::{Host, MountHandle};
pub use scale::{Domain, LinearScale, ScaleModel};
