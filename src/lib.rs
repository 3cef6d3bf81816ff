//! Portra is a deterministic CPU compositing engine for portrait photo filters.
//!
//! It turns a decoded photograph plus a declarative [`FilterDefinition`] into
//! pixels at two scales: small square thumbnails for side-by-side filter
//! comparison, and a bounded full-resolution render for display and export.
//!
//! # Pipeline overview
//!
//! 1. **Decode**: `bytes -> Raster` (straight RGBA8, front-loaded IO)
//! 2. **Fit**: cover-fit / center-crop scaling into the target dimensions
//! 3. **Adjust**: the filter's color-adjustment chain, left to right
//! 4. **Overlay**: optional translucent fill under a separable blend mode
//! 5. **Export** (optional): PNG bytes, or a snapshot handed to a remote
//!    generative collaborator via the [`StyleTransform`] seam
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: rendering is a pure function of
//!   (source raster, filter, target dimensions).
//! - **No hidden draw state**: adjust and overlay are two pure buffer stages;
//!   a blend mode is a per-call argument and can never leak between renders.
//! - **No IO in the renderers**: decode/encode live at the boundary.
#![forbid(unsafe_code)]

pub mod adjust_cpu;
pub mod blend_cpu;
pub mod catalog;
pub mod compositor;
pub mod decode;
pub mod error;
pub mod fullres;
pub mod preview;
pub mod raster;
pub mod session;
pub mod stylize;

pub use adjust_cpu::apply_adjustments;
pub use blend_cpu::{blend_channel, overlay_in_place};
pub use catalog::{
    Adjustment, BlendMode, FilterDefinition, OverlayFx, catalog, parse_adjustment,
    parse_blend_mode, validate_catalog,
};
pub use compositor::{CoverFit, cover_fit, draw_cover, render};
pub use decode::{decode_image, encode_png};
pub use error::{PortraError, PortraResult};
pub use fullres::{MAX_DIMENSION, fit_within, render_full};
pub use preview::{PREVIEW_SIZE, Thumbnail, render_catalog_previews, render_preview};
pub use raster::{Raster, SourceImage};
pub use session::{EditorSession, ExportFile};
pub use stylize::{SUGGESTED_STYLES, StyleTicket, StyleTransform, build_style_prompt};
