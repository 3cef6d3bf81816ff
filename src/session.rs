use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{
    catalog::{FilterDefinition, catalog, validate_catalog},
    decode::{decode_image, encode_png},
    error::{PortraError, PortraResult},
    fullres::{MAX_DIMENSION, render_full},
    preview::{Thumbnail, render_catalog_previews},
    raster::{Raster, SourceImage},
    stylize::{StyleTicket, build_style_prompt},
};

/// A named PNG payload ready for download.
#[derive(Clone, Debug)]
pub struct ExportFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// The single editing session: owns the current source image, the active
/// filter selection, the current full-resolution render and the stylize
/// bookkeeping. Renders are synchronous full recomputes; a failed operation
/// never clobbers the previously displayed raster.
pub struct EditorSession {
    filters: Vec<FilterDefinition>,
    max_dimension: u32,
    image: Option<SourceImage>,
    active: usize,
    rendered: Option<Raster>,
    thumbnails: Option<Vec<Thumbnail>>,
    stylized: Option<Raster>,
    style_generation: u64,
    style_pending: bool,
}

impl EditorSession {
    pub fn new() -> PortraResult<Self> {
        Self::with_catalog(catalog(), MAX_DIMENSION)
    }

    pub fn with_catalog(filters: Vec<FilterDefinition>, max_dimension: u32) -> PortraResult<Self> {
        validate_catalog(&filters)?;
        if max_dimension == 0 {
            return Err(PortraError::validation("max_dimension must be > 0"));
        }
        Ok(Self {
            filters,
            max_dimension,
            image: None,
            active: 0,
            rendered: None,
            thumbnails: None,
            stylized: None,
            style_generation: 0,
            style_pending: false,
        })
    }

    /// Decodes a fresh upload and replaces the session image wholesale:
    /// selection resets to the identity filter, any stylized output is
    /// dropped, thumbnails are invalidated, and the frame is re-rendered.
    #[tracing::instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub fn load_image(&mut self, bytes: &[u8]) -> PortraResult<()> {
        let image = Arc::new(decode_image(bytes)?);
        let rendered = render_full(&image, &self.filters[0], self.max_dimension)?;
        tracing::debug!(
            width = image.width(),
            height = image.height(),
            "loaded source image"
        );
        self.image = Some(image);
        self.active = 0;
        self.rendered = Some(rendered);
        self.thumbnails = None;
        self.stylized = None;
        self.style_pending = false;
        Ok(())
    }

    /// Switches the active filter and re-renders. On failure the previous
    /// selection and displayed raster are left untouched.
    #[tracing::instrument(skip(self))]
    pub fn select_filter(&mut self, id: &str) -> PortraResult<()> {
        let idx = self
            .filters
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| PortraError::validation(format!("no filter with id '{id}'")))?;

        if let Some(image) = &self.image {
            let rendered = render_full(image, &self.filters[idx], self.max_dimension)?;
            self.rendered = Some(rendered);
        }
        self.active = idx;
        Ok(())
    }

    pub fn filters(&self) -> &[FilterDefinition] {
        &self.filters
    }

    pub fn active_filter(&self) -> &FilterDefinition {
        &self.filters[self.active]
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// The current filtered full-resolution render, if an image is loaded.
    pub fn rendered(&self) -> Option<&Raster> {
        self.rendered.as_ref()
    }

    /// What the user sees: a stylized result while one is active, otherwise
    /// the filtered render.
    pub fn displayed(&self) -> Option<&Raster> {
        self.stylized.as_ref().or(self.rendered.as_ref())
    }

    /// Catalog thumbnails for the current image, cached per upload. The
    /// cache is purely an optimization: thumbnails are a deterministic
    /// function of (image, catalog).
    pub fn thumbnails(&mut self) -> PortraResult<&[Thumbnail]> {
        let image = self
            .image
            .as_ref()
            .ok_or_else(|| PortraError::invalid_image("no source image loaded"))?;
        if self.thumbnails.is_none() {
            self.thumbnails = Some(render_catalog_previews(image, &self.filters)?);
        }
        self.thumbnails
            .as_deref()
            .ok_or_else(|| PortraError::validation("thumbnail cache unexpectedly empty"))
    }

    /// Encodes the displayed raster as a named PNG download.
    pub fn export_png(&self) -> PortraResult<ExportFile> {
        let raster = self
            .displayed()
            .ok_or_else(|| PortraError::invalid_image("no source image loaded"))?;
        let bytes = encode_png(raster)?;
        let tag = if self.stylized.is_some() {
            "ai"
        } else {
            self.filters[self.active].id.as_str()
        };
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        Ok(ExportFile {
            name: format!("portra-{tag}-{millis}.png"),
            bytes,
        })
    }

    /// Snapshots the current render for the generative collaborator.
    ///
    /// Empty or whitespace-only instructions are rejected up front rather
    /// than sent. Issuing a new request supersedes any in-flight one: the
    /// older ticket's result will be discarded on completion.
    #[tracing::instrument(skip(self, instruction))]
    pub fn request_stylize(&mut self, instruction: &str) -> PortraResult<StyleTicket> {
        if instruction.trim().is_empty() {
            return Err(PortraError::remote("style instruction must not be empty"));
        }
        let rendered = self
            .rendered
            .as_ref()
            .ok_or_else(|| PortraError::invalid_image("no source image loaded"))?;
        let image_png = encode_png(rendered)?;
        self.style_generation += 1;
        self.style_pending = true;
        tracing::debug!(generation = self.style_generation, "stylize requested");
        Ok(StyleTicket {
            generation: self.style_generation,
            image_png,
            prompt: build_style_prompt(instruction),
        })
    }

    /// Applies a collaborator result. Returns `Ok(false)` when the ticket was
    /// superseded by a newer request (the result is discarded). Any failure,
    /// including an undecodable payload, is normalized to
    /// `RemoteGeneration` and leaves the session in its pre-request state.
    pub fn complete_stylize(
        &mut self,
        ticket: &StyleTicket,
        outcome: PortraResult<Vec<u8>>,
    ) -> PortraResult<bool> {
        if ticket.generation != self.style_generation {
            tracing::debug!(
                stale = ticket.generation,
                current = self.style_generation,
                "discarding superseded stylize result"
            );
            return Ok(false);
        }
        self.style_pending = false;
        let bytes = outcome.map_err(|e| PortraError::remote(e.to_string()))?;
        let raster = decode_image(&bytes)
            .map_err(|e| PortraError::remote(format!("malformed generated image: {e}")))?;
        self.stylized = Some(raster);
        Ok(true)
    }

    /// True while a stylize request has been issued but not completed.
    pub fn stylize_pending(&self) -> bool {
        self.style_pending
    }

    /// Drops the stylized output and returns to the filtered render.
    pub fn clear_stylized(&mut self) {
        self.stylized = None;
    }
}
