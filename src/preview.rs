use crate::{
    catalog::FilterDefinition, compositor, error::PortraResult, raster::Raster,
};

/// Side length of the square filter-comparison thumbnails.
pub const PREVIEW_SIZE: u32 = 100;

/// One rendered catalog preview.
#[derive(Clone, Debug)]
pub struct Thumbnail {
    pub filter_id: String,
    pub raster: Raster,
}

/// Renders a single filter thumbnail: cover-fit of the source into a
/// `PREVIEW_SIZE` square, filter applied.
pub fn render_preview(image: &Raster, filter: &FilterDefinition) -> PortraResult<Raster> {
    compositor::render(image, filter, PREVIEW_SIZE, PREVIEW_SIZE)
}

/// Renders one thumbnail per catalog entry, in catalog order, so filters can
/// be compared side by side against the current source image.
#[tracing::instrument(skip(image, filters), fields(filters = filters.len()))]
pub fn render_catalog_previews(
    image: &Raster,
    filters: &[FilterDefinition],
) -> PortraResult<Vec<Thumbnail>> {
    let mut out = Vec::with_capacity(filters.len());
    for filter in filters {
        out.push(Thumbnail {
            filter_id: filter.id.clone(),
            raster: render_preview(image, filter)?,
        });
    }
    Ok(out)
}
