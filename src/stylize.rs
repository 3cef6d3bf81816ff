use crate::error::PortraResult;

/// Opaque generative-image collaborator: PNG bytes and a prompt in, image
/// bytes out. Transport, credentials and model choice live behind this seam;
/// implementations report every failure through the returned error.
pub trait StyleTransform {
    fn style_transform(&self, image_png: &[u8], prompt: &str) -> PortraResult<Vec<u8>>;
}

/// Style suggestions offered alongside the free-text instruction box.
pub const SUGGESTED_STYLES: [&str; 8] = [
    "Professional Studio Photography, Rembrandt Lighting",
    "Cinematic Movie Scene, Teal and Orange",
    "Vintage 1950s Kodak Film Portrait",
    "Cyberpunk Neon Portrait, High Detail",
    "Soft Watercolor Painting Style",
    "Vogue Magazine Fashion Shoot",
    "Black and White Noir Detective Style",
    "Ethereal Fantasy Elf Portrait",
];

/// Wraps the user's free-text instruction in the fixed editing prompt sent to
/// the collaborator.
pub fn build_style_prompt(instruction: &str) -> String {
    format!(
        "Act as a professional photo editor. Transform this image using the following style \
         or instruction: \"{instruction}\". Maintain the composition and main subject \
         (portrait) but apply the artistic style vigorously. Return ONLY the image."
    )
}

/// Snapshot of one in-flight stylize request. The generation number ties the
/// eventual result back to the session; a result whose generation is no
/// longer current is discarded (last-write-wins).
#[derive(Clone, Debug)]
pub struct StyleTicket {
    pub generation: u64,
    /// PNG encoding of the full-resolution render at request time.
    pub image_png: Vec<u8>,
    pub prompt: String,
}
