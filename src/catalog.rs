use crate::error::{PortraError, PortraResult};

/// One step of a filter's color-adjustment chain. Amounts are fractions
/// (1.0 = 100%). Steps compose left to right with per-step clamping.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Adjustment {
    Grayscale(f32),
    Sepia(f32),
    Saturate(f32),
    Contrast(f32),
    Brightness(f32),
    Blur { radius_px: u32, sigma: f32 },
}

/// Separable per-channel blend modes supported by the overlay pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    Normal,
    Multiply,
    Screen,
    Overlay,
    SoftLight,
    Lighten,
}

/// Translucent color filled over the whole frame after the adjustment pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OverlayFx {
    /// Straight RGBA8; the alpha channel is the overlay strength.
    pub color: [u8; 4],
    pub blend: BlendMode,
}

/// Immutable preset: an id, a display name, an adjustment chain and an
/// optional overlay. The numeric tuning is product content, defined once in
/// [`catalog`] and never mutated.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FilterDefinition {
    pub id: String,
    pub name: String,
    pub adjustments: Vec<Adjustment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay: Option<OverlayFx>,
}

impl Adjustment {
    pub fn validate(self) -> PortraResult<()> {
        match self {
            Adjustment::Grayscale(v)
            | Adjustment::Sepia(v)
            | Adjustment::Saturate(v)
            | Adjustment::Contrast(v)
            | Adjustment::Brightness(v) => {
                if !v.is_finite() || v < 0.0 {
                    return Err(PortraError::unknown_adjustment(format!(
                        "amount must be finite and >= 0, got {v}"
                    )));
                }
            }
            Adjustment::Blur { radius_px, sigma } => {
                if radius_px > 256 {
                    return Err(PortraError::unknown_adjustment(
                        "blur radius_px must be <= 256",
                    ));
                }
                if !sigma.is_finite() || sigma <= 0.0 {
                    return Err(PortraError::unknown_adjustment(
                        "blur sigma must be finite and > 0",
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Parses an adjustment by kind name, e.g. `("saturate", 1.3)`.
///
/// For `blur` the value is the Gaussian standard deviation in pixels; the
/// kernel radius defaults to twice the sigma, rounded up.
pub fn parse_adjustment(kind: &str, value: f64) -> PortraResult<Adjustment> {
    let kind = kind.trim().to_ascii_lowercase();
    if kind.is_empty() {
        return Err(PortraError::unknown_adjustment(
            "adjustment kind must be non-empty",
        ));
    }
    let value = value as f32;
    if !value.is_finite() || value < 0.0 {
        return Err(PortraError::unknown_adjustment(format!(
            "'{kind}' amount must be finite and >= 0"
        )));
    }

    let adj = match kind.as_str() {
        "grayscale" | "greyscale" => Adjustment::Grayscale(value),
        "sepia" => Adjustment::Sepia(value),
        "saturate" => Adjustment::Saturate(value),
        "contrast" => Adjustment::Contrast(value),
        "brightness" => Adjustment::Brightness(value),
        "blur" => {
            if value <= 0.0 {
                return Err(PortraError::unknown_adjustment("blur sigma must be > 0"));
            }
            Adjustment::Blur {
                radius_px: (value * 2.0).ceil().max(1.0) as u32,
                sigma: value,
            }
        }
        _ => {
            return Err(PortraError::unknown_adjustment(format!(
                "unknown adjustment kind '{kind}'"
            )));
        }
    };
    adj.validate()?;
    Ok(adj)
}

/// Parses a blend mode name, accepting the common spellings.
pub fn parse_blend_mode(name: &str) -> PortraResult<BlendMode> {
    match name.trim().to_ascii_lowercase().as_str() {
        "normal" | "source-over" => Ok(BlendMode::Normal),
        "multiply" => Ok(BlendMode::Multiply),
        "screen" => Ok(BlendMode::Screen),
        "overlay" => Ok(BlendMode::Overlay),
        "soft-light" | "softlight" | "soft_light" => Ok(BlendMode::SoftLight),
        "lighten" => Ok(BlendMode::Lighten),
        other => Err(PortraError::unknown_blend_mode(format!(
            "unsupported blend mode '{other}'"
        ))),
    }
}

/// Catalog-integrity check: unique non-empty ids and well-formed parameters.
/// Failures here mean a programming error in the filter data, not bad input.
pub fn validate_catalog(filters: &[FilterDefinition]) -> PortraResult<()> {
    if filters.is_empty() {
        return Err(PortraError::validation("filter catalog must be non-empty"));
    }
    let mut seen = std::collections::BTreeSet::new();
    for f in filters {
        if f.id.trim().is_empty() {
            return Err(PortraError::validation("filter id must be non-empty"));
        }
        if !seen.insert(f.id.as_str()) {
            return Err(PortraError::validation(format!(
                "duplicate filter id '{}'",
                f.id
            )));
        }
        for adj in &f.adjustments {
            adj.validate()?;
        }
    }
    Ok(())
}

fn preset(
    id: &str,
    name: &str,
    adjustments: Vec<Adjustment>,
    overlay: Option<OverlayFx>,
) -> FilterDefinition {
    FilterDefinition {
        id: id.to_string(),
        name: name.to_string(),
        adjustments,
        overlay,
    }
}

fn tint(r: u8, g: u8, b: u8, a: u8, blend: BlendMode) -> Option<OverlayFx> {
    Some(OverlayFx {
        color: [r, g, b, a],
        blend,
    })
}

/// The fixed, ordered preset catalog. The first entry is the identity
/// filter used as the post-upload default.
pub fn catalog() -> Vec<FilterDefinition> {
    use Adjustment::{Blur, Brightness, Contrast, Grayscale, Saturate, Sepia};
    use BlendMode::{Lighten, Multiply, Overlay, Screen, SoftLight};

    vec![
        preset("normal", "Original", vec![], None),
        preset(
            "studio",
            "Studio Pro",
            vec![Contrast(1.05), Brightness(1.05), Saturate(1.05)],
            tint(255, 255, 255, 13, SoftLight),
        ),
        preset(
            "matte",
            "Matte",
            vec![Contrast(0.90), Brightness(1.10), Saturate(0.85)],
            tint(20, 20, 20, 26, Screen),
        ),
        preset("vivid", "Vivid", vec![Saturate(1.30), Contrast(1.10)], None),
        preset(
            "cocoa",
            "Cocoa",
            vec![Grayscale(1.0), Contrast(1.10), Brightness(1.10)],
            tint(80, 60, 50, 38, Multiply),
        ),
        preset(
            "noir",
            "Noir",
            vec![Grayscale(1.0), Contrast(1.40), Brightness(0.90)],
            None,
        ),
        preset(
            "silvertone",
            "Silvertone",
            vec![Grayscale(1.0), Contrast(0.95), Brightness(1.10)],
            tint(200, 200, 220, 26, Overlay),
        ),
        preset(
            "analog",
            "Analog 1970",
            vec![
                Sepia(0.30),
                Saturate(1.20),
                Contrast(0.90),
                Brightness(1.05),
            ],
            tint(255, 220, 180, 26, Multiply),
        ),
        preset(
            "polaroid",
            "Polaroid",
            vec![
                Contrast(1.10),
                Brightness(1.10),
                Saturate(0.80),
                Sepia(0.20),
            ],
            tint(255, 200, 200, 26, SoftLight),
        ),
        preset(
            "warmth",
            "Golden Hour",
            vec![Saturate(1.10), Brightness(1.05), Sepia(0.10)],
            tint(255, 180, 0, 38, Overlay),
        ),
        preset(
            "peach",
            "Soft Peach",
            vec![Contrast(1.00), Brightness(1.08), Saturate(1.10)],
            tint(255, 200, 180, 38, Screen),
        ),
        preset(
            "cool",
            "Arctic",
            vec![Saturate(0.90), Brightness(1.05), Contrast(1.10)],
            tint(0, 100, 200, 26, Overlay),
        ),
        preset(
            "dramatic",
            "Dramatic",
            vec![Contrast(1.35), Saturate(0.80), Brightness(0.95)],
            None,
        ),
        preset(
            "fade",
            "Faded",
            vec![Contrast(0.85), Brightness(1.15), Saturate(0.80)],
            tint(226, 218, 196, 51, Multiply),
        ),
        preset(
            "emerald",
            "Forest",
            vec![Contrast(1.05), Saturate(0.90), Brightness(1.00)],
            tint(10, 80, 40, 38, Screen),
        ),
        preset(
            "urban",
            "Urban",
            vec![Contrast(1.20), Saturate(0.0), Brightness(1.10)],
            tint(40, 20, 60, 51, Lighten),
        ),
        preset(
            "dreamy",
            "Dreamy",
            vec![
                Blur {
                    radius_px: 1,
                    sigma: 0.5,
                },
                Brightness(1.15),
                Contrast(0.95),
                Saturate(1.10),
            ],
            tint(255, 230, 255, 26, Screen),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_valid_and_starts_with_identity() {
        let filters = catalog();
        validate_catalog(&filters).unwrap();
        assert_eq!(filters[0].id, "normal");
        assert!(filters[0].adjustments.is_empty());
        assert!(filters[0].overlay.is_none());
        assert_eq!(filters.len(), 17);
    }

    #[test]
    fn noir_is_grayscale_with_boosted_contrast() {
        let filters = catalog();
        let noir = filters.iter().find(|f| f.id == "noir").unwrap();
        assert_eq!(
            noir.adjustments,
            vec![
                Adjustment::Grayscale(1.0),
                Adjustment::Contrast(1.40),
                Adjustment::Brightness(0.90),
            ]
        );
        assert!(noir.overlay.is_none());
    }

    #[test]
    fn parse_adjustment_kinds_and_rejections() {
        assert_eq!(
            parse_adjustment("saturate", 1.3).unwrap(),
            Adjustment::Saturate(1.3)
        );
        assert_eq!(
            parse_adjustment("Blur", 0.5).unwrap(),
            Adjustment::Blur {
                radius_px: 1,
                sigma: 0.5
            }
        );
        assert!(matches!(
            parse_adjustment("hue-rotate", 0.5).unwrap_err(),
            PortraError::UnknownAdjustment(_)
        ));
        assert!(parse_adjustment("contrast", -1.0).is_err());
        assert!(parse_adjustment("contrast", f64::NAN).is_err());
    }

    #[test]
    fn parse_blend_mode_aliases_and_rejections() {
        assert_eq!(parse_blend_mode("soft-light").unwrap(), BlendMode::SoftLight);
        assert_eq!(parse_blend_mode("source-over").unwrap(), BlendMode::Normal);
        assert_eq!(parse_blend_mode("Multiply").unwrap(), BlendMode::Multiply);
        assert!(matches!(
            parse_blend_mode("color-dodge").unwrap_err(),
            PortraError::UnknownBlendMode(_)
        ));
    }

    #[test]
    fn validate_catalog_rejects_duplicate_ids() {
        let mut filters = catalog();
        filters[1].id = "normal".to_string();
        assert!(validate_catalog(&filters).is_err());
    }

    #[test]
    fn json_roundtrip() {
        let filters = catalog();
        let s = serde_json::to_string_pretty(&filters).unwrap();
        let de: Vec<FilterDefinition> = serde_json::from_str(&s).unwrap();
        assert_eq!(de, filters);
    }
}
