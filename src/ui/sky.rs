#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use crate::fx::{
    overlay::{FogVeil, Overlay},
    surface::Rgba,
};

use super::{
    raster::{CELL_HEIGHT_PX, CELL_WIDTH_PX, CellRaster},
    theme::{ColorCapability, Rgb, SkyTheme, mix_rgb, quantize_rgb},
};

const FLASH_TINT: Rgb = (236, 240, 255);
const THUNDER_BRIGHTEN: f32 = 0.55;
const FLASH_BRIGHTEN: f32 = 0.6;
const VEIL_TINT: Rgb = (150, 156, 166);
/// Multiplier on the fog veil opacity; the terminal tint has no blur to carry it.
const VEIL_WEIGHT: f32 = 3.0;
const SPLASH_INK: Rgb = (190, 215, 245);

/// Paints the rasterized particle frame over the sky gradient.
pub struct SkyCanvas<'a> {
    pub raster: &'a CellRaster,
    pub theme: &'a SkyTheme,
    pub overlay: &'a Overlay,
    pub flash_opacity: f32,
    pub capability: ColorCapability,
}

impl Widget for SkyCanvas<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let flash = flash_level(self.overlay.thunder_active(), self.flash_opacity);
        let veil = self.overlay.fog_veil();

        for y in area.top()..area.bottom() {
            let row = y - area.top();
            let base = background_at(self.theme, gradient_ratio(area, y), flash, veil);
            for x in area.left()..area.right() {
                let col = x - area.left();
                let Some(cell) = buf.cell_mut((x, y)) else {
                    continue;
                };
                let raster_cell = self.raster.cell(col, row).copied().unwrap_or_default();
                let bg = composite(raster_cell.wash, base);
                cell.set_bg(quantize_rgb(bg, self.capability));
                if let Some(glyph) = raster_cell.glyph {
                    cell.set_char(glyph)
                        .set_fg(quantize_rgb(composite(raster_cell.ink, bg), self.capability));
                } else if let Some(shade) = raster_cell.shade() {
                    cell.set_char(shade)
                        .set_fg(quantize_rgb(composite(raster_cell.wash, bg), self.capability));
                } else {
                    cell.set_char(' ');
                }
            }
        }

        paint_splashes(area, buf, self.overlay, self.capability);
    }
}

/// How far the sky is pushed towards white by lightning.
#[must_use]
pub fn flash_level(thunder_active: bool, flash_opacity: f32) -> f32 {
    let fading = flash_opacity.clamp(0.0, 1.0) * FLASH_BRIGHTEN;
    if thunder_active {
        fading.max(THUNDER_BRIGHTEN)
    } else {
        fading
    }
}

#[must_use]
pub fn background_at(theme: &SkyTheme, ratio: f32, flash: f32, veil: FogVeil) -> Rgb {
    let mut color = mix_rgb(theme.top, theme.bottom, ratio);
    if veil.opacity > 0.0 {
        color = mix_rgb(color, VEIL_TINT, veil.opacity * VEIL_WEIGHT);
    }
    if flash > 0.0 {
        color = mix_rgb(color, FLASH_TINT, flash);
    }
    color
}

fn gradient_ratio(area: Rect, y: u16) -> f32 {
    if area.height <= 1 {
        0.0
    } else {
        f32::from(y - area.top()) / f32::from(area.height - 1)
    }
}

fn composite(color: Rgba, bg: Rgb) -> Rgb {
    let out = color.over(Rgba::rgb(bg.0, bg.1, bg.2));
    (out.r, out.g, out.b)
}

fn paint_splashes(area: Rect, buf: &mut Buffer, overlay: &Overlay, capability: ColorCapability) {
    let ink = quantize_rgb(SPLASH_INK, capability);
    for splash in overlay.splashes() {
        if splash.at.x < 0.0 {
            continue;
        }
        let col = (splash.at.x / CELL_WIDTH_PX) as u32;
        // Splashes sit on the canvas floor; keep them on the last row.
        let row = ((splash.at.y / CELL_HEIGHT_PX) as u32)
            .min(u32::from(area.height.saturating_sub(1)));
        if col >= u32::from(area.width) {
            continue;
        }
        let (Ok(col), Ok(row)) = (u16::try_from(col), u16::try_from(row)) else {
            continue;
        };
        if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
            cell.set_char('.').set_fg(ink);
        }
    }
}
