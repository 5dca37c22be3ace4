//! Alpha-masked scratch surface.
//!
//! Pixels are stored as RGBA. Scratching only ever writes alpha zero, so the
//! cleared area can grow but never shrink.

use crate::error::{Result, RevealError};
use rand::Rng;

pub const FILL: [u8; 3] = [0x9c, 0xa3, 0xaf];
pub const SPECKLE: [u8; 3] = [0x6b, 0x72, 0x80];
pub const CAPTION: [u8; 3] = [0x37, 0x41, 0x51];

pub const HEADLINE: &str = "SCRATCH HERE";
pub const SUBTITLE: &str = "Use your finger to reveal your prize!";

/// Pixels below the center at which the subtitle sits.
const SUBTITLE_OFFSET: u32 = 30;
const MAX_PIXELS: u64 = 16_777_216;

/// Text painted onto the surface, anchored at its horizontal center.
#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    pub text: &'static str,
    pub y: u32,
}

#[derive(Debug, Clone)]
pub struct Surface {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
    captions: Vec<Caption>,
}

impl Surface {
    /// Blank, fully opaque surface in the base fill colour.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixels = width as u64 * height as u64;
        if pixels > MAX_PIXELS {
            return Err(RevealError::SurfaceTooLarge { width, height });
        }

        let mut rgba = Vec::with_capacity(pixels as usize * 4);
        for _ in 0..pixels {
            rgba.extend_from_slice(&[FILL[0], FILL[1], FILL[2], 0xff]);
        }

        Ok(Self {
            width,
            height,
            rgba,
            captions: Vec::new(),
        })
    }

    /// Surface as it looks when the card mounts: fill, speckle texture and
    /// the two instruction lines.
    pub fn painted<R: Rng + ?Sized>(
        width: u32,
        height: u32,
        speckles: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let mut surface = Self::new(width, height)?;
        if surface.is_empty() {
            return Ok(surface);
        }

        for _ in 0..speckles {
            let x = rng.gen_range(0..width);
            let y = rng.gen_range(0..height);
            let size = rng.gen_range(1..=4);
            surface.fill_rect(x, y, size, size, SPECKLE);
        }

        let center = height / 2;
        surface.captions.push(Caption {
            text: HEADLINE,
            y: center,
        });
        surface.captions.push(Caption {
            text: SUBTITLE,
            y: center.saturating_add(SUBTITLE_OFFSET).min(height - 1),
        });

        Ok(surface)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn captions(&self) -> &[Caption] {
        &self.captions
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= 0.0 && y >= 0.0 && x < self.width as f64 && y < self.height as f64
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let i = self.offset(x, y)?;
        Some([self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]])
    }

    pub fn alpha(&self, x: u32, y: u32) -> Option<u8> {
        self.offset(x, y).map(|i| self.rgba[i + 3])
    }

    /// Erase every pixel whose center lies within `radius` of `(cx, cy)`.
    /// Returns how many pixels went from covered to cleared.
    pub fn clear_circle(&mut self, cx: f64, cy: f64, radius: f64) -> usize {
        if self.is_empty() || !(radius > 0.0) || !cx.is_finite() || !cy.is_finite() {
            return 0;
        }

        let x0 = (cx - radius).floor().max(0.0) as u32;
        let y0 = (cy - radius).floor().max(0.0) as u32;
        let x1 = (cx + radius).ceil().min(self.width as f64) as u32;
        let y1 = (cy + radius).ceil().min(self.height as f64) as u32;
        let r2 = radius * radius;

        let mut cleared = 0;
        for y in y0..y1 {
            let dy = y as f64 + 0.5 - cy;
            for x in x0..x1 {
                let dx = x as f64 + 0.5 - cx;
                if dx * dx + dy * dy > r2 {
                    continue;
                }
                let i = (y as usize * self.width as usize + x as usize) * 4 + 3;
                if self.rgba[i] != 0 {
                    self.rgba[i] = 0;
                    cleared += 1;
                }
            }
        }
        cleared
    }

    /// Share of fully transparent pixels, in `[0, 100]`. Scans the whole
    /// alpha channel.
    pub fn revealed_percent(&self) -> f64 {
        let total = self.rgba.len() / 4;
        if total == 0 {
            return 0.0;
        }
        let transparent = self.rgba.iter().skip(3).step_by(4).filter(|a| **a == 0).count();
        transparent as f64 / total as f64 * 100.0
    }

    /// Downsample to `cols` by `rows` characters. A cell shows `#` while any
    /// of its pixels is covered (`.` for speckled cells) and a space once
    /// fully cleared. Captions are drawn over covered cells.
    pub fn render_ascii(&self, cols: usize, rows: usize) -> String {
        if self.is_empty() || cols == 0 || rows == 0 {
            return String::new();
        }

        let mut grid = vec![vec![' '; cols]; rows];
        for (row, line) in grid.iter_mut().enumerate() {
            let (ya, yb) = span(row, rows, self.height);
            for (col, cell) in line.iter_mut().enumerate() {
                let (xa, xb) = span(col, cols, self.width);
                *cell = self.cell_glyph(xa, xb, ya, yb);
            }
        }

        for caption in &self.captions {
            let row = (caption.y as usize * rows / self.height as usize).min(rows - 1);
            let text: Vec<char> = caption.text.chars().take(cols).collect();
            let start = (cols - text.len()) / 2;
            for (i, ch) in text.into_iter().enumerate() {
                let cell = &mut grid[row][start + i];
                if *cell != ' ' {
                    *cell = ch;
                }
            }
        }

        grid.into_iter()
            .map(|line| line.into_iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn cell_glyph(&self, xa: u32, xb: u32, ya: u32, yb: u32) -> char {
        let mut covered = false;
        for y in ya..yb {
            for x in xa..xb {
                let i = (y as usize * self.width as usize + x as usize) * 4;
                if self.rgba[i + 3] == 0 {
                    continue;
                }
                if self.rgba[i..i + 3] == SPECKLE {
                    return '.';
                }
                covered = true;
            }
        }
        if covered {
            '#'
        } else {
            ' '
        }
    }

    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: [u8; 3]) {
        let x1 = x.saturating_add(w).min(self.width);
        let y1 = y.saturating_add(h).min(self.height);
        for py in y..y1 {
            for px in x..x1 {
                let i = (py as usize * self.width as usize + px as usize) * 4;
                self.rgba[i..i + 3].copy_from_slice(&color);
            }
        }
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }
}

/// Pixel range covered by cell `i` of `cells` over `len` pixels, never empty.
fn span(i: usize, cells: usize, len: u32) -> (u32, u32) {
    let len = len as usize;
    let start = i * len / cells;
    let end = ((i + 1) * len / cells).max(start + 1).min(len);
    (start.min(len - 1) as u32, end as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn painted(width: u32, height: u32) -> Surface {
        let mut rng = StdRng::seed_from_u64(7);
        Surface::painted(width, height, 100, &mut rng).unwrap()
    }

    #[test]
    fn test_painted_surface_is_opaque() {
        let surface = painted(300, 200);
        assert_eq!(surface.revealed_percent(), 0.0);
        assert!((0..200).all(|y| (0..300).all(|x| surface.alpha(x, y) == Some(0xff))));

        let speckled = (0..200)
            .flat_map(|y| (0..300).map(move |x| (x, y)))
            .filter(|(x, y)| surface.pixel(*x, *y).unwrap()[..3] == SPECKLE)
            .count();
        assert!(speckled > 0);
        assert!(speckled <= 100 * 16);

        let texts: Vec<_> = surface.captions().iter().map(|c| c.text).collect();
        assert_eq!(texts, vec![HEADLINE, SUBTITLE]);
        assert_eq!(surface.captions()[0].y, 100);
        assert_eq!(surface.captions()[1].y, 130);
    }

    #[test]
    fn test_empty_surface_reports_zero() {
        let mut surface = painted(0, 0);
        assert!(surface.is_empty());
        assert_eq!(surface.clear_circle(0.0, 0.0, 20.0), 0);
        assert_eq!(surface.revealed_percent(), 0.0);
        assert_eq!(surface.render_ascii(10, 4), "");
    }

    #[test]
    fn test_clear_circle() {
        let mut surface = Surface::new(100, 100).unwrap();
        let cleared = surface.clear_circle(50.0, 50.0, 20.0);

        // Roughly pi * r^2 pixels.
        assert!((1200..=1320).contains(&cleared), "cleared {}", cleared);
        assert_eq!(surface.alpha(50, 50), Some(0));
        assert_eq!(surface.alpha(50, 75), Some(0xff));
        assert!((surface.revealed_percent() - cleared as f64 / 100.0).abs() < 1e-9);

        // Clearing the same spot again changes nothing.
        assert_eq!(surface.clear_circle(50.0, 50.0, 20.0), 0);
    }

    #[test]
    fn test_clear_near_edges_stays_in_bounds() {
        let mut surface = Surface::new(30, 30).unwrap();
        assert!(surface.clear_circle(0.0, 0.0, 20.0) > 0);
        assert!(surface.clear_circle(29.9, 29.9, 20.0) > 0);
        assert_eq!(surface.clear_circle(-100.0, -100.0, 20.0), 0);
        assert_eq!(surface.clear_circle(f64::NAN, 3.0, 20.0), 0);

        surface.clear_circle(15.0, 15.0, 100.0);
        assert_eq!(surface.revealed_percent(), 100.0);
    }

    #[test]
    fn test_rejects_huge_surface() {
        assert!(matches!(
            Surface::new(100_000, 100_000),
            Err(RevealError::SurfaceTooLarge { .. })
        ));
    }

    #[test]
    fn test_render_ascii() {
        let mut surface = Surface::new(40, 20).unwrap();
        let covered = surface.render_ascii(8, 4);
        assert_eq!(covered.lines().count(), 4);
        assert!(covered.lines().all(|l| l == "########"));

        surface.clear_circle(20.0, 10.0, 100.0);
        let cleared = surface.render_ascii(8, 4);
        assert!(cleared.lines().all(|l| l.trim().is_empty()));
    }

    #[test]
    fn test_render_ascii_shows_captions() {
        let surface = painted(400, 200);
        let art = surface.render_ascii(60, 20);
        assert!(art.contains(HEADLINE));
        assert!(art.contains(SUBTITLE));
    }
}
