use super::{RenderTarget, Rgb};
use std::io::Write;

/// Logical height of the surface regardless of terminal size. The show's
/// launch speeds are tuned against it.
pub const LOGICAL_HEIGHT: f32 = 800.0;

const GLOW_STRENGTH: f32 = 0.35;

/// True-colour terminal surface drawn with `▄` half-blocks, two pixels per
/// cell (top pixel in the background colour, bottom pixel in the foreground).
pub struct HalfBlockCanvas {
    width: usize,
    height: usize,
    // logical units per pixel
    scale: f32,
    pixels: Vec<[f32; 3]>,
    output_buf: Vec<u8>,
}

impl HalfBlockCanvas {
    pub fn new(cols: usize, rows: usize, background: Rgb) -> Self {
        let mut canvas = Self {
            width: 0,
            height: 0,
            scale: 1.0,
            pixels: Vec::new(),
            output_buf: Vec::new(),
        };
        canvas.resize(cols, rows, background);
        canvas
    }

    /// Match a new terminal size. Previous content is discarded.
    pub fn resize(&mut self, cols: usize, rows: usize, background: Rgb) {
        self.width = cols;
        self.height = rows * 2;
        self.scale = if self.height > 0 {
            LOGICAL_HEIGHT / self.height as f32
        } else {
            1.0
        };
        self.pixels = vec![to_float(background); self.width * self.height];
        self.output_buf = Vec::with_capacity(self.width * self.height * 25);
    }

    /// Pixel grid size.
    pub fn pixel_size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(to_rgb(self.pixels[y * self.width + x]))
        } else {
            None
        }
    }

    fn blend(&mut self, px: isize, py: isize, color: [f32; 3], alpha: f32) {
        if px < 0 || py < 0 || px >= self.width as isize || py >= self.height as isize {
            return;
        }
        let a = alpha.clamp(0.0, 1.0);
        let p = &mut self.pixels[py as usize * self.width + px as usize];
        for (dst, src) in p.iter_mut().zip(color) {
            *dst = *dst * (1.0 - a) + src * a;
        }
    }

    fn fill_disc(&mut self, cx: f32, cy: f32, radius: f32, color: [f32; 3], alpha: f32) {
        let r = radius.max(0.5);
        let x0 = (cx - r).floor() as isize;
        let x1 = (cx + r).ceil() as isize;
        let y0 = (cy - r).floor() as isize;
        let y1 = (cy + r).ceil() as isize;

        let mut hit = false;
        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r * r {
                    self.blend(px, py, color, alpha);
                    hit = true;
                }
            }
        }
        // Sub-pixel discs still light the pixel they sit in
        if !hit {
            self.blend(cx.floor() as isize, cy.floor() as isize, color, alpha);
        }
    }

    /// Write the frame to `out`, emitting colour escapes only on change.
    pub fn present(&mut self, out: &mut impl Write) -> std::io::Result<()> {
        self.output_buf.clear();
        self.output_buf.extend_from_slice(b"\x1b[H");

        let mut prev_top: Option<Rgb> = None;
        let mut prev_bot: Option<Rgb> = None;

        for y in (0..self.height).step_by(2) {
            for x in 0..self.width {
                let top_idx = y * self.width + x;
                let bot_idx = if y + 1 < self.height {
                    (y + 1) * self.width + x
                } else {
                    top_idx
                };
                let top = to_rgb(self.pixels[top_idx]);
                let bot = to_rgb(self.pixels[bot_idx]);

                if prev_top != Some(top) {
                    write!(self.output_buf, "\x1b[48;2;{};{};{}m", top.0, top.1, top.2)?;
                    prev_top = Some(top);
                }
                if prev_bot != Some(bot) {
                    write!(self.output_buf, "\x1b[38;2;{};{};{}m", bot.0, bot.1, bot.2)?;
                    prev_bot = Some(bot);
                }

                self.output_buf.extend_from_slice("▄".as_bytes());
            }
            self.output_buf.extend_from_slice(b"\x1b[0m");
            prev_top = None;
            prev_bot = None;
            if y + 2 < self.height {
                self.output_buf.extend_from_slice(b"\r\n");
            }
        }

        out.write_all(&self.output_buf)?;
        out.flush()
    }
}

impl RenderTarget for HalfBlockCanvas {
    fn dimensions(&self) -> (f32, f32) {
        (
            self.width as f32 * self.scale,
            self.height as f32 * self.scale,
        )
    }

    fn clear_or_fade(&mut self, color: Rgb, alpha: f32) {
        let bg = to_float(color);
        let a = alpha.clamp(0.0, 1.0);
        for p in &mut self.pixels {
            for (dst, src) in p.iter_mut().zip(bg) {
                *dst += (src - *dst) * a;
            }
        }
    }

    fn draw_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgb, alpha: f32, glow: bool) {
        let (cx, cy) = (x / self.scale, y / self.scale);
        let r = radius / self.scale;
        let c = to_float(color);

        if glow {
            self.fill_disc(cx, cy, r + 1.0, c, alpha * GLOW_STRENGTH);
        }
        self.fill_disc(cx, cy, r, c, alpha);
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Rgb) {
        let (ax, ay) = (x1 / self.scale, y1 / self.scale);
        let (bx, by) = (x2 / self.scale, y2 / self.scale);
        let steps = (bx - ax).abs().max((by - ay).abs()).ceil().max(1.0) as usize;
        let c = to_float(color);

        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let px = ax + (bx - ax) * t;
            let py = ay + (by - ay) * t;
            self.blend(px.floor() as isize, py.floor() as isize, c, 1.0);
        }
    }
}

fn to_float(color: Rgb) -> [f32; 3] {
    [color.0 as f32, color.1 as f32, color.2 as f32]
}

fn to_rgb(p: [f32; 3]) -> Rgb {
    Rgb(
        p[0].round().clamp(0.0, 255.0) as u8,
        p[1].round().clamp(0.0, 255.0) as u8,
        p[2].round().clamp(0.0, 255.0) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Rgb = Rgb(0, 0, 0);

    #[test]
    fn logical_height_is_fixed() {
        let canvas = HalfBlockCanvas::new(100, 40, BLACK);
        let (w, h) = canvas.dimensions();
        assert_eq!(canvas.pixel_size(), (100, 80));
        assert!((h - LOGICAL_HEIGHT).abs() < 1e-3);
        assert!((w - 1000.0).abs() < 1e-3);
    }

    #[test]
    fn zero_size_terminal_has_no_area() {
        let canvas = HalfBlockCanvas::new(0, 0, BLACK);
        let (w, h) = canvas.dimensions();
        assert_eq!(w * h, 0.0);
    }

    #[test]
    fn fade_converges_to_background() {
        let mut canvas = HalfBlockCanvas::new(10, 5, BLACK);
        canvas.draw_circle(50.0, 50.0, 30.0, Rgb(255, 255, 255), 1.0, false);
        assert_ne!(canvas.pixel(0, 0), Some(BLACK));
        for _ in 0..60 {
            canvas.clear_or_fade(BLACK, 0.25);
        }
        assert_eq!(canvas.pixel(0, 0), Some(BLACK));
    }

    #[test]
    fn tiny_circle_lights_one_pixel() {
        let mut canvas = HalfBlockCanvas::new(20, 10, BLACK);
        // scale is 40 units per pixel here
        canvas.draw_circle(100.0, 100.0, 1.5, Rgb(200, 0, 0), 1.0, false);
        assert_eq!(canvas.pixel(2, 2), Some(Rgb(200, 0, 0)));
        assert_eq!(canvas.pixel(5, 5), Some(BLACK));
    }

    #[test]
    fn half_alpha_blends_each_channel() {
        let mut canvas = HalfBlockCanvas::new(20, 10, Rgb(0, 0, 100));
        canvas.draw_circle(100.0, 100.0, 1.5, Rgb(200, 100, 50), 0.5, false);
        assert_eq!(canvas.pixel(2, 2), Some(Rgb(100, 50, 75)));
        canvas.clear_or_fade(Rgb(0, 0, 100), 0.5);
        assert_eq!(canvas.pixel(2, 2), Some(Rgb(50, 25, 88)));
    }

    #[test]
    fn glow_spills_onto_neighbours() {
        let mut canvas = HalfBlockCanvas::new(20, 10, BLACK);
        canvas.draw_circle(100.0, 100.0, 1.5, Rgb(200, 200, 200), 1.0, true);
        let neighbour = canvas.pixel(3, 2).unwrap();
        assert!(neighbour.0 > 0 && neighbour.0 < 200);
    }

    #[test]
    fn off_screen_drawing_is_ignored() {
        let mut canvas = HalfBlockCanvas::new(4, 2, BLACK);
        canvas.draw_circle(-500.0, -500.0, 3.0, Rgb(255, 0, 0), 1.0, true);
        canvas.draw_line(-100.0, 5000.0, -50.0, 6000.0, Rgb(255, 0, 0));
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(canvas.pixel(x, y), Some(BLACK));
            }
        }
    }

    #[test]
    fn present_writes_one_half_block_per_cell() {
        let mut canvas = HalfBlockCanvas::new(3, 2, Rgb(1, 2, 3));
        let mut out = Vec::new();
        canvas.present(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\x1b[H"));
        assert_eq!(text.matches('▄').count(), 6);
        assert!(text.contains("\x1b[48;2;1;2;3m"));
    }
}
