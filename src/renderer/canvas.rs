//! 2D canvas backend for the overlay

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{DrawCommand, css_rgba};

pub struct OverlayCanvas {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl OverlayCanvas {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    /// Match the backing store to the play area
    pub fn resize(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    pub fn draw(&self, commands: &[DrawCommand]) {
        for cmd in commands {
            match cmd {
                DrawCommand::Clear => {
                    self.ctx.clear_rect(
                        0.0,
                        0.0,
                        f64::from(self.canvas.width()),
                        f64::from(self.canvas.height()),
                    );
                }
                DrawCommand::StrokeRect {
                    min,
                    size,
                    color,
                    width,
                } => {
                    self.ctx.set_stroke_style_str(&css_rgba(*color));
                    self.ctx.set_line_width(f64::from(*width));
                    self.ctx.stroke_rect(
                        f64::from(min.x),
                        f64::from(min.y),
                        f64::from(size.x),
                        f64::from(size.y),
                    );
                }
                DrawCommand::Polyline {
                    points,
                    width,
                    color,
                } => {
                    let Some((first, rest)) = points.split_first() else {
                        continue;
                    };
                    self.ctx.begin_path();
                    self.ctx.set_line_width(f64::from(*width));
                    // Blocky beam
                    self.ctx.set_line_cap("square");
                    self.ctx.set_line_join("bevel");
                    self.ctx.set_stroke_style_str(&css_rgba(*color));
                    self.ctx.move_to(f64::from(first.x), f64::from(first.y));
                    for p in rest {
                        self.ctx.line_to(f64::from(p.x), f64::from(p.y));
                    }
                    self.ctx.stroke();
                }
            }
        }
    }
}
