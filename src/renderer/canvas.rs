//! Canvas 2D backend
//!
//! Paints a [`Scene`] onto a `CanvasRenderingContext2d`. The context is scaled
//! once by the device pixel ratio so all coordinates stay logical.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::scene::{DrawCmd, Scene, TextAlign};

pub struct CanvasPainter {
    ctx: CanvasRenderingContext2d,
}

impl CanvasPainter {
    /// Grab the 2D context and size the backing store for `dpr`
    pub fn new(canvas: &HtmlCanvasElement, width: f32, height: f32, dpr: f64) -> Result<Self, JsValue> {
        canvas.set_width((width as f64 * dpr) as u32);
        canvas.set_height((height as f64 * dpr) as u32);

        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        ctx.scale(dpr, dpr)?;
        Ok(Self { ctx })
    }

    pub fn paint(&self, scene: &Scene) {
        let ctx = &self.ctx;
        let (w, h) = (scene.width as f64, scene.height as f64);

        ctx.clear_rect(0.0, 0.0, w, h);
        ctx.set_filter(if scene.inverted {
            "invert(1) hue-rotate(180deg)"
        } else {
            "none"
        });

        for cmd in &scene.cmds {
            match cmd {
                DrawCmd::Background { top, bottom } => {
                    let gradient = ctx.create_linear_gradient(0.0, 0.0, 0.0, h);
                    let _ = gradient.add_color_stop(0.0, top);
                    let _ = gradient.add_color_stop(1.0, bottom);
                    ctx.set_fill_style_canvas_gradient(&gradient);
                    ctx.fill_rect(0.0, 0.0, w, h);
                }
                DrawCmd::FillRect { rect, color } => {
                    ctx.set_fill_style_str(color);
                    ctx.fill_rect(
                        rect.pos.x as f64,
                        rect.pos.y as f64,
                        rect.size.x as f64,
                        rect.size.y as f64,
                    );
                }
                DrawCmd::StrokeRect { rect, color, width } => {
                    ctx.set_stroke_style_str(color);
                    ctx.set_line_width(*width as f64);
                    ctx.stroke_rect(
                        rect.pos.x as f64,
                        rect.pos.y as f64,
                        rect.size.x as f64,
                        rect.size.y as f64,
                    );
                }
                DrawCmd::Text {
                    text,
                    pos,
                    color,
                    font,
                    align,
                } => {
                    ctx.set_fill_style_str(color);
                    ctx.set_font(font);
                    ctx.set_text_align(match align {
                        TextAlign::Left => "left",
                        TextAlign::Center => "center",
                    });
                    ctx.set_text_baseline("middle");
                    let _ = ctx.fill_text(text, pos.x as f64, pos.y as f64);
                }
                DrawCmd::Bubble { text, pos, alpha } => self.bubble(text, pos.x, pos.y, *alpha),
            }
        }

        ctx.set_global_alpha(1.0);
    }

    fn bubble(&self, text: &str, x: f32, y: f32, alpha: f32) {
        let ctx = &self.ctx;
        ctx.set_font("11px monospace");
        let text_w = ctx
            .measure_text(text)
            .map(|m| m.width())
            .unwrap_or(text.len() as f64 * 6.5);
        let (bw, bh) = (text_w + 12.0, 18.0);
        let (bx, by) = (x as f64 - bw / 2.0, y as f64 - bh);

        ctx.set_global_alpha(alpha.clamp(0.0, 1.0) as f64);
        ctx.set_fill_style_str("#ffffff");
        ctx.fill_rect(bx, by, bw, bh);
        ctx.set_stroke_style_str("#0b2340");
        ctx.set_line_width(1.0);
        ctx.stroke_rect(bx, by, bw, bh);
        ctx.set_fill_style_str("#0b2340");
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        let _ = ctx.fill_text(text, x as f64, by + bh / 2.0);
        ctx.set_global_alpha(1.0);
    }
}
