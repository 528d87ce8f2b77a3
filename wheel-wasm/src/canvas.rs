use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use wheel_core::ParticleSurface;

// Non-deprecated helpers to set canvas styles via property assignment.
pub fn set_fill_style(ctx: &CanvasRenderingContext2d, color: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str("fillStyle"),
        &JsValue::from_str(color),
    );
}

pub fn set_stroke_style(ctx: &CanvasRenderingContext2d, color: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str("strokeStyle"),
        &JsValue::from_str(color),
    );
}

/// The full-window confetti canvas.
#[derive(Clone)]
pub struct CanvasSurface {
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn size(&self) -> (f64, f64) {
        (self.canvas.width() as f64, self.canvas.height() as f64)
    }
}

impl ParticleSurface for CanvasSurface {
    fn clear(&mut self) {
        let (w, h) = self.size();
        self.ctx.clear_rect(0.0, 0.0, w, h);
    }

    fn fill_rotated_square(&mut self, x: f64, y: f64, size: f64, degrees: f64, color: &str) {
        let ctx = &self.ctx;
        ctx.save();
        let _ = ctx.translate(x, y);
        let _ = ctx.rotate(degrees.to_radians());
        set_fill_style(ctx, color);
        ctx.fill_rect(-size / 2.0, -size / 2.0, size, size);
        ctx.restore();
    }
}
