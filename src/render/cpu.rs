use std::sync::Arc;

use vello_cpu::kurbo::Shape as _;

use crate::foundation::core::{Affine, RasterImage, Rect};
use crate::foundation::error::{FlipError, FlipResult};
use crate::render::plan::{DrawOp, ExportPlan};

/// Flattening tolerance for circle clips, in output pixels.
const CLIP_TOLERANCE: f64 = 0.1;

/// Executes an [`ExportPlan`] on the CPU and reads the result back as straight RGBA8.
#[derive(Debug, Default)]
pub struct CpuRasterizer;

impl CpuRasterizer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&mut self, plan: &ExportPlan) -> FlipResult<RasterImage> {
        let width: u16 = plan
            .canvas
            .width
            .try_into()
            .map_err(|_| FlipError::render("canvas width exceeds u16"))?;
        let height: u16 = plan
            .canvas
            .height
            .try_into()
            .map_err(|_| FlipError::render("canvas height exceeds u16"))?;

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        for op in &plan.ops {
            draw_op(&mut ctx, op)?;
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.render_to_pixmap(&mut pixmap);

        let mut rgba = pixmap.data_as_u8_slice().to_vec();
        unpremultiply_rgba8_in_place(&mut rgba);
        RasterImage::from_rgba8(plan.canvas.width, plan.canvas.height, rgba)
    }
}

fn draw_op(ctx: &mut vello_cpu::RenderContext, op: &DrawOp) -> FlipResult<()> {
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

    match op {
        DrawOp::FillRect { rect, rgba } => {
            let [r, g, b, a] = *rgba;
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            ctx.fill_rect(&rect_to_cpu(*rect));
            Ok(())
        }
        DrawOp::Image { image, transform } => {
            let paint = image_paint(image)?;
            let (w, h) = (f64::from(image.width()), f64::from(image.height()));
            with_transform(ctx, *transform, |ctx| {
                ctx.set_paint(paint);
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
            });
            Ok(())
        }
        DrawOp::CircleImage {
            image,
            center,
            diameter,
        } => {
            let paint = image_paint(image)?;
            let (w, h) = (f64::from(image.width()), f64::from(image.height()));
            // Cover-fit: the shorter side spans the diameter, the rest is clipped.
            let short = w.min(h);
            let scale = diameter / short;
            let transform = Affine::translate(center.to_vec2())
                * Affine::scale(scale)
                * Affine::translate((-w / 2.0, -h / 2.0));
            let clip = vello_cpu::kurbo::Circle::new((w / 2.0, h / 2.0), short / 2.0)
                .to_path(CLIP_TOLERANCE);
            with_transform(ctx, transform, |ctx| {
                ctx.set_paint(paint);
                ctx.fill_path(&clip);
            });
            Ok(())
        }
    }
}

/// Apply `transform` for the duration of `draw`, then return to identity so it
/// never leaks into later ops.
fn with_transform(
    ctx: &mut vello_cpu::RenderContext,
    transform: Affine,
    draw: impl FnOnce(&mut vello_cpu::RenderContext),
) {
    ctx.set_transform(affine_to_cpu(transform));
    draw(ctx);
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn image_paint(image: &RasterImage) -> FlipResult<vello_cpu::Image> {
    let pixmap = straight_rgba_to_pixmap(image)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn straight_rgba_to_pixmap(image: &RasterImage) -> FlipResult<vello_cpu::Pixmap> {
    let w: u16 = image
        .width()
        .try_into()
        .map_err(|_| FlipError::render("image width exceeds u16"))?;
    let h: u16 = image
        .height()
        .try_into()
        .map_err(|_| FlipError::render("image height exceeds u16"))?;

    let raw = image.as_rgba_image().as_raw();
    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(raw.len() / 4);
    for px in raw.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: premul(px[0], a),
            g: premul(px[1], a),
            b: premul(px[2], a),
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

fn premul(c: u8, a: u8) -> u8 {
    ((u16::from(c) * u16::from(a) + 127) / 255) as u8
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
