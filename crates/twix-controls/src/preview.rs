//! Preview trace of the spring response.
//!
//! The trace samples the step response once per pixel column at a fixed time
//! scale (ms per pixel). Displacement 0 sits on the bottom edge and the rest
//! displacement 1 at half height, leaving the upper half for overshoot.
//!
//! Drawing goes through the `Surface` and `Theme` seams so any renderer can
//! host the preview; `RecordingSurface` is the in-memory implementation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::trace;
use twix_core::Real;

use crate::oscillator::SpringCurve;

/// Milliseconds of simulated time per pixel column.
pub const PREVIEW_TIME_SCALE: Real = 8.0;

/// Semantic theme color used to stroke the trace.
pub const STROKE_COLOR_NAME: &str = "folder-border";

/// Stroke used when the theme has no entry for the requested name.
pub const FALLBACK_STROKE: Rgba = Rgba::new(0x60, 0x60, 0x60, 0xff);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Semantic color lookup.
pub trait Theme {
    fn color(&self, name: &str) -> Option<Rgba>;
}

/// Theme backed by a fixed name -> color table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticTheme {
    colors: HashMap<String, Rgba>,
}

impl StaticTheme {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, color: Rgba) -> Self {
        self.colors.insert(name.into(), color);
        self
    }
}

impl Theme for StaticTheme {
    fn color(&self, name: &str) -> Option<Rgba> {
        self.colors.get(name).copied()
    }
}

/// 2D drawing surface with integer pixel dimensions.
pub trait Surface {
    fn size(&self) -> (u32, u32);
    fn clear(&mut self);
    fn begin_path(&mut self);
    fn line_to(&mut self, x: f32, y: f32);
    fn stroke(&mut self, color: Rgba);
}

/// Compute trace points for a `width` x `height` canvas.
pub fn trace_points(curve: &SpringCurve, width: u32, height: u32, time_scale: Real) -> Vec<(f32, f32)> {
    let h = Real::from(height);
    (0..width)
        .map(|i| {
            let x = Real::from(i);
            let y = h - curve.at(x * time_scale) * h / 2.0;
            (x as f32, y as f32)
        })
        .collect()
}

/// Clear `surface` and stroke `points` with the theme color `color_name`.
pub fn draw_trace(surface: &mut dyn Surface, theme: &dyn Theme, points: &[(f32, f32)], color_name: &str) {
    surface.clear();
    surface.begin_path();
    for &(x, y) in points {
        surface.line_to(x, y);
    }
    let color = theme.color(color_name).unwrap_or(FALLBACK_STROKE);
    surface.stroke(color);
    trace!(points = points.len(), "preview stroked");
}

/// Sample and draw in one step at the surface's current size.
pub fn draw_preview(surface: &mut dyn Surface, theme: &dyn Theme, curve: &SpringCurve, time_scale: Real) {
    let (w, h) = surface.size();
    let points = trace_points(curve, w, h, time_scale);
    draw_trace(surface, theme, &points, STROKE_COLOR_NAME);
}

/// A recorded drawing call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawOp {
    Clear,
    BeginPath,
    LineTo(f32, f32),
    Stroke(Rgba),
}

/// Surface that records calls instead of rasterizing them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Points of the current path, i.e. since the last clear.
    pub fn path(&self) -> Vec<(f32, f32)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::LineTo(x, y) => Some((*x, *y)),
                _ => None,
            })
            .collect()
    }

    pub fn stroke_color(&self) -> Option<Rgba> {
        self.ops.iter().rev().find_map(|op| match op {
            DrawOp::Stroke(c) => Some(*c),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.ops.clear();
        self.ops.push(DrawOp::Clear);
    }

    fn begin_path(&mut self) {
        self.ops.push(DrawOp::BeginPath);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.ops.push(DrawOp::LineTo(x, y));
    }

    fn stroke(&mut self, color: Rgba) {
        self.ops.push(DrawOp::Stroke(color));
    }
}
