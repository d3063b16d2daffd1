//! egui adapters for the preview drawing seams.

use egui::{Color32, Painter, Pos2, Rect, Shape, Stroke, Visuals, vec2};
use twix_controls::{Rgba, Surface, Theme};

/// Draws into a rectangle of an egui painter, in rect-local pixels.
pub struct PainterSurface<'a> {
    painter: &'a Painter,
    rect: Rect,
    background: Color32,
    path: Vec<Pos2>,
}

impl<'a> PainterSurface<'a> {
    pub fn new(painter: &'a Painter, rect: Rect, background: Color32) -> Self {
        Self {
            painter,
            rect,
            background,
            path: Vec::new(),
        }
    }
}

impl Surface for PainterSurface<'_> {
    fn size(&self) -> (u32, u32) {
        (self.rect.width() as u32, self.rect.height() as u32)
    }

    fn clear(&mut self) {
        self.painter.rect_filled(self.rect, 2.0, self.background);
        self.path.clear();
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.path.push(self.rect.min + vec2(x, y));
    }

    fn stroke(&mut self, color: Rgba) {
        let path = std::mem::take(&mut self.path);
        if path.len() < 2 {
            return;
        }
        self.painter.add(Shape::line(path, Stroke::new(1.0, to_color32(color))));
    }
}

/// Semantic colors resolved from the active egui visuals.
pub struct VisualsTheme<'a> {
    visuals: &'a Visuals,
}

impl<'a> VisualsTheme<'a> {
    pub fn new(visuals: &'a Visuals) -> Self {
        Self { visuals }
    }
}

impl Theme for VisualsTheme<'_> {
    fn color(&self, name: &str) -> Option<Rgba> {
        let c = match name {
            "folder-border" => self.visuals.widgets.noninteractive.bg_stroke.color,
            "accent" => self.visuals.selection.bg_fill,
            "background" => self.visuals.extreme_bg_color,
            _ => return None,
        };
        Some(Rgba::new(c.r(), c.g(), c.b(), c.a()))
    }
}

pub fn to_color32(c: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
}
