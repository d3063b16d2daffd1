use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use egui::{Color32, Rect, Sense, vec2};
use tracing::warn;
use twix_controls::{
    ControlConfig, ControlResult, DragEvent, SpringControl, SpringRegistry, SpringSettings, SpringValue,
    register_spring_plugin,
};

use crate::driver::FrameDriver;
use crate::surface::{PainterSurface, VisualsTheme};

const CANVAS_HEIGHT: f32 = 80.0;
const INDICATOR_HEIGHT: f32 = 6.0;

pub struct TwixApp {
    /// Externally owned committed value, written by the control's `set`.
    store: Rc<RefCell<SpringValue>>,
    control: SpringControl<FrameDriver>,
    /// Cumulative drag offset for the current gesture.
    movement: egui::Vec2,
}

impl TwixApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> ControlResult<Self> {
        let mut registry = SpringRegistry::new();
        register_spring_plugin(&mut registry);

        let initial = SpringValue::default();
        let store = Rc::new(RefCell::new(initial));
        let sink = Rc::clone(&store);
        let control = SpringControl::new(
            initial,
            SpringSettings::default(),
            Arc::new(registry),
            ControlConfig::default(),
            FrameDriver::default(),
            Box::new(move |v: &SpringValue| *sink.borrow_mut() = *v),
        )?;

        Ok(Self {
            store,
            control,
            movement: egui::Vec2::ZERO,
        })
    }

    fn spring_canvas(&mut self, ui: &mut egui::Ui, now_ms: f64) {
        let width = ui.available_width();
        let (response, painter) = ui.allocate_painter(vec2(width, CANVAS_HEIGHT), Sense::drag());
        let rect = response.rect;

        let size = (rect.width() as u32, rect.height() as u32);
        if size != self.control.canvas_size() {
            report(self.control.on_resize(size.0, size.1, now_ms));
        }

        if response.drag_started() {
            self.movement = egui::Vec2::ZERO;
            report(self.control.on_drag(DragEvent::Start, now_ms));
        }
        if response.dragged() {
            self.movement += response.drag_delta();
            let event = DragEvent::Move {
                dx: f64::from(self.movement.x),
                dy: f64::from(self.movement.y),
            };
            report(self.control.on_drag(event, now_ms));
        }
        if response.drag_stopped() {
            report(self.control.on_drag(DragEvent::End, now_ms));
        }

        let visuals = ui.visuals();
        let theme = VisualsTheme::new(visuals);
        let mut surface = PainterSurface::new(&painter, rect, visuals.extreme_bg_color);
        self.control.draw(&mut surface, &theme);
    }

    fn indicator(&mut self, ui: &mut egui::Ui, now_ms: f64) {
        let width = ui.available_width();
        let (rect, _) = ui.allocate_exact_size(vec2(width, INDICATOR_HEIGHT), Sense::hover());
        let (style, animating) = self.control.driver_mut().style(now_ms);
        let bar = Rect::from_min_size(
            rect.min,
            vec2(rect.width() * style.scale_x as f32, rect.height()),
        );
        let accent = ui.visuals().selection.bg_fill;
        ui.painter()
            .rect_filled(bar, 1.0, accent.gamma_multiply(style.opacity as f32));
        if animating {
            ui.ctx().request_repaint();
        }
    }

    fn editors(&mut self, ui: &mut egui::Ui, now_ms: f64) {
        let mut value = *self.control.displayed_value();
        let mut mass = value.mass_or_default();
        let mut changed = false;
        let mut finished = false;
        ui.horizontal(|ui| {
            ui.label("spring");
            for (label, v) in [
                ("tension", &mut value.tension),
                ("friction", &mut value.friction),
                ("mass", &mut mass),
            ] {
                ui.label(label);
                let r = ui.add(egui::DragValue::new(v).speed(0.5));
                changed |= r.changed();
                finished |= r.drag_stopped() || r.lost_focus();
            }
        });
        if changed {
            value.mass = Some(mass);
            // keeps the edit on screen across frames; commits after the quiet window
            report(self.control.on_change(value, now_ms));
        }
        if finished {
            value.mass = Some(mass);
            report(self.control.on_update(value).map(|_| ()));
        }
    }
}

fn report<T>(result: ControlResult<T>) {
    if let Err(err) = result {
        warn!(%err, "spring control event dropped");
    }
}

impl eframe::App for TwixApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now_ms = ctx.input(|i| i.time) * 1000.0;

        // external owner -> control; a no-op for the control's own commits
        let external = *self.store.borrow();
        self.control.sync_external(&external);
        self.control.tick(now_ms);

        egui::CentralPanel::default().show(ctx, |ui| {
            self.spring_canvas(ui, now_ms);
            self.indicator(ui, now_ms);
            ui.add_space(8.0);
            self.editors(ui, now_ms);
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Reset").clicked() {
                    *self.store.borrow_mut() = SpringValue::default();
                }
                let committed = *self.store.borrow();
                ui.colored_label(
                    Color32::GRAY,
                    format!(
                        "committed: tension {:.2}, friction {:.2}",
                        committed.tension, committed.friction
                    ),
                );
            });
        });

        if let Some(deadline) = self.control.next_deadline() {
            let wait = ((deadline - now_ms).max(0.0) / 1000.0) as f32;
            ctx.request_repaint_after(Duration::from_secs_f32(wait));
        }
    }
}
