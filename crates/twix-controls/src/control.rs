//! Spring control: pipeline, drag mapping, preview and debounced commit.
//!
//! Event flow for one instance:
//! - drag events map to a new value and go through `on_change`
//! - `on_change` updates the display and recomputes the preview at once,
//!   then (re)schedules the commit
//! - `tick` fires due debounces: a resize recomputes the preview, a commit
//!   runs the pipeline update and starts the settle animation if it committed
//!
//! The host owns time. It calls `tick(now)` from its event loop, and may use
//! `next_deadline` to decide when to wake up. After `unmount` (or drop) no
//! pending commit or resize can fire.

use std::sync::Arc;

use tracing::{debug, trace};
use twix_core::Real;

use crate::animation::{AnimationDriver, SettleAnimation};
use crate::config::ControlConfig;
use crate::debounce::Debouncer;
use crate::drag::{DragEvent, DragMapper};
use crate::error::{ControlError, ControlResult};
use crate::pipeline::{Setter, UpdateOutcome, ValuePipeline};
use crate::plugin::PluginRegistry;
use crate::preview::{Surface, Theme, draw_trace, trace_points};
use crate::spring::{SPRING_KIND, SpringSettings, SpringValue};

pub type SpringRegistry = PluginRegistry<SpringValue, SpringSettings>;

/// What a `tick` did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// The canvas was resized and the preview recomputed.
    pub resized: bool,
    /// Outcome of the commit that fired, if one did.
    pub commit: Option<UpdateOutcome>,
}

/// One mounted spring control.
pub struct SpringControl<D: AnimationDriver> {
    pipeline: ValuePipeline<SpringValue, SpringSettings>,
    drag: DragMapper,
    commit: Debouncer<SpringValue>,
    resize: Debouncer<(u32, u32)>,
    config: ControlConfig,
    driver: D,
    canvas: (u32, u32),
    trace: Vec<(f32, f32)>,
    revision: u64,
    mounted: bool,
}

impl<D: AnimationDriver> SpringControl<D> {
    /// Mount a control on the committed `value`.
    ///
    /// # Errors
    ///
    /// Returns error if `config` is invalid.
    pub fn new(
        value: SpringValue,
        settings: SpringSettings,
        registry: Arc<SpringRegistry>,
        config: ControlConfig,
        driver: D,
        set: Setter<SpringValue>,
    ) -> ControlResult<Self> {
        config.validate()?;
        let pipeline = ValuePipeline::new(SPRING_KIND, value, settings, registry, set);
        let mut control = Self {
            pipeline,
            drag: DragMapper::new(config.drag_scale()),
            commit: Debouncer::new("commit", config.commit_debounce()?),
            resize: Debouncer::new("resize", config.resize_debounce()?),
            config,
            driver,
            canvas: (0, 0),
            trace: Vec::new(),
            revision: 0,
            mounted: true,
        };
        control.redraw();
        Ok(control)
    }

    /// Set the canvas size immediately, without debouncing.
    pub fn with_canvas(mut self, width: u32, height: u32) -> Self {
        self.canvas = (width, height);
        self.redraw();
        self
    }

    pub fn displayed_value(&self) -> &SpringValue {
        self.pipeline.displayed_value()
    }

    pub fn last_correct_value(&self) -> &SpringValue {
        self.pipeline.last_correct_value()
    }

    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn drag(&self) -> &DragMapper {
        &self.drag
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        self.canvas
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Current preview trace.
    pub fn trace(&self) -> &[(f32, f32)] {
        &self.trace
    }

    /// Bumped every time the preview is recomputed.
    pub fn preview_revision(&self) -> u64 {
        self.revision
    }

    pub fn commit_pending(&self) -> bool {
        self.commit.is_pending()
    }

    /// Earliest time at which `tick` has work to do.
    pub fn next_deadline(&self) -> Option<Real> {
        match (self.commit.due_time(), self.resize.due_time()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Show an in-progress value and schedule its commit.
    pub fn on_change(&mut self, value: SpringValue, now: Real) -> ControlResult<()> {
        self.ensure_mounted()?;
        self.pipeline.on_change(value);
        self.redraw();
        self.commit.call(now, value);
        Ok(())
    }

    /// Feed a drag gesture event.
    pub fn on_drag(&mut self, event: DragEvent, now: Real) -> ControlResult<()> {
        self.ensure_mounted()?;
        let current = *self.pipeline.displayed_value();
        if let Some(value) = self.drag.handle(event, &current) {
            self.on_change(value, now)?;
        }
        Ok(())
    }

    /// Commit a value right away, e.g. from typed coordinate input.
    ///
    /// Any edit still waiting on the commit debounce is older than `value`
    /// and is dropped.
    pub fn on_update(&mut self, value: SpringValue) -> ControlResult<UpdateOutcome> {
        self.ensure_mounted()?;
        self.commit.cancel();
        Ok(self.update(value))
    }

    /// Environment resize notification; applied after the resize debounce.
    ///
    /// Repeating the size already requested does not push the deadline out.
    pub fn on_resize(&mut self, width: u32, height: u32, now: Real) -> ControlResult<()> {
        self.ensure_mounted()?;
        let requested = self.resize.pending_args().copied().unwrap_or(self.canvas);
        if requested != (width, height) {
            self.resize.call(now, (width, height));
        }
        Ok(())
    }

    /// Reconcile with the externally owned value.
    ///
    /// An adopted value also supersedes any edit still waiting to commit.
    pub fn sync_external(&mut self, value: &SpringValue) -> bool {
        if !self.mounted || !self.pipeline.sync_external(value) {
            return false;
        }
        self.commit.cancel();
        self.redraw();
        true
    }

    /// Fire due debounces.
    pub fn tick(&mut self, now: Real) -> TickReport {
        let mut report = TickReport::default();
        if !self.mounted {
            return report;
        }
        if let Some((w, h)) = self.resize.poll(now) {
            self.canvas = (w, h);
            self.redraw();
            report.resized = true;
        }
        if let Some(value) = self.commit.poll(now) {
            report.commit = Some(self.update(value));
        }
        report
    }

    /// Stroke the current trace onto `surface`.
    pub fn draw(&self, surface: &mut dyn Surface, theme: &dyn Theme) {
        draw_trace(surface, theme, &self.trace, &self.config.stroke_color);
    }

    /// Cancel pending work and detach. Idempotent.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.commit.cancel();
        self.resize.cancel();
        self.drag.end();
        self.mounted = false;
        debug!("spring control unmounted");
    }

    fn update(&mut self, value: SpringValue) -> UpdateOutcome {
        let before = *self.pipeline.displayed_value();
        let outcome = self.pipeline.on_update(&value);
        if outcome.is_committed() {
            let params = self.pipeline.last_correct_value().params();
            self.driver.start(SettleAnimation::on_commit(params));
        }
        if *self.pipeline.displayed_value() != before {
            self.redraw();
        }
        outcome
    }

    fn redraw(&mut self) {
        let (w, h) = self.canvas;
        let curve = self.pipeline.displayed_value().curve();
        self.trace = trace_points(&curve, w, h, self.config.preview_time_scale);
        self.revision += 1;
        trace!(revision = self.revision, width = w, height = h, "preview recomputed");
    }

    fn ensure_mounted(&self) -> ControlResult<()> {
        if self.mounted {
            Ok(())
        } else {
            Err(ControlError::Unmounted)
        }
    }
}

impl<D: AnimationDriver> Drop for SpringControl<D> {
    fn drop(&mut self) {
        self.unmount();
    }
}
