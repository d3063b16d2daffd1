//! Value binding engine for draggable spring tweak controls.
//!
//! A spring control edits `{tension, friction, mass}` by dragging over a
//! preview of the spring's step response. This crate holds everything except
//! the renderer and the gesture recognizer:
//!
//! - **plugin**: per-type sanitize/validate/format table with identity defaults
//! - **pipeline**: display value vs. last committed value, with rollback and
//!   redundant-commit suppression
//! - **debounce**: trailing-edge, cancellable, driven by caller time
//! - **oscillator**: closed-form damped harmonic oscillator sampler
//! - **drag**: axis-locked drag to tension/friction mapping
//! - **preview** / **animation**: trace sampling, drawing and settle descriptors
//! - **control**: the per-instance composition of all of the above
//!
//! # Design Principles
//!
//! - **No clocks**: every timed operation takes `now` in milliseconds
//! - **No feedback loops**: external values are adopted only when they differ
//!   from the last committed value
//! - **Quiet failures**: invalid edits roll back instead of erroring

pub mod animation;
pub mod config;
pub mod control;
pub mod debounce;
pub mod drag;
pub mod error;
pub mod oscillator;
pub mod pipeline;
pub mod plugin;
pub mod preview;
pub mod spring;

pub use animation::{AnimationDriver, Field, PreviewStyle, RecordingDriver, SettleAnimation};
pub use config::ControlConfig;
pub use control::{SpringControl, SpringRegistry, TickReport};
pub use debounce::{DebounceConfig, Debouncer};
pub use drag::{Axis, DragEvent, DragMapper, DragScale, DragState};
pub use error::{ControlError, ControlResult};
pub use oscillator::{Damping, SpringCurve, SpringParams, sample};
pub use pipeline::{Setter, UpdateOutcome, ValuePipeline};
pub use plugin::{Plugin, PluginRegistry};
pub use preview::{RecordingSurface, Rgba, StaticTheme, Surface, Theme};
pub use spring::{SPRING_KIND, SpringSettings, SpringValue, register_spring_plugin, spring_plugin};
