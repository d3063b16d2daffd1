//! Spring control value and its built-in plugin.

use serde::{Deserialize, Serialize};
use twix_core::{Real, round_to};

use crate::oscillator::{DEFAULT_MASS, SpringCurve, SpringParams};
use crate::plugin::{Plugin, PluginRegistry};

/// Control type tag for spring controls.
pub const SPRING_KIND: &str = "spring";

/// Value edited by a spring control.
///
/// `mass` is optional; an absent mass evaluates as `DEFAULT_MASS`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringValue {
    pub tension: Real,
    pub friction: Real,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mass: Option<Real>,
}

impl SpringValue {
    pub fn new(tension: Real, friction: Real) -> Self {
        Self {
            tension,
            friction,
            mass: None,
        }
    }

    pub fn with_mass(mut self, mass: Real) -> Self {
        self.mass = Some(mass);
        self
    }

    pub fn with_tension(mut self, tension: Real) -> Self {
        self.tension = tension;
        self
    }

    pub fn with_friction(mut self, friction: Real) -> Self {
        self.friction = friction;
        self
    }

    pub fn mass_or_default(&self) -> Real {
        self.mass.unwrap_or(DEFAULT_MASS)
    }

    /// Unchecked parameters; degenerate values are handled by the sampler.
    pub fn params(&self) -> SpringParams {
        SpringParams {
            tension: self.tension,
            friction: self.friction,
            mass: self.mass_or_default(),
        }
    }

    pub fn curve(&self) -> SpringCurve {
        self.params().curve()
    }

    /// Finite, positive tension, friction and mass.
    pub fn is_physical(&self) -> bool {
        SpringParams::new(self.tension, self.friction, self.mass_or_default()).is_ok()
    }
}

impl Default for SpringValue {
    fn default() -> Self {
        Self::new(170.0, 26.0)
    }
}

/// Settings passed through the spring plugin functions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringSettings {
    /// Decimal places kept by the sanitizer and formatter.
    pub precision: u32,
}

impl Default for SpringSettings {
    fn default() -> Self {
        Self { precision: 2 }
    }
}

fn round_value(value: &SpringValue, settings: &SpringSettings) -> SpringValue {
    SpringValue {
        tension: round_to(value.tension, settings.precision),
        friction: round_to(value.friction, settings.precision),
        mass: value.mass.map(|m| round_to(m, settings.precision)),
    }
}

/// The spring plugin: physical values only, mass filled in, rounded.
pub fn spring_plugin() -> Plugin<SpringValue, SpringSettings> {
    Plugin::new()
        .with_validator(|v: &SpringValue, _: &SpringSettings| v.is_physical())
        .with_sanitizer(|v: &SpringValue, s: &SpringSettings| {
            let filled = SpringValue {
                mass: Some(v.mass_or_default()),
                ..*v
            };
            round_value(&filled, s)
        })
        .with_formatter(round_value)
}

pub fn register_spring_plugin(registry: &mut PluginRegistry<SpringValue, SpringSettings>) {
    registry.register(SPRING_KIND, spring_plugin());
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn registry() -> PluginRegistry<SpringValue, SpringSettings> {
        let mut reg = PluginRegistry::new();
        register_spring_plugin(&mut reg);
        reg
    }

    #[test]
    fn validator_rejects_degenerate_parameters() {
        let reg = registry();
        let s = SpringSettings::default();
        assert!(reg.validate(SPRING_KIND, &SpringValue::new(200.0, 12.0), &s));
        assert!(!reg.validate(SPRING_KIND, &SpringValue::new(0.0, 12.0), &s));
        assert!(!reg.validate(SPRING_KIND, &SpringValue::new(200.0, -1.0), &s));
        assert!(!reg.validate(SPRING_KIND, &SpringValue::new(200.0, 12.0).with_mass(0.0), &s));
        assert!(!reg.validate(SPRING_KIND, &SpringValue::new(f64::NAN, 12.0), &s));
    }

    #[test]
    fn sanitizer_fills_mass_and_rounds() {
        let reg = registry();
        let out = reg.sanitize(
            SPRING_KIND,
            &SpringValue::new(180.004, 11.996),
            &SpringSettings::default(),
        );
        assert_eq!(out, SpringValue::new(180.0, 12.0).with_mass(1.0));
    }

    #[test]
    fn formatter_keeps_missing_mass() {
        let reg = registry();
        let out = reg.format(
            SPRING_KIND,
            &SpringValue::new(1.23456, 7.0),
            &SpringSettings { precision: 1 },
        );
        assert_eq!(out, SpringValue::new(1.2, 7.0));
    }

    #[test]
    fn value_serde_omits_missing_mass() {
        let yaml = serde_yaml::to_string(&SpringValue::new(200.0, 12.0)).unwrap();
        assert!(!yaml.contains("mass"));
        let back: SpringValue = serde_yaml::from_str("tension: 300\nfriction: 12\n").unwrap();
        assert_eq!(back, SpringValue::new(300.0, 12.0));
    }

    proptest! {
        #[test]
        fn sanitize_is_idempotent(
            tension in 0.01_f64..5000.0,
            friction in 0.01_f64..500.0,
            mass in prop::option::of(0.01_f64..50.0),
            precision in 0u32..5,
        ) {
            let reg = registry();
            let settings = SpringSettings { precision };
            let v = SpringValue { tension, friction, mass };
            prop_assume!(reg.validate(SPRING_KIND, &v, &settings));
            let once = reg.sanitize(SPRING_KIND, &v, &settings);
            let twice = reg.sanitize(SPRING_KIND, &once, &settings);
            prop_assert_eq!(once, twice);
        }
    }
}
