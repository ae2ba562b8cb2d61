//! [`RouteVerifier`] – delivery safety interlock.
//!
//! Before a drone flies to a delivery, the target passes through
//! [`RouteVerifier::verify`].  Every registered [`Rule`] is evaluated in
//! order; the first violation returns a [`FleetError::OutOfBounds`] and the
//! delivery is **not** flown.
//!
//! One built-in rule is provided:
//! - [`RadiusRule`] – rejects targets outside the operational radius of the
//!   distribution centre, with the axis semantics selected by [`RadiusMode`].

use dronedrop_types::Pose;
use serde::{Deserialize, Serialize};

use crate::error::FleetError;

// ────────────────────────────────────────────────────────────────────────────
// Rule trait
// ────────────────────────────────────────────────────────────────────────────

/// A single constraint a delivery target must satisfy.
pub trait Rule: Send + Sync {
    /// Human-readable name used in logs.
    fn name(&self) -> &str;

    /// Return `Ok(())` when `target` is acceptable for the drone `code`.
    fn check(&self, code: &str, target: &Pose) -> Result<(), FleetError>;
}

// ────────────────────────────────────────────────────────────────────────────
// RouteVerifier
// ────────────────────────────────────────────────────────────────────────────

/// Rule engine run against every delivery target.
///
/// # Example
///
/// ```
/// use dronedrop_fleet::verifier::{RadiusMode, RadiusRule, RouteVerifier};
/// use dronedrop_types::{Heading, Pose};
///
/// let verifier = RouteVerifier::new().with_rule(RadiusRule::new(10, RadiusMode::Either));
///
/// assert!(verifier.verify("01", &Pose::new(3, -4, Heading::North)).is_ok());
/// assert!(verifier.verify("01", &Pose::new(11, 12, Heading::North)).is_err());
/// ```
#[derive(Default)]
pub struct RouteVerifier {
    rules: Vec<Box<dyn Rule>>,
}

impl RouteVerifier {
    /// Create an empty verifier that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule.  Rules are evaluated in insertion order.
    pub fn add_rule(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    /// Builder-style [`add_rule`][Self::add_rule].
    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.add_rule(Box::new(rule));
        self
    }

    /// Names of the registered rules, in evaluation order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Validate `target` against every registered rule, returning the first
    /// violation.
    pub fn verify(&self, code: &str, target: &Pose) -> Result<(), FleetError> {
        for rule in &self.rules {
            rule.check(code, target)?;
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// RadiusRule
// ────────────────────────────────────────────────────────────────────────────

/// How the two axis checks of [`RadiusRule`] combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RadiusMode {
    /// Accept when `|x| <= radius` **or** `|y| <= radius`.  A target is only
    /// rejected when both axes are out of range.  Matches the legacy tool.
    #[default]
    Either,
    /// Accept only when both `|x|` and `|y|` are within the radius.
    Both,
}

/// Rejects targets too far from the distribution centre.
#[derive(Debug, Clone, Copy)]
pub struct RadiusRule {
    /// Maximum distance per axis, in grid cells.
    pub radius: u32,
    pub mode: RadiusMode,
}

impl RadiusRule {
    pub fn new(radius: u32, mode: RadiusMode) -> Self {
        Self { radius, mode }
    }

    /// `true` when `target` is inside the operational area.
    pub fn contains(&self, target: &Pose) -> bool {
        let x_ok = target.x.unsigned_abs() <= self.radius;
        let y_ok = target.y.unsigned_abs() <= self.radius;
        match self.mode {
            RadiusMode::Either => x_ok || y_ok,
            RadiusMode::Both => x_ok && y_ok,
        }
    }
}

impl Rule for RadiusRule {
    fn name(&self) -> &str {
        "operational_radius"
    }

    fn check(&self, code: &str, target: &Pose) -> Result<(), FleetError> {
        if self.contains(target) {
            Ok(())
        } else {
            Err(FleetError::OutOfBounds {
                code: code.to_string(),
                target: *target,
                radius: self.radius,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dronedrop_types::Heading;

    fn at(x: i32, y: i32) -> Pose {
        Pose::new(x, y, Heading::North)
    }

    #[test]
    fn empty_verifier_accepts_anything() {
        let v = RouteVerifier::new();
        assert!(v.verify("01", &at(i32::MAX, i32::MIN)).is_ok());
    }

    #[test]
    fn either_mode_accepts_edge_of_radius() {
        let rule = RadiusRule::new(10, RadiusMode::Either);
        assert!(rule.contains(&at(10, -10)));
        assert!(rule.contains(&at(-10, 0)));
    }

    #[test]
    fn either_mode_accepts_one_axis_out_of_range() {
        let rule = RadiusRule::new(10, RadiusMode::Either);
        assert!(rule.contains(&at(50, 3)));
        assert!(rule.contains(&at(0, -11)));
    }

    #[test]
    fn either_mode_rejects_both_axes_out_of_range() {
        let rule = RadiusRule::new(10, RadiusMode::Either);
        assert!(!rule.contains(&at(11, -11)));
    }

    #[test]
    fn both_mode_rejects_any_axis_out_of_range() {
        let rule = RadiusRule::new(10, RadiusMode::Both);
        assert!(rule.contains(&at(10, 10)));
        assert!(!rule.contains(&at(11, 0)));
        assert!(!rule.contains(&at(0, -11)));
    }

    #[test]
    fn violation_names_drone_and_target() {
        let v = RouteVerifier::new().with_rule(RadiusRule::new(5, RadiusMode::Either));
        let err = v.verify("07", &at(6, 6)).unwrap_err();
        match &err {
            FleetError::OutOfBounds {
                code,
                target,
                radius,
            } => {
                assert_eq!(code, "07");
                assert_eq!(*target, at(6, 6));
                assert_eq!(*radius, 5);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("07"));
    }

    #[test]
    fn rules_run_in_insertion_order() {
        let v = RouteVerifier::new()
            .with_rule(RadiusRule::new(100, RadiusMode::Both))
            .with_rule(RadiusRule::new(1, RadiusMode::Both));
        assert_eq!(v.rule_names(), vec!["operational_radius", "operational_radius"]);
        let err = v.verify("01", &at(2, 0)).unwrap_err();
        assert!(matches!(err, FleetError::OutOfBounds { radius: 1, .. }));
    }
}
