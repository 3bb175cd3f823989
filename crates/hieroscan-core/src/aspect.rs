//! Aspect-ratio compatibility between an unknown shape and a prototype.

/// Decides whether two width/height ratios are close enough for their
/// shapes to be compared at all.
///
/// Near-square shapes get the tight `square_tolerance`; shapes whose
/// elongation `min(a, 1/a)` falls below `elongated_below` get the loose
/// `elongated_tolerance`. In between, the tolerance is interpolated
/// linearly.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AspectGate {
    pub square_tolerance: f64,
    pub elongated_tolerance: f64,
    pub elongated_below: f64,
}

impl Default for AspectGate {
    fn default() -> Self {
        Self {
            square_tolerance: 0.1,
            elongated_tolerance: 0.3,
            elongated_below: 0.3,
        }
    }
}

impl AspectGate {
    /// Relative tolerance for a shape with aspect ratio `aspect`.
    pub fn tolerance(&self, aspect: f64) -> f64 {
        let elongation = if aspect > 1.0 { 1.0 / aspect } else { aspect };
        if elongation < self.elongated_below || self.elongated_below >= 1.0 {
            return self.elongated_tolerance;
        }
        let t = (elongation - self.elongated_below) / (1.0 - self.elongated_below);
        self.elongated_tolerance + t * (self.square_tolerance - self.elongated_tolerance)
    }

    /// Is the prototype aspect `prototype` compatible with `aspect`?
    pub fn similar(&self, aspect: f64, prototype: f64) -> bool {
        if !(aspect.is_finite() && prototype.is_finite()) {
            return false;
        }
        (aspect - prototype).abs() <= self.tolerance(aspect) * aspect.max(prototype)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_bands() {
        let gate = AspectGate::default();
        assert!((gate.tolerance(1.0) - 0.1).abs() < 1e-12);
        assert!((gate.tolerance(0.2) - 0.3).abs() < 1e-12);
        assert!((gate.tolerance(5.0) - 0.3).abs() < 1e-12);
        // Halfway between 0.3 and 1.0.
        assert!((gate.tolerance(0.65) - 0.2).abs() < 1e-12);
        assert_eq!(gate.tolerance(0.5), gate.tolerance(2.0));
    }

    #[test]
    fn near_square_is_strict() {
        let gate = AspectGate::default();
        assert!(gate.similar(1.0, 1.0));
        assert!(gate.similar(1.0, 1.05));
        assert!(!gate.similar(1.0, 1.2));
    }

    #[test]
    fn elongated_is_lenient() {
        let gate = AspectGate::default();
        assert!(gate.similar(0.2, 0.25));
        assert!(!gate.similar(0.2, 0.4));
        assert!(!gate.similar(f64::INFINITY, 1.0));
    }

    #[test]
    fn tightening_never_admits_more() {
        let loose = AspectGate::default();
        let tight = AspectGate {
            square_tolerance: 0.05,
            elongated_tolerance: 0.15,
            ..loose
        };
        let prototypes: Vec<f64> = (1..60).map(|i| f64::from(i) * 0.05).collect();
        for aspect in [0.1, 0.3, 0.5, 0.9, 1.0, 1.7, 4.0] {
            let admitted = |gate: &AspectGate| {
                prototypes
                    .iter()
                    .filter(|p| gate.similar(aspect, **p))
                    .count()
            };
            assert!(admitted(&tight) <= admitted(&loose), "aspect {aspect}");
        }
    }
}
