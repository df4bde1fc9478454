//! Search-space box.

use crate::error::PsoError;

/// Per-dimension `[lower, upper]` box, checked at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl Bounds {
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Result<Self, PsoError> {
        let invalid = |what: String| -> Result<Self, PsoError> {
            Err(PsoError::InvalidBounds { what })
        };

        if lower.is_empty() {
            return invalid("bounds must have at least one dimension".into());
        }
        if lower.len() != upper.len() {
            return invalid(format!(
                "lower has {} dimensions, upper has {}",
                lower.len(),
                upper.len()
            ));
        }
        for (i, (&lo, &hi)) in lower.iter().zip(&upper).enumerate() {
            if !lo.is_finite() || !hi.is_finite() {
                return invalid(format!("dimension {i} is not finite ({lo}, {hi})"));
            }
            if lo >= hi {
                return invalid(format!("dimension {i}: lower {lo} >= upper {hi}"));
            }
        }
        Ok(Self { lower, upper })
    }

    pub fn dim(&self) -> usize {
        self.lower.len()
    }

    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    pub fn width(&self, i: usize) -> f64 {
        self.upper[i] - self.lower[i]
    }

    pub fn clamp(&self, i: usize, value: f64) -> f64 {
        value.clamp(self.lower[i], self.upper[i])
    }

    pub fn contains(&self, point: &[f64]) -> bool {
        point.len() == self.dim()
            && point
                .iter()
                .enumerate()
                .all(|(i, &v)| self.lower[i] <= v && v <= self.upper[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_degenerate_boxes() {
        assert!(Bounds::new(vec![], vec![]).is_err());
        assert!(Bounds::new(vec![0.0], vec![1.0, 2.0]).is_err());
        assert!(Bounds::new(vec![1.0, 1.0], vec![1.0, 1.0]).is_err());
        assert!(Bounds::new(vec![2.0], vec![1.0]).is_err());
        assert!(Bounds::new(vec![f64::NAN], vec![1.0]).is_err());
        assert!(Bounds::new(vec![0.0], vec![f64::INFINITY]).is_err());
    }

    #[test]
    fn clamp_and_contains() {
        let b = Bounds::new(vec![0.0, -1.0], vec![1.0, 1.0]).unwrap();
        assert_eq!(b.dim(), 2);
        assert_eq!(b.width(1), 2.0);
        assert_eq!(b.clamp(0, 3.0), 1.0);
        assert!(b.contains(&[0.5, -1.0]));
        assert!(!b.contains(&[0.5, -1.5]));
        assert!(!b.contains(&[0.5]));
    }
}
