use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;

/// Convert a 10-point score to the 4-point scale.
///
/// Lower bounds are inclusive and the highest matching step wins. Inputs are
/// assumed to already be in [0, 10]; range checks happen at write time.
pub fn convert_10_to_4_scale(score: f64) -> f64 {
    if score >= 8.5 {
        4.0
    } else if score >= 8.0 {
        3.5
    } else if score >= 7.0 {
        3.0
    } else if score >= 6.5 {
        2.5
    } else if score >= 5.5 {
        2.0
    } else if score >= 5.0 {
        1.5
    } else if score >= 4.0 {
        1.0
    } else {
        0.0
    }
}

/// Academic performance label derived from a 10-point GPA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ToSchema)]
pub enum Classification {
    Weak,
    Average,
    Fair,
    Good,
    Excellent,
}

impl Classification {
    /// Fixed category order used by report histograms.
    pub const ALL: [Classification; 5] = [
        Classification::Weak,
        Classification::Average,
        Classification::Fair,
        Classification::Good,
        Classification::Excellent,
    ];

    pub fn from_gpa_10(gpa: f64) -> Self {
        if gpa >= 9.0 {
            Classification::Excellent
        } else if gpa >= 8.0 {
            Classification::Good
        } else if gpa >= 6.5 {
            Classification::Fair
        } else if gpa >= 5.0 {
            Classification::Average
        } else {
            Classification::Weak
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Classification::Weak => "Weak",
            Classification::Average => "Average",
            Classification::Fair => "Fair",
            Classification::Good => "Good",
            Classification::Excellent => "Excellent",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Credit-weighted grade point averages on both scales.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Gpa {
    pub gpa_10: f64,
    pub gpa_4: f64,
}

/// Aggregate (score, credits) pairs of one student into a GPA.
///
/// An empty input, and therefore zero total credits, yields (0.0, 0.0)
/// rather than an error.
pub fn weighted_gpa(pairs: &[(f64, i32)]) -> Gpa {
    let total_credits: i32 = pairs.iter().map(|(_, credits)| credits).sum();
    if total_credits == 0 {
        return Gpa {
            gpa_10: 0.0,
            gpa_4: 0.0,
        };
    }

    let sum_10: f64 = pairs
        .iter()
        .map(|(score, credits)| score * f64::from(*credits))
        .sum();
    let sum_4: f64 = pairs
        .iter()
        .map(|(score, credits)| convert_10_to_4_scale(*score) * f64::from(*credits))
        .sum();

    let total = f64::from(total_credits);
    Gpa {
        gpa_10: sum_10 / total,
        gpa_4: sum_4 / total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_step_values() {
        assert_eq!(convert_10_to_4_scale(10.0), 4.0);
        assert_eq!(convert_10_to_4_scale(8.5), 4.0);
        assert_eq!(convert_10_to_4_scale(8.0), 3.5);
        assert_eq!(convert_10_to_4_scale(7.0), 3.0);
        assert_eq!(convert_10_to_4_scale(6.5), 2.5);
        assert_eq!(convert_10_to_4_scale(5.5), 2.0);
        assert_eq!(convert_10_to_4_scale(5.0), 1.5);
        assert_eq!(convert_10_to_4_scale(4.0), 1.0);
        assert_eq!(convert_10_to_4_scale(0.0), 0.0);
    }

    #[test]
    fn conversion_boundaries_are_inclusive_lower_bounds() {
        assert_eq!(convert_10_to_4_scale(8.49999), 3.5);
        assert_eq!(convert_10_to_4_scale(7.99999), 3.0);
        assert_eq!(convert_10_to_4_scale(6.49999), 2.0);
        assert_eq!(convert_10_to_4_scale(4.99999), 1.0);
        assert_eq!(convert_10_to_4_scale(3.99), 0.0);
    }

    #[test]
    fn conversion_is_monotonic() {
        let mut previous = convert_10_to_4_scale(0.0);
        let mut score = 0.0;
        while score <= 10.0 {
            let converted = convert_10_to_4_scale(score);
            assert!(converted >= previous, "not monotonic at score {}", score);
            previous = converted;
            score += 0.01;
        }
    }

    #[test]
    fn conversion_codomain_is_the_eight_grade_points() {
        let expected = [0.0, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0];
        let mut score = 0.0;
        while score <= 10.0 {
            let converted = convert_10_to_4_scale(score);
            assert!(
                expected.contains(&converted),
                "unexpected grade point {} for score {}",
                converted,
                score
            );
            score += 0.05;
        }
    }

    #[test]
    fn classification_boundaries() {
        assert_eq!(Classification::from_gpa_10(9.0), Classification::Excellent);
        assert_eq!(Classification::from_gpa_10(8.999), Classification::Good);
        assert_eq!(Classification::from_gpa_10(8.0), Classification::Good);
        assert_eq!(Classification::from_gpa_10(6.5), Classification::Fair);
        assert_eq!(Classification::from_gpa_10(5.0), Classification::Average);
        assert_eq!(Classification::from_gpa_10(4.999), Classification::Weak);
        assert_eq!(Classification::from_gpa_10(0.0), Classification::Weak);
    }

    #[test]
    fn classification_order_is_fixed() {
        assert_eq!(
            Classification::ALL,
            [
                Classification::Weak,
                Classification::Average,
                Classification::Fair,
                Classification::Good,
                Classification::Excellent,
            ]
        );
    }

    #[test]
    fn empty_input_yields_zero_gpa() {
        let gpa = weighted_gpa(&[]);
        assert_eq!(gpa.gpa_10, 0.0);
        assert_eq!(gpa.gpa_4, 0.0);
    }

    #[test]
    fn weighted_gpa_weights_by_credits() {
        let gpa = weighted_gpa(&[(10.0, 3), (0.0, 1)]);
        assert_eq!(gpa.gpa_10, 7.5);
        assert_eq!(gpa.gpa_4, 3.0);
    }

    #[test]
    fn weighted_gpa_is_order_invariant() {
        let forward = weighted_gpa(&[(8.2, 2), (6.0, 4), (9.5, 3)]);
        let reversed = weighted_gpa(&[(9.5, 3), (6.0, 4), (8.2, 2)]);
        assert!((forward.gpa_10 - reversed.gpa_10).abs() < 1e-12);
        assert!((forward.gpa_4 - reversed.gpa_4).abs() < 1e-12);
    }
}
