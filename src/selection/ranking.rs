use tracing::warn;

use super::eligibility::is_eligible;
use crate::target::Target;
use crate::types::Visitor;

/// An eligible target with its validated value and cap.
/// Borrows the target so ranking never clones the catalog.
#[derive(Debug, Clone)]
pub struct RankedTarget<'a> {
    pub target: &'a Target,
    pub value: f64,
    pub cap: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Ranking<'a> {
    /// Value descending; equal values keep their input order.
    pub ranked: Vec<RankedTarget<'a>>,
    pub considered: usize,
    /// Eligible targets dropped because their value or cap did not validate.
    pub invalid: usize,
}

impl<'a> Ranking<'a> {
    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RankedTarget<'a>> {
        self.ranked.iter()
    }

    pub fn ids(&self) -> Vec<&'a str> {
        self.ranked.iter().map(|r| r.target.id.as_str()).collect()
    }
}

pub fn rank<'a>(targets: &'a [Target], visitor: &Visitor) -> Ranking<'a> {
    let mut invalid = 0;

    // 1. Eligibility + validation
    let mut ranked: Vec<RankedTarget<'a>> = targets
        .iter()
        .filter(|target| is_eligible(target, visitor))
        .filter_map(|target| {
            let validated = target
                .decimal_value()
                .and_then(|value| target.daily_cap().map(|cap| (value, cap)));
            match validated {
                Ok((value, cap)) => Some(RankedTarget { target, value, cap }),
                Err(err) => {
                    warn!(target_id = %target.id, error = %err, "excluding misconfigured target");
                    invalid += 1;
                    None
                }
            }
        })
        .collect();

    // 2. Ordering: value descending. sort_by is stable, so ties keep input order.
    ranked.sort_by(|a, b| b.value.total_cmp(&a.value));

    debug_assert!(ranked.windows(2).all(|w| w[0].value >= w[1].value));

    Ranking {
        ranked,
        considered: targets.len(),
        invalid,
    }
}
