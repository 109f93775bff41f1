use crate::target::Target;
use crate::types::Visitor;

/// A target accepts a visitor iff both the visitor's geo state and its UTC
/// hour code are listed in the target's rules.
pub fn is_eligible(target: &Target, visitor: &Visitor) -> bool {
    target.accept.geo_state.contains(&visitor.geo_state)
        && target.accept.hour.contains(&visitor.hour_code())
}
