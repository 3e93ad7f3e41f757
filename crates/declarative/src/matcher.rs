//! Value matching - is an observed value one of the accepted values

use crate::value::Value;

/// Check whether `is` equals any of the accepted `should` values.
///
/// An empty accepted list never matches; callers treat an empty list as
/// "not managed" before getting here.
pub fn matches_any(is: &Value, should: &[Value]) -> bool {
    should.iter().any(|candidate| candidate == is)
}
