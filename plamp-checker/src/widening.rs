//! Implicit numeric widening
//!
//! A value may be widened into a type that represents every value of its
//! own type. Widening is the only conversion the checker inserts on its own;
//! everything else needs an explicit cast.

use plamp_parser::PlampType;

/// How two operand types meet in a binary operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Promotion {
    /// Both sides already have the same type
    Same,
    /// The left operand must be cast to the given type
    CastLeft(PlampType),
    /// The right operand must be cast to the given type
    CastRight(PlampType),
    /// Neither side widens into the other
    Incompatible,
}

/// How a value of one type fits a slot of another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignability {
    Exact,
    Widen,
    No,
}

/// Whether `from` widens implicitly into `to`
pub fn widens_to(from: &PlampType, to: &PlampType) -> bool {
    use PlampType::*;
    match from {
        Byte => matches!(to, Int | UInt | Long | ULong | Float | Double),
        Int => matches!(to, Long | Float | Double),
        UInt => matches!(to, Long | ULong | Float | Double),
        Long | ULong => matches!(to, Float | Double),
        Float => matches!(to, Double),
        _ => false,
    }
}

/// Find the common type of two numeric operands
pub fn promote(left: &PlampType, right: &PlampType) -> Promotion {
    if left == right {
        Promotion::Same
    } else if widens_to(left, right) {
        Promotion::CastLeft(right.clone())
    } else if widens_to(right, left) {
        Promotion::CastRight(left.clone())
    } else {
        Promotion::Incompatible
    }
}

/// Whether a value of type `value` can be stored in a slot of type `slot`
pub fn assignability(value: &PlampType, slot: &PlampType) -> Assignability {
    if value == slot || *slot == PlampType::Any {
        Assignability::Exact
    } else if *value == PlampType::Null && slot.is_nullable() {
        Assignability::Exact
    } else if is_untyped_array_of_rank(value, slot) {
        Assignability::Exact
    } else if widens_to(value, slot) {
        Assignability::Widen
    } else {
        Assignability::No
    }
}

/// `any[]` of the slot's rank, the type of `empty_array()`
fn is_untyped_array_of_rank(value: &PlampType, slot: &PlampType) -> bool {
    match (value, slot) {
        (PlampType::Array { element, rank }, PlampType::Array { rank: slot_rank, .. }) => {
            **element == PlampType::Any && rank == slot_rank
        }
        _ => false,
    }
}

/// Whether an explicit `(to) value` cast is allowed
pub fn can_cast(from: &PlampType, to: &PlampType) -> bool {
    let opaque = |t: &PlampType| matches!(t, PlampType::Any | PlampType::Named(_));
    if from == to || opaque(from) || opaque(to) {
        return true;
    }
    let char_or_integer = |t: &PlampType| *t == PlampType::Char || t.is_integer();
    (from.is_numeric() && to.is_numeric())
        || (char_or_integer(from) && char_or_integer(to))
        || (*from == PlampType::Null && to.is_nullable())
}
