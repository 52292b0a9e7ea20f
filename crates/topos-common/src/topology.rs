use std::fmt;

use serde::Serialize;

/// The topological invariants a TOPOS-Xi type may carry.
///
/// Every field is optional: an entity records only the invariants its
/// manifest (or space declaration) states, and checks fire only when both
/// sides of a comparison carry a value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TopologyBag {
    /// Additive under product.
    pub dimension: Option<i64>,
    /// Multiplicative under product.
    pub euler_characteristic: Option<i64>,
    /// Conjunctive under product.
    pub is_orientable: Option<bool>,
    /// Compared as an opaque token; `"0"` is the identity under product.
    pub fundamental_group: Option<String>,
}

impl TopologyBag {
    pub fn is_empty(&self) -> bool {
        self.dimension.is_none()
            && self.euler_characteristic.is_none()
            && self.is_orientable.is_none()
            && self.fundamental_group.is_none()
    }

    /// Combine two bags under the product-type algebra.
    ///
    /// Each invariant combines only when both operands carry it:
    /// dimensions add, Euler characteristics multiply, orientability is
    /// the logical AND, and fundamental groups join with `" x "` treating
    /// `"0"` (the trivial group) as the identity.
    pub fn product(&self, other: &TopologyBag) -> TopologyBag {
        let dimension = match (self.dimension, other.dimension) {
            (Some(l), Some(r)) => Some(l + r),
            _ => None,
        };
        let euler_characteristic = match (self.euler_characteristic, other.euler_characteristic) {
            (Some(l), Some(r)) => Some(l * r),
            _ => None,
        };
        let is_orientable = match (self.is_orientable, other.is_orientable) {
            (Some(l), Some(r)) => Some(l && r),
            _ => None,
        };
        let fundamental_group = match (&self.fundamental_group, &other.fundamental_group) {
            (Some(l), Some(r)) => Some(join_groups(l, r)),
            _ => None,
        };
        TopologyBag {
            dimension,
            euler_characteristic,
            is_orientable,
            fundamental_group,
        }
    }
}

/// Join two fundamental-group labels, with `"0"` acting as the identity.
fn join_groups(left: &str, right: &str) -> String {
    if left == "0" {
        right.to_string()
    } else if right == "0" {
        left.to_string()
    } else {
        format!("{left} x {right}")
    }
}

impl fmt::Display for TopologyBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(d) = self.dimension {
            parts.push(format!("dimension={d}"));
        }
        if let Some(e) = self.euler_characteristic {
            parts.push(format!("euler_characteristic={e}"));
        }
        if let Some(o) = self.is_orientable {
            parts.push(format!("is_orientable={o}"));
        }
        if let Some(g) = &self.fundamental_group {
            parts.push(format!("fundamental_group={g:?}"));
        }
        write!(f, "{{{}}}", parts.join(", "))
    }
}
