use std::fmt;

use serde::Serialize;

/// A TOPOS-Xi type expression.
///
/// Either a named type with optional parameters (`Qubit`, `Register<T>`)
/// or the binary product of two types (`A * B`). Products always
/// associate right: `A * B * C` is `A * (B * C)` by construction, and the
/// equivalence relation never sees a left-associated product from the
/// parser.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TypeExpr {
    Name { name: String, params: Vec<TypeExpr> },
    Product(Box<TypeExpr>, Box<TypeExpr>),
}

impl TypeExpr {
    /// A named type without parameters.
    pub fn name(name: impl Into<String>) -> TypeExpr {
        TypeExpr::Name {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// The product `left * right`.
    pub fn product(left: TypeExpr, right: TypeExpr) -> TypeExpr {
        TypeExpr::Product(Box::new(left), Box::new(right))
    }

    pub fn is_product(&self) -> bool {
        matches!(self, TypeExpr::Product(..))
    }

    /// The head name of a named type, `None` for products.
    pub fn head(&self) -> Option<&str> {
        match self {
            TypeExpr::Name { name, .. } => Some(name),
            TypeExpr::Product(..) => None,
        }
    }

    /// Parse a standard-library signature string such as `Torus` or
    /// `Position * String` into a type expression.
    ///
    /// Signature strings come from `.htf` manifests and use only names
    /// and `*`; multi-factor products right-associate.
    pub fn from_signature(s: &str) -> TypeExpr {
        let parts: Vec<TypeExpr> = s.split('*').map(|p| TypeExpr::name(p.trim())).collect();
        let mut iter = parts.into_iter().rev();
        let mut acc = iter.next().unwrap_or_else(|| TypeExpr::name(s.trim()));
        for ty in iter {
            acc = TypeExpr::product(ty, acc);
        }
        acc
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Name { name, params } => {
                write!(f, "{name}")?;
                if !params.is_empty() {
                    write!(f, "<")?;
                    for (i, p) in params.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{p}")?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            TypeExpr::Product(left, right) => {
                // Parenthesize a product on the left so the rendering
                // stays unambiguous under right association.
                if left.is_product() {
                    write!(f, "({left}) * {right}")
                } else {
                    write!(f, "{left} * {right}")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_named_and_parameterized() {
        assert_eq!(TypeExpr::name("Qubit").to_string(), "Qubit");
        let reg = TypeExpr::Name {
            name: "Register".into(),
            params: vec![TypeExpr::name("Qubit"), TypeExpr::name("Number")],
        };
        assert_eq!(reg.to_string(), "Register<Qubit, Number>");
    }

    #[test]
    fn display_products() {
        let t = TypeExpr::product(
            TypeExpr::name("A"),
            TypeExpr::product(TypeExpr::name("B"), TypeExpr::name("C")),
        );
        assert_eq!(t.to_string(), "A * B * C");
        let left = TypeExpr::product(
            TypeExpr::product(TypeExpr::name("A"), TypeExpr::name("B")),
            TypeExpr::name("C"),
        );
        assert_eq!(left.to_string(), "(A * B) * C");
    }

    #[test]
    fn signature_single_name() {
        assert_eq!(TypeExpr::from_signature(" Torus "), TypeExpr::name("Torus"));
    }

    #[test]
    fn signature_product_right_associates() {
        let t = TypeExpr::from_signature("A * B * C");
        assert_eq!(
            t,
            TypeExpr::product(
                TypeExpr::name("A"),
                TypeExpr::product(TypeExpr::name("B"), TypeExpr::name("C")),
            )
        );
    }
}
