use crate::math::Scalar;

/// Lumped two-terminal resistor as supplied by the caller.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Resistor {
    name: String,
    a: String,
    b: String,
    resistance: Scalar,
}

impl Resistor {
    /// Creates a named resistor between nodes `a` and `b`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        a: impl Into<String>,
        b: impl Into<String>,
        resistance_ohms: Scalar,
    ) -> Self {
        Self {
            name: name.into(),
            a: a.into(),
            b: b.into(),
            resistance: resistance_ohms,
        }
    }

    /// Creates an anonymous resistor; the name is derived from its terminals.
    #[must_use]
    pub fn between(a: impl Into<String>, b: impl Into<String>, resistance_ohms: Scalar) -> Self {
        let a = a.into();
        let b = b.into();
        let name = format!("R_{a}_{b}");
        Self::new(name, a, b, resistance_ohms)
    }

    /// Human-readable identifier (e.g. `R1`).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Terminal labels.
    #[must_use]
    pub fn terminals(&self) -> (&str, &str) {
        (&self.a, &self.b)
    }

    /// Resistance magnitude in ohms.
    #[must_use]
    pub fn resistance(&self) -> Scalar {
        self.resistance
    }

    /// Conductance in siemens.
    #[must_use]
    pub fn conductance(&self) -> Scalar {
        1.0 / self.resistance
    }
}

impl<A, B> From<(A, B, Scalar)> for Resistor
where
    A: Into<String>,
    B: Into<String>,
{
    fn from((a, b, r): (A, B, Scalar)) -> Self {
        Self::between(a, b, r)
    }
}
