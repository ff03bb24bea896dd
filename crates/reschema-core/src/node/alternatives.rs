use super::PropertySchema;

/// Tagged union. Alternatives keep their declaration order, which consumers
/// may treat as try-order.
#[derive(Debug, Clone, PartialEq)]
pub struct AlternativesSchema {
    alternatives: Vec<PropertySchema>,
}

impl AlternativesSchema {
    #[must_use]
    pub const fn new(alternatives: Vec<PropertySchema>) -> Self {
        Self { alternatives }
    }

    #[must_use]
    pub fn alternatives(&self) -> &[PropertySchema] {
        &self.alternatives
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.alternatives.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }
}
