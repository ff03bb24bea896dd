use serde::{Deserialize, Serialize};

/// Emission switches shared by every converter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Inline named types instead of registering them as definitions.
    pub deref: bool,
    /// Tag validators emitted for named types with the type's name.
    /// Only the validator DSL honours this.
    pub embed_types: bool,
}

impl ConvertOptions {
    #[must_use]
    pub const fn with_deref(mut self, deref: bool) -> Self {
        self.deref = deref;
        self
    }

    #[must_use]
    pub const fn with_embed_types(mut self, embed_types: bool) -> Self {
        self.embed_types = embed_types;
        self
    }
}
