use reschema_core::Schema;

use crate::context::ConversionContext;
use crate::error::ConvertError;

/// Emitter from a resolved schema graph to one target dialect.
///
/// Conversion is synchronous and pure apart from definitions registered in
/// `context`.
pub trait Converter {
    type Output: PartialEq;

    /// Target name used in error messages.
    fn name(&self) -> &'static str;

    /// Convert `schema`, registering any named definitions in `context`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError`] when the schema uses a kind or validation
    /// combination the target cannot express, or when a definition key is
    /// registered with conflicting content.
    fn convert(
        &self,
        schema: &Schema,
        context: &mut ConversionContext<Self::Output>,
    ) -> Result<Self::Output, ConvertError>;
}
