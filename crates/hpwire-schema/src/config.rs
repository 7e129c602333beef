/// Controls schema validation behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// When true, attributes not named by the schema reject the frame.
    pub strict_mode: bool,
    /// When true, kinds without a schema return `SchemaError::NoSchema`
    /// instead of passing on well-formedness alone.
    pub fail_on_missing_schema: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            strict_mode: true,
            fail_on_missing_schema: false,
        }
    }
}
