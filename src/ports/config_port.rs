//! Configuration access port trait.

use crate::domain::error::MacdtraderError;

/// Typed lookups return `Ok(None)` for an absent key and `ConfigInvalid` for
/// a value that does not parse as the requested type.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str) -> Result<Option<i64>, MacdtraderError>;
    fn get_double(&self, section: &str, key: &str) -> Result<Option<f64>, MacdtraderError>;
    fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>, MacdtraderError>;

    /// Non-empty string value, or `ConfigMissing`.
    fn require_string(&self, section: &str, key: &str) -> Result<String, MacdtraderError> {
        self.get_string(section, key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| MacdtraderError::ConfigMissing {
                section: section.to_string(),
                key: key.to_string(),
            })
    }
}
