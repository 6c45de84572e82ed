//! INI file configuration adapter.

use crate::domain::error::MacdtraderError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MacdtraderError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| MacdtraderError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, MacdtraderError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| MacdtraderError::ConfigParse {
                file: "<inline>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }
}

fn invalid(section: &str, key: &str, reason: String) -> MacdtraderError {
    MacdtraderError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason,
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str) -> Result<Option<i64>, MacdtraderError> {
        self.config
            .getint(section, key)
            .map_err(|reason| invalid(section, key, format!("expected an integer: {reason}")))
    }

    fn get_double(&self, section: &str, key: &str) -> Result<Option<f64>, MacdtraderError> {
        self.config
            .getfloat(section, key)
            .map_err(|reason| invalid(section, key, format!("expected a number: {reason}")))
    }

    fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>, MacdtraderError> {
        match self.config.get(section, key) {
            Some(raw) => Self::parse_bool(&raw).map(Some).ok_or_else(|| {
                invalid(section, key, format!("expected true or false, got '{}'", raw.trim()))
            }),
            None => Ok(None),
        }
    }
}
