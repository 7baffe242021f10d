use std::path::PathBuf;

/// Default output root for display artifacts.
pub const DEFAULT_DIST_DIR: &str = "dist";

/// Display output configuration.
#[derive(Clone, Debug)]
pub struct DisplayConfig {
    /// Root directory all per-caller display directories nest under.
    pub output_root: PathBuf,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from(DEFAULT_DIST_DIR),
        }
    }
}

impl DisplayConfig {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.output_root.as_os_str().is_empty() {
            return Err("Output root must not be empty".to_string());
        }
        if self.output_root.is_file() {
            return Err(format!(
                "Output root is a file, not a directory: {}",
                self.output_root.display()
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_root() {
        let config = DisplayConfig::default();
        assert_eq!(config.output_root, PathBuf::from("dist"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_root_rejected() {
        let config = DisplayConfig::new("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_file_root_rejected() {
        // Cargo.toml always exists at the crate root during tests
        let config = DisplayConfig::new("Cargo.toml");
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("not a directory"));
    }
}
