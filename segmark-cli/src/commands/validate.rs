//! Validate command implementation

use crate::error::CliError;
use anyhow::Result;
use clap::Args;
use segmark_core::rules::RulesConfig;
use segmark_core::BoundaryRules;
use std::path::PathBuf;

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Path to the boundary rules file to validate
    #[arg(short, long, value_name = "FILE", required = true)]
    pub rules: PathBuf,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        println!("Validating boundary rules: {}", self.rules.display());

        let checked = RulesConfig::from_file(&self.rules).and_then(|config| {
            let counts = (config.terminators.chars.len(), config.closers.chars.len());
            BoundaryRules::from_config(config).map(|_| counts)
        });

        match checked {
            Ok((terminators, closers)) => {
                println!("✓ Rules are valid!");
                println!("  Terminators: {terminators}");
                println!("  Closers: {closers}");
                Ok(())
            }
            Err(e) => {
                println!("✗ Rules are invalid!");
                println!("  Error: {e}");
                Err(CliError::InvalidRules {
                    path: self.rules.clone(),
                    message: e.to_string(),
                }
                .into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn rules_file(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", content).unwrap();
        temp_file
    }

    #[test]
    fn test_validate_valid_rules() {
        let temp_file = rules_file("[terminators]\nchars = [\".\", \"!\"]\n\n[closers]\nchars = [\")\"]\n");
        let args = ValidateArgs {
            rules: temp_file.path().to_path_buf(),
        };

        assert!(args.execute().is_ok());
    }

    #[test]
    fn test_validate_empty_terminators() {
        let temp_file = rules_file("[terminators]\nchars = []\n");
        let args = ValidateArgs {
            rules: temp_file.path().to_path_buf(),
        };

        let err = args.execute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::InvalidRules { message, .. }) if message.contains("terminator")
        ));
    }

    #[test]
    fn test_validate_multi_char_entry() {
        let temp_file = rules_file("[terminators]\nchars = [\"..\"]\n");
        let args = ValidateArgs {
            rules: temp_file.path().to_path_buf(),
        };

        assert!(args.execute().is_err());
    }

    #[test]
    fn test_validate_missing_file() {
        let args = ValidateArgs {
            rules: PathBuf::from("/nonexistent/rules.toml"),
        };

        assert!(args.execute().is_err());
    }
}
