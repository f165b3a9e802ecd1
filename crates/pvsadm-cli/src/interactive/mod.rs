//! Interactive prompts

use crate::error::{CliError, Result};
use dialoguer::{theme::ColorfulTheme, Confirm};

/// Terminal prompts sharing one theme
pub struct Prompter {
    theme: ColorfulTheme,
}

impl Prompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    /// Confirm an action with yes/no prompt, defaulting to no
    pub fn confirm(&self, message: &str) -> Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(message)
            .default(false)
            .interact()
            .map_err(|e| CliError::interactive(format!("Confirmation failed: {e}")))
    }
}

impl Default for Prompter {
    fn default() -> Self {
        Self::new()
    }
}
