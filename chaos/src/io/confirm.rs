//! Operator confirmation before destructive commands.

use std::io::{BufRead, Write};

use crate::error::{ChaosError, Result};

pub trait Confirm {
    /// Ask `prompt`; `Ok(true)` means proceed.
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Reads a y/N answer from stdin. Anything other than `y`/`yes` declines.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        let mut stderr = std::io::stderr();
        write!(stderr, "{prompt} [y/N] ")
            .and_then(|()| stderr.flush())
            .map_err(|err| ChaosError::io("write prompt to", "<stderr>", err))?;

        let mut answer = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut answer)
            .map_err(|err| ChaosError::io("read answer from", "<stdin>", err))?;
        Ok(is_yes(&answer))
    }
}

/// Always proceeds (`--yes`, non-interactive stdin, or config opt-out).
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> Result<bool> {
        Ok(true)
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
