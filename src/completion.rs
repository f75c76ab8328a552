// src/completion.rs

//! Static shell completion scripts.

use crate::cli::Shell;

const BASH: &str = include_str!("../assets/completion/mkrun.bash");
const ZSH: &str = include_str!("../assets/completion/mkrun.zsh");
const FISH: &str = include_str!("../assets/completion/mkrun.fish");

/// Completion script body for `shell`, emitted verbatim.
pub fn script(shell: Shell) -> &'static str {
    match shell {
        Shell::Bash => BASH,
        Shell::Zsh => ZSH,
        Shell::Fish => FISH,
    }
}
