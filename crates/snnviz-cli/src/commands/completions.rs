//! Shell completion generation

use clap::{Args, CommandFactory};
use clap_complete::Shell;

use super::SnnvizCli;
use crate::error::CliResult;

/// Generate shell completions
#[derive(Args, Debug)]
pub struct CompletionsCommand {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsCommand {
    pub fn execute(self) -> CliResult<()> {
        let mut command = SnnvizCli::command();
        clap_complete::generate(self.shell, &mut command, "snnviz", &mut std::io::stdout());
        Ok(())
    }
}
