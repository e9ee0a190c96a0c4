use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "todo_cli", about = "In-memory todo console", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Run the interactive menu (default).
    Interactive,
    /// Print the program name and version.
    Version,
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Interactive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interactive_is_the_default() {
        let cli = Cli::try_parse_from(["todo_cli"]).unwrap();
        assert_eq!(cli.command(), Commands::Interactive);

        let cli = Cli::try_parse_from(["todo_cli", "version"]).unwrap();
        assert_eq!(cli.command(), Commands::Version);
    }
}
