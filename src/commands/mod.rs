// ABOUTME: Command handlers for the stolos CLI.
// ABOUTME: One module per subcommand.

pub mod deploy;
