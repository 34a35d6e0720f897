use clap::Parser;

/// Command-line arguments for fibstrip
#[derive(Clone, Parser, Debug)]
#[command(
    name = "fibstrip",
    version,
    about = "A draggable Fibonacci strip in the terminal"
)]
pub struct Args {
    /// Number of boxes to show at startup (10-50). Out-of-range values are clamped.
    #[arg(long = "length", value_name = "N", allow_hyphen_values = true)]
    pub length: Option<String>,

    /// Enable debug mode to show operational information
    #[arg(long = "debug", action)]
    pub debug: bool,

    /// Do not capture the mouse (keyboard scrolling only)
    #[arg(long = "no-mouse", action)]
    pub no_mouse: bool,

    /// Generate default configuration file at ~/.config/fibstrip/config.toml
    #[arg(long = "generate-config", action)]
    pub generate_config: bool,

    /// Force overwrite existing config file when using --generate-config
    #[arg(long = "force", requires = "generate_config", action)]
    pub force: bool,
}
