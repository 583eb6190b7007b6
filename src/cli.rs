use clap::Parser;

/// Command-line flags. Every flag can also be supplied through environment
/// variables or Vela parameter/secret files, see [`crate::config`].
#[derive(Parser, Debug, Default)]
#[command(name = "vela-build-summary")]
#[command(about = "Vela Build Summary plugin for capturing a summary of a build")]
#[command(version)]
pub struct Cli {
    /// Set log level - options: (trace|debug|info|warn|error|fatal|panic)
    #[arg(long = "log.level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Provide the number for the build
    #[arg(long = "build.number", value_name = "NUMBER")]
    pub build_number: Option<String>,

    /// Vela server to authenticate with
    #[arg(long = "config.server", value_name = "URL")]
    pub server: Option<String>,

    /// User token to authenticate with the Vela server
    #[arg(long = "config.token", value_name = "TOKEN")]
    pub token: Option<String>,

    /// Provide the organization name for the build
    #[arg(long = "repo.org", value_name = "ORG")]
    pub org: Option<String>,

    /// Provide the repository name for the build
    #[arg(long = "repo.name", value_name = "NAME")]
    pub repo: Option<String>,

    /// Maximum width of a table column before values wrap
    #[arg(long = "table.max-col-width", value_name = "CHARS")]
    pub max_col_width: Option<String>,
}
