use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "ringcheck")]
#[command(version)]
#[command(about = "Verifies that zero-token members never hold replicas", long_about = None)]
pub struct Cli {
    /// TOML settings file layered over the defaults; `RINGCHECK__*` env still wins
    #[arg(long, env = "RINGCHECK_CONFIG", value_name = "PATH")]
    pub config: Option<String>,
}
