use {
    clap::Parser,
    std::{
        fmt::{self, Display, Formatter},
        path::PathBuf,
        time::Duration,
    },
};

#[derive(Parser)]
pub struct Arguments {
    /// Log filter directives, in `RUST_LOG` syntax.
    #[clap(long, env, default_value = "warn,deploy_contracts=info")]
    pub log_filter: String,

    /// Emit log events as JSON lines.
    #[clap(long, env, default_value = "false")]
    pub use_json_logs: bool,

    /// Path to the deployment configuration. Without it `deploy.toml` is read
    /// if present, otherwise the built-in default (solc 0.8.19 and a
    /// `sepolia` network) is used. An explicitly given file must exist.
    #[clap(long, env)]
    pub config: Option<PathBuf>,

    /// Name of the configured network to deploy to.
    #[clap(long, env, default_value = "sepolia")]
    pub network: String,

    /// Directory holding the compiled contract artifacts.
    #[clap(long, env, default_value = "artifacts")]
    pub artifacts: PathBuf,

    /// Explicit path to the contract artifact. Overrides the lookup of the
    /// contract in `--artifacts`.
    #[clap(long, env)]
    pub artifact: Option<PathBuf>,

    /// Number of blocks the deployment has to be confirmed by.
    #[clap(long, env, default_value = "1")]
    pub confirmations: u64,

    /// How long to wait for the deployment to be confirmed.
    #[clap(
        long,
        env,
        default_value = "5m",
        value_parser = humantime::parse_duration,
    )]
    pub confirmation_timeout: Duration,
}

impl Display for Arguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            log_filter,
            use_json_logs,
            config,
            network,
            artifacts,
            artifact,
            confirmations,
            confirmation_timeout,
        } = self;

        writeln!(f, "log_filter: {log_filter}")?;
        writeln!(f, "use_json_logs: {use_json_logs}")?;
        writeln!(f, "config: {config:?}")?;
        writeln!(f, "network: {network}")?;
        writeln!(f, "artifacts: {}", artifacts.display())?;
        writeln!(f, "artifact: {artifact:?}")?;
        writeln!(f, "confirmations: {confirmations}")?;
        writeln!(f, "confirmation_timeout: {confirmation_timeout:?}")?;
        Ok(())
    }
}
