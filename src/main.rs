use clap::Parser;
use pwdm::cli::{Cli, Commands, Context};
use tracing_subscriber::EnvFilter;

/// Environment variable controlling diagnostic log output.
const LOG_ENV: &str = "PWDM_LOG";

fn main() {
    // Diagnostics go to stderr so they never mix with printed passwords.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        pwdm::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> pwdm::errors::Result<()> {
    let ctx = Context::from_cli(cli)?;

    match cli.command {
        Commands::New { ref name } => pwdm::cli::commands::new::execute(&ctx, name),
        Commands::Ls => pwdm::cli::commands::ls::execute(&ctx),
        Commands::Show { ref storage } => pwdm::cli::commands::show::execute(&ctx, storage),
        Commands::Get {
            ref storage,
            ref pattern,
        } => pwdm::cli::commands::get::execute(&ctx, storage, pattern.as_deref()),
        Commands::Add {
            ref storage,
            ref description,
            ref secret,
        } => pwdm::cli::commands::add::execute(&ctx, storage, description, secret.as_deref()),
        Commands::Del {
            ref storage,
            ref pattern,
            force,
        } => pwdm::cli::commands::delete::execute(&ctx, storage, pattern, force),
        Commands::Passwd { ref storage } => pwdm::cli::commands::passwd::execute(&ctx, storage),
        Commands::Shell => pwdm::cli::commands::shell::execute(&ctx),
    }
}
