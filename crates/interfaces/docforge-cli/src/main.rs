use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use docforge_cli::commands;
use docforge_core::GenerationOutcome;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store credentials for the generation service
    Login {
        #[arg(long)]
        token: String,
        #[arg(long = "user")]
        user_id: String,
    },
    /// Forget stored credentials
    Logout,
    /// Show the currently stored identity
    Whoami,
    /// Generate documentation for one repository
    Generate {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        repo: String,
        #[arg(long)]
        include_tests: bool,
        #[arg(short, long, help = "Write the documentation JSON here instead of stdout")]
        out: Option<Utf8PathBuf>,
        #[arg(
            long,
            env = "DOCFORGE_SERVICE_URL",
            default_value = docforge_config::DEFAULT_SERVICE_URL
        )]
        service: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).expect("default subscriber");

    match cli.command {
        Commands::Login { token, user_id } => commands::cmd_login(token, user_id)?,
        Commands::Logout => commands::cmd_logout()?,
        Commands::Whoami => commands::cmd_whoami()?,
        Commands::Generate {
            owner,
            repo,
            include_tests,
            out,
            service,
        } => {
            let auth = commands::load_auth()?;
            match commands::cmd_generate(auth, owner, repo, include_tests, out, &service).await? {
                GenerationOutcome::Success(_) => {}
                GenerationOutcome::PaymentRequired => {
                    anyhow::bail!(
                        "Insufficient credits. Top up your account, then re-run the command"
                    );
                }
                GenerationOutcome::Failure(reason) => {
                    anyhow::bail!("Generation failed: {reason}");
                }
            }
        }
    }

    Ok(())
}
