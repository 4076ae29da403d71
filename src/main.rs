use anyhow::Result;
use clap::{CommandFactory, Parser, error::ErrorKind};
use nxclone::commands::{
    self,
    config::{Config, MissingCredential, Operation, resolve_credentials},
};
use nxclone::runtime::{RealRuntime, Runtime};

/// nxclone - clone PyPI repositories in Nexus
///
/// Creates a hosted repository and fills it with the latest version of every
/// package found in a source repository, or deletes a repository.
///
/// NEXUS_USER and NEXUS_PASSWORD, when set, take precedence over --user and --password.
///
/// Examples:
///   nxclone -m create -s production -d production-hotfix-1234 -f nexus.company.com
///   nxclone -m delete -d production-hotfix-1234 -f nexus.company.com
#[derive(Parser, Debug)]
#[command(author, version = env!("NXCLONE_VERSION"), about)]
struct Cli {
    /// What to do with the destination repository
    #[arg(long, short = 'm', value_enum)]
    make: Operation,

    /// Source repository name (create only, defaults to "production")
    #[arg(long, short = 's', value_name = "REPO")]
    source: Option<String>,

    /// Destination repository name, e.g. production-hotfix-1234
    #[arg(long, short = 'd', value_name = "REPO")]
    dest: String,

    /// Nexus login (NEXUS_USER takes precedence)
    #[arg(long, short = 'u')]
    user: Option<String>,

    /// Nexus password (NEXUS_PASSWORD takes precedence)
    #[arg(long, short = 'p')]
    password: Option<String>,

    /// Nexus host name, e.g. nexus.example.com
    #[arg(long, short = 'f')]
    fqdn: String,

    /// Base URL of the Nexus API (defaults to https://<FQDN>)
    #[arg(long = "api-url", value_name = "URL")]
    api_url: Option<String>,

    /// Repository that must never be deleted (repeatable)
    #[arg(long = "protect", value_name = "REPO")]
    protect: Vec<String>,
}

impl Cli {
    fn into_config<R: Runtime>(self, runtime: &R) -> Result<Config, MissingCredential> {
        let credentials = resolve_credentials(runtime, self.user, self.password)?;
        Ok(Config::new(
            self.make,
            self.source,
            self.dest,
            self.fqdn,
            self.api_url,
            credentials,
            self.protect,
        ))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = RealRuntime;

    let config = match cli.into_config(&runtime) {
        Ok(config) => config,
        Err(e) => Cli::command()
            .error(ErrorKind::MissingRequiredArgument, e)
            .exit(),
    };

    match config.operation {
        Operation::Create => {
            // Interrupting a clone leaves the staged files in place
            let ctrl_c_handler = tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    eprintln!("\nInterrupted");
                    std::process::exit(1);
                }
            });

            let result = commands::create(&runtime, &config).await;
            ctrl_c_handler.abort();
            result?;
        }
        Operation::Delete => {
            commands::delete(&config).await?;
        }
    }
    Ok(())
}
