use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use roadtest::config::{Config, DEFAULT_CONFIG_FILE};
use roadtest::fixture::FixtureStore;
use roadtest::logging;
use roadtest::pages::{LoginPage, PageActions};
use roadtest::scenario::{self, TestRun};
use roadtest::testdata;

// ── Admin scenario defaults ─────────────────────────────────────────────────

const ENV_ADMIN_EMAIL: &str = "ROADTEST_ADMIN_EMAIL";
const ENV_ADMIN_PASSWORD: &str = "ROADTEST_ADMIN_PASSWORD";
const ADMIN_EMAIL: &str = "admin@test.com";
const ADMIN_PASSWORD: &str = "admin123";

// ── Texts the target app shows for the probed outcomes ──────────────────────

const ADMIN_DASHBOARD_HEADING: &str = "Admin Dashboard";
const INVALID_LOGIN_MESSAGE: &str = "Invalid email or password";

// ── CLI ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name = "roadtest",
    version,
    about = "Browser-driven UI scenarios against the configured environment"
)]
struct Cli {
    /// Config file (key=value lines)
    #[arg(
        short,
        long,
        value_name = "PATH",
        env = "ROADTEST_CONFIG",
        default_value = DEFAULT_CONFIG_FILE
    )]
    config: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Register a fresh randomized user and store it in the fixture log
    Signup {
        /// Leave the optional profile fields empty
        #[arg(long)]
        mandatory_only: bool,
    },
    /// Log in as the most recently stored user
    Login {
        /// Probe the rejection path with credentials that cannot exist
        #[arg(long)]
        wrong_creds: bool,
    },
    /// Signup followed by login against the same fixture log
    Smoke,
    /// Log in as the admin user and check the dashboard heading
    Admin,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_from_env();
    let cli = Cli::parse();

    let config = Config::load(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    let store = FixtureStore::new(config.fixtures_file());

    let outcome = match cli.command {
        Commands::Signup { mandatory_only } => run_signup(config, &store, mandatory_only).await,
        Commands::Login { wrong_creds } => run_login(config, &store, wrong_creds).await,
        Commands::Smoke => run_smoke(config, &store).await,
        Commands::Admin => run_admin(config).await,
    };

    match outcome {
        Ok(summary) => {
            println!("{} {}", "PASS".green().bold(), summary);
            Ok(())
        }
        Err(e) => {
            println!("{} {:#}", "FAIL".red().bold(), e);
            std::process::exit(1);
        }
    }
}

async fn run_signup(config: Config, store: &FixtureStore, mandatory_only: bool) -> Result<String> {
    let record = if mandatory_only {
        testdata::mandatory_record()
    } else {
        testdata::full_record()
    };
    let run = TestRun::start(config).await?;
    let outcome = scenario::register_user(&run, store, record).await;
    let teardown = run.finish().await;
    let record = outcome?;
    teardown?;
    Ok(format!(
        "registered {} and stored in {}",
        record.email,
        store.path().display()
    ))
}

async fn run_login(config: Config, store: &FixtureStore, wrong_creds: bool) -> Result<String> {
    let run = TestRun::start(config).await?;
    let outcome: Result<String> = async {
        if wrong_creds {
            scenario::login_as(&run, "nobody@example.com", "wrong-password").await?;
            let message = LoginPage::new(run.session()?).flash_message().await?;
            anyhow::ensure!(
                message.contains(INVALID_LOGIN_MESSAGE),
                "expected a rejection message, app said {:?}",
                message
            );
            Ok(format!("rejected bad credentials: {:?}", message.trim()))
        } else {
            let record = scenario::login_latest(&run, store).await?;
            Ok(format!("logged in as {}", record.email))
        }
    }
    .await;
    let teardown = run.finish().await;
    let summary = outcome?;
    teardown?;
    Ok(summary)
}

async fn run_smoke(config: Config, store: &FixtureStore) -> Result<String> {
    let run = TestRun::start(config).await?;
    let outcome: Result<String> = async {
        let record = scenario::register_user(&run, store, testdata::full_record()).await?;
        // Back to the login page for the replay half.
        run.session()?.goto(run.config().base_url().as_str()).await?;
        let replayed = scenario::login_latest(&run, store).await?;
        anyhow::ensure!(
            replayed.email == record.email,
            "fixture log replayed {} but this run registered {}",
            replayed.email,
            record.email
        );
        Ok(format!("registered and replayed {}", record.email))
    }
    .await;
    let teardown = run.finish().await;
    let summary = outcome?;
    teardown?;
    Ok(summary)
}

async fn run_admin(config: Config) -> Result<String> {
    let email = std::env::var(ENV_ADMIN_EMAIL).unwrap_or_else(|_| ADMIN_EMAIL.to_string());
    let password =
        std::env::var(ENV_ADMIN_PASSWORD).unwrap_or_else(|_| ADMIN_PASSWORD.to_string());
    let run = TestRun::start(config).await?;
    let outcome: Result<String> = async {
        scenario::login_as(&run, &email, &password).await?;
        let heading = run.session()?.text_of("h2").await?;
        anyhow::ensure!(
            heading.contains(ADMIN_DASHBOARD_HEADING),
            "expected the admin dashboard, found heading {:?}",
            heading
        );
        Ok(format!("admin {} reached {:?}", email, heading.trim()))
    }
    .await;
    let teardown = run.finish().await;
    let summary = outcome?;
    teardown?;
    Ok(summary)
}
