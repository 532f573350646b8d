//! Repo Publisher CLI
//!
//! Publish a generated project to a new GitHub repository

use anyhow::Result;
use clap::{Parser, Subcommand};
use repo_publisher::core::config::GitHubConfig;
use repo_publisher::core::project_files::read_project_files;
use repo_publisher::{
    ConfigLoadOptions, ConfigLoader, PublishOptions, PublisherConfig, RepositoryPublisher,
    sanitize_repository_name, validate_repository_name,
};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Publish generated projects to GitHub
#[derive(Parser)]
#[command(name = "repo-publisher")]
#[command(version)]
#[command(about = "Publish generated projects to GitHub", long_about = None)]
struct Cli {
    /// Directory holding .repo-publisher.yaml (defaults to current directory)
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Override the GitHub API base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a repository name against GitHub naming rules
    Validate {
        name: String,
    },

    /// Check whether a repository name is free on your account
    Available {
        name: String,
    },

    /// Suggest an available repository name
    Suggest {
        base: String,
    },

    /// List your most recently updated repositories
    List,

    /// Show size and file count of one of your repositories
    Stats {
        repo: String,
    },

    /// Publish a directory as a new repository
    Publish {
        /// Project directory to upload
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Repository name (defaults to the directory name)
        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        /// Create a private repository
        #[arg(long)]
        private: bool,

        /// Initialize the repository with a README
        #[arg(long)]
        readme: bool,

        /// Print a one-click deployment link
        #[arg(long)]
        auto_deploy: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("repo_publisher=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("\n❌ Error");
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

async fn run() -> Result<i32> {
    let Cli {
        config_dir,
        api_url,
        command,
    } = Cli::parse();

    match command {
        Commands::Validate { name } => Ok(validate_command(&name)),
        Commands::Available { name } => {
            let publisher = connect(config_dir, api_url).await?;
            available_command(&publisher, &name).await
        }
        Commands::Suggest { base } => {
            let publisher = connect(config_dir, api_url).await?;
            let name = publisher.generate_unique_repository_name(&base).await;
            println!("{}", name);
            Ok(0)
        }
        Commands::List => {
            let publisher = connect(config_dir, api_url).await?;
            list_command(&publisher).await
        }
        Commands::Stats { repo } => {
            let publisher = connect(config_dir, api_url).await?;
            stats_command(&publisher, &repo).await
        }
        Commands::Publish {
            dir,
            name,
            description,
            private,
            readme,
            auto_deploy,
        } => {
            let name = match name {
                Some(name) => name,
                None => default_name(&dir)?,
            };
            let options = PublishOptions {
                name,
                description,
                private,
                include_readme: readme,
                auto_deploy,
            };
            let publisher = connect(config_dir, api_url).await?;
            publish_command(&publisher, dir, options).await
        }
    }
}

/// Build an authenticated publisher from config and environment
async fn connect(
    config_dir: Option<PathBuf>,
    api_url: Option<String>,
) -> Result<RepositoryPublisher> {
    let config = load_config(config_dir, api_url).await?;
    let publisher = RepositoryPublisher::github(config)?;

    if !publisher.is_authenticated() {
        anyhow::bail!(
            "Not authenticated with GitHub\nSet GITHUB_TOKEN or github.token in .repo-publisher.yaml"
        );
    }
    Ok(publisher)
}

async fn load_config(
    config_dir: Option<PathBuf>,
    api_url: Option<String>,
) -> Result<PublisherConfig> {
    let mut options = ConfigLoadOptions::from_env(config_dir.unwrap_or_else(|| PathBuf::from(".")));
    if let Some(api_url) = api_url {
        options.cli_args = Some(PublisherConfig {
            github: Some(GitHubConfig {
                api_url: Some(api_url),
                ..Default::default()
            }),
            ..Default::default()
        });
    }

    Ok(ConfigLoader::load(options).await?)
}

fn default_name(dir: &std::path::Path) -> Result<String> {
    let absolute = std::fs::canonicalize(dir)?;
    let title = absolute
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let name = sanitize_repository_name(&title);
    if name.is_empty() {
        anyhow::bail!("Cannot derive a repository name from {}; pass --name", dir.display());
    }
    Ok(name)
}

fn validate_command(name: &str) -> i32 {
    let validation = validate_repository_name(name);
    match validation.error {
        None => {
            println!("✅ {} is a valid repository name", name);
            0
        }
        Some(reason) => {
            println!("❌ {}", reason);
            1
        }
    }
}

async fn available_command(publisher: &RepositoryPublisher, name: &str) -> Result<i32> {
    if publisher.is_repository_name_available(name).await {
        println!("✅ {} is available", name);
        Ok(0)
    } else {
        println!("❌ {} is taken (or could not be checked)", name);
        Ok(1)
    }
}

async fn list_command(publisher: &RepositoryPublisher) -> Result<i32> {
    let Some(repos) = publisher.get_user_repositories().await else {
        eprintln!("❌ Failed to list repositories");
        return Ok(1);
    };

    if repos.is_empty() {
        println!("No repositories found");
        return Ok(0);
    }

    for repo in repos {
        let visibility = if repo.private { "private" } else { "public" };
        let updated = repo
            .updated_at
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("  {:<40} {:<8} {}  {}", repo.name, visibility, updated, repo.html_url);
    }
    Ok(0)
}

async fn stats_command(publisher: &RepositoryPublisher, repo: &str) -> Result<i32> {
    let Some(stats) = publisher.get_repository_stats(repo).await else {
        eprintln!("❌ Could not read stats for {}", repo);
        return Ok(1);
    };

    println!("📊 {}", repo);
    println!("  Size:         {} KB", stats.size);
    println!("  Files:        {}", stats.file_count);
    if let Some(updated) = stats.last_updated {
        println!("  Last updated: {}", updated.to_rfc3339());
    }
    Ok(0)
}

async fn publish_command(
    publisher: &RepositoryPublisher,
    dir: PathBuf,
    options: PublishOptions,
) -> Result<i32> {
    println!("\n📦 repo-publisher\n");

    let files = read_project_files(&dir)?;
    println!("📤 Publishing {} files as {}...", files.len(), options.name);

    match publisher.try_publish(&files, &options).await {
        Ok(published) => {
            let repository = &published.repository;
            println!("\n✅ Published successfully!");
            println!("  URL:   {}", repository.html_url);
            println!("  Clone: {}", repository.clone_url);
            if let Some(url) = &published.deployment_url {
                println!("  Deploy: {}", url);
            }
            Ok(0)
        }
        Err(error) => {
            eprintln!("\n❌ Publishing failed: {}", error.user_message());
            eprintln!("\n💡 Suggested actions:");
            for action in error.suggested_actions() {
                eprintln!("  - {}", action);
            }
            if error.is_recoverable() {
                eprintln!("\nThis may be temporary; running the command again can succeed.");
            }
            Ok(1)
        }
    }
}
