use clap::{Args, Subcommand};
use pf_core::{Result, StoreConfig, SyncConfig};
use std::path::PathBuf;

use crate::files::display_name;
use crate::job::{SyncJob, SyncReport};

#[derive(Args, Debug, Clone)]
pub struct SyncArgs {
    /// Directory holding the `<name>.json` / `<name>.txt` article pairs
    #[arg(long, env = "ARTICLES_DIR", default_value = "articles", global = true)]
    pub articles_dir: PathBuf,
    /// MongoDB connection string
    #[arg(long, env = "MONGOURL_ENV", hide_env_values = true, global = true)]
    pub mongo_url: Option<String>,
    /// Database the `Articles` collection lives in
    #[arg(long, env = "BLOGNAME", global = true)]
    pub db_name: Option<String>,
}

impl SyncArgs {
    pub fn to_config(&self) -> SyncConfig {
        SyncConfig::new(
            self.articles_dir.clone(),
            StoreConfig {
                url: self.mongo_url.clone(),
                database: self.db_name.clone(),
            },
        )
    }
}

#[derive(Subcommand, Debug, Clone, Default)]
pub enum SyncCommands {
    /// Upload new articles and remove processed files
    #[default]
    Upload,
    /// List pending article files and their dedup keys
    List,
}

pub async fn handle_command(command: SyncCommands, config: SyncConfig) -> Result<Option<SyncReport>> {
    let job = SyncJob::new(config);
    match command {
        SyncCommands::Upload => {
            let report = job
                .run(|store| async move { pf_storage::connect(&store).await })
                .await?;
            Ok(Some(report))
        }
        SyncCommands::List => {
            let pending = job.pending().await?;
            if !pending.is_empty() {
                println!("Pending articles:");
            }
            for article in &pending {
                match &article.key {
                    Ok(key) => println!("  {} [{}]", display_name(&article.path), key),
                    Err(e) => println!("  {} (unreadable: {})", display_name(&article.path), e),
                }
            }
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        sync: SyncArgs,
        #[command(subcommand)]
        command: Option<SyncCommands>,
    }

    #[test]
    fn test_flags_build_config() {
        let cli = TestCli::try_parse_from([
            "pf",
            "list",
            "--articles-dir",
            "/tmp/articles",
            "--mongo-url",
            "mongodb://db:27017",
            "--db-name",
            "blog",
        ])
        .unwrap();

        assert!(matches!(cli.command, Some(SyncCommands::List)));
        let config = cli.sync.to_config();
        assert_eq!(config.articles_dir, PathBuf::from("/tmp/articles"));
        assert_eq!(config.store.url().unwrap(), "mongodb://db:27017");
        assert_eq!(config.store.database().unwrap(), "blog");
    }

    #[test]
    fn test_upload_is_the_default_command() {
        let cli = TestCli::try_parse_from(["pf"]).unwrap();
        assert!(matches!(
            cli.command.unwrap_or_default(),
            SyncCommands::Upload
        ));
    }
}
