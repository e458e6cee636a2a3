use appmeta_config::Config;
use clap::{Args, Subcommand};
use miette::Context;

#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// Returns the path to the active cache directory.
    Dir,
    /// Lists the ids of every application with cached metadata.
    List,
    /// Removes the cached metadata and icon of an application.
    Forget(ForgetArgs),
}

#[derive(Debug, Args)]
pub struct ForgetArgs {
    /// Id of the application, e.g. `org.gnome.Maps`.
    pub id: String,
}

impl CacheCommand {
    /// Execute the subcommand.
    pub fn run<'a>(self, config: impl FnOnce() -> &'a Config) -> miette::Result<()> {
        let cache_dir = &config().cache_dir;
        match self {
            CacheCommand::Dir => {
                println!("{}", cache_dir.display());
            }
            CacheCommand::List => {
                for id in cache_dir.list_packages().wrap_err("listing the cache directory")? {
                    println!("{id}");
                }
            }
            CacheCommand::Forget(ForgetArgs { id }) => {
                let removed = cache_dir
                    .remove_package(&id)
                    .wrap_err_with(|| format!("removing {id} from the cache"))?;
                if !removed {
                    eprintln!("{id} is not cached");
                }
            }
        }

        Ok(())
    }
}
