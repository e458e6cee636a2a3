use appmeta_config::Config;
use clap::Args;
use derive_more::{Display, Error};
use miette::{Context, Diagnostic, IntoDiagnostic};

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Id of the application, e.g. `org.gnome.Maps`.
    pub id: String,
}

/// The disk cache has nothing for the requested application.
#[derive(Debug, Display, Error, Diagnostic)]
#[display("No cached metadata for {id}")]
#[diagnostic(code(appmeta_cli::not_cached), help("Fetch it with `appmeta fetch --installed` first"))]
pub struct NotCachedError {
    #[error(not(source))]
    pub id: String,
}

impl ShowArgs {
    /// Print the cached entry as pretty JSON.
    pub fn run(self, config: &Config) -> miette::Result<()> {
        let ShowArgs { id } = self;
        let Some(entry) = config
            .cache_dir
            .read_package(&id)
            .wrap_err_with(|| format!("reading the cached metadata of {id}"))?
        else {
            return Err(NotCachedError { id }.into());
        };

        let json = serde_json::to_string_pretty(&entry)
            .into_diagnostic()
            .wrap_err("serializing the cached metadata")?;
        println!("{json}");
        Ok(())
    }
}
