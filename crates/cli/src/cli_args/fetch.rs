use crate::{reporter::StderrSink, State};
use appmeta_fetcher::{FetchMetadata, FetchOutcome};
use appmeta_package::{PackageEntity, PackageKind, SharedPackage};
use clap::Args;
use futures_util::future;
use miette::{Context, IntoDiagnostic};
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Ids of the applications, e.g. `org.gnome.Maps`.
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Treat the applications as installed.
    ///
    /// Installed applications start from their cached metadata and have the fetched metadata
    /// written back to the cache directory.
    #[arg(long)]
    pub installed: bool,

    /// Treat the ids as runtimes. Runtimes are never written to the cache directory.
    #[arg(long)]
    pub runtime: bool,

    /// Do not write anything to the cache directory.
    #[arg(long)]
    pub no_persist: bool,

    /// Print one JSON object per application instead of a table.
    #[arg(long)]
    pub json: bool,
}

impl FetchArgs {
    /// Fetch every id concurrently, then persist and print the results in input order.
    pub async fn run(self, state: State) -> miette::Result<()> {
        let FetchArgs { ids, installed, runtime, no_persist, json } = self;
        let kind = if runtime { PackageKind::Runtime } else { PackageKind::Application };

        let mut packages = Vec::with_capacity(ids.len());
        for id in ids {
            let mut package = PackageEntity { kind, installed, ..PackageEntity::new(id) };
            if package.supports_disk_cache() {
                let cached = state
                    .config
                    .cache_dir
                    .read_package(&package.id)
                    .wrap_err_with(|| format!("reading the cached metadata of {}", package.id))?;
                if let Some(entry) = cached {
                    package.fill_from_cache(&entry);
                }
            }
            packages.push(package.into_shared());
        }

        let prototype = FetchMetadata::new(state.fetch_context(Arc::new(StderrSink)), None);
        let handles = packages.iter().map(|package| {
            let mut task = prototype.duplicate(Some(Arc::clone(package)));
            tokio::spawn(async move {
                let outcome = task.run().await;
                (task, outcome)
            })
        });

        for (handle, package) in future::join_all(handles).await.into_iter().zip(&packages) {
            let (mut task, outcome) = handle.into_diagnostic().wrap_err("joining a fetch task")?;
            if !no_persist {
                task.flush().await;
            }
            print_package(package, outcome, json).await?;
        }

        Ok(())
    }
}

async fn print_package(
    package: &SharedPackage,
    outcome: FetchOutcome,
    json: bool,
) -> miette::Result<()> {
    let package = package.read().await;
    if json {
        let line = serde_json::to_string(&*package)
            .into_diagnostic()
            .wrap_err_with(|| format!("serializing the metadata of {}", package.id))?;
        println!("{line}");
    } else {
        println!("{}", table_row(&package, outcome));
    }
    Ok(())
}

/// Tab separated `id version latest-version name outcome`. Missing fields are printed as `-`.
fn table_row(package: &PackageEntity, outcome: FetchOutcome) -> String {
    let field = |value: &Option<String>| value.as_deref().unwrap_or("-").to_string();
    let outcome = match outcome {
        FetchOutcome::Skipped => "skipped",
        FetchOutcome::Fetched { .. } => "fetched",
        FetchOutcome::Exhausted => "failed",
    };
    [
        package.id.clone(),
        field(&package.version),
        field(&package.latest_version),
        field(&package.name),
        outcome.to_string(),
    ]
    .join("\t")
}
