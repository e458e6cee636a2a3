use appmeta_catalog::{Catalog, CatalogApp};
use appmeta_package::{is_blank, PackageEntity};

/// Merge a catalog document into a package.
///
/// * `version` and `name` are only filled when blank.
/// * `description` and `icon_url` are always replaced, even by nothing.
/// * `latest_version` is the current release, or the package version when the catalog has none.
/// * A blank `version` is then backfilled from `latest_version`.
/// * A root-relative icon path is resolved against the catalog website.
pub fn merge_catalog_app(package: &mut PackageEntity, app: CatalogApp, catalog: &Catalog) {
    let description = app.description_or_summary();
    let CatalogApp { version, name, icon_mobile_url, current_release_version, .. } = app;

    if is_blank(&package.version) {
        package.version = version;
    }

    if is_blank(&package.name) {
        package.name = name;
    }

    package.description = description;
    package.icon_url = icon_mobile_url;
    package.latest_version = current_release_version.or_else(|| package.version.clone());

    if is_blank(&package.version) && !is_blank(&package.latest_version) {
        package.version.clone_from(&package.latest_version);
    }

    package.icon_url = package.icon_url.take().map(|url| catalog.absolute_url(url));
}
