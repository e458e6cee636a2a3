/// Base URL of the Flathub REST API.
pub const DEFAULT_API_URL: &str = "https://flathub.org/api/v1";

/// Origin of the Flathub website, used to resolve root-relative asset paths.
pub const DEFAULT_WEB_URL: &str = "https://flathub.org";

/// Addresses of a package catalog.
///
/// Both URLs are stored without a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    api_url: String,
    web_url: String,
}

impl Catalog {
    pub fn new(api_url: &str, web_url: &str) -> Self {
        Catalog {
            api_url: api_url.trim_end_matches('/').to_string(),
            web_url: web_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn web_url(&self) -> &str {
        &self.web_url
    }

    /// URL of the metadata document of a single app: `{api}/apps/{id}`.
    pub fn app_url(&self, id: &str) -> String {
        format!("{0}/apps/{id}", self.api_url)
    }

    /// Turn a root-relative path such as `/repo/icon.png` into an absolute URL on the
    /// catalog website. Anything else is returned untouched.
    pub fn absolute_url(&self, url: String) -> String {
        if url.starts_with('/') {
            format!("{0}{url}", self.web_url)
        } else {
            url
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::new(DEFAULT_API_URL, DEFAULT_WEB_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn app_url() {
        assert_eq!(
            Catalog::default().app_url("org.gnome.Maps"),
            "https://flathub.org/api/v1/apps/org.gnome.Maps"
        );
    }

    #[test]
    fn trailing_slashes_are_removed() {
        let catalog = Catalog::new("http://localhost:1234/api/", "http://localhost:1234/");
        assert_eq!(catalog.api_url(), "http://localhost:1234/api");
        assert_eq!(catalog.web_url(), "http://localhost:1234");
        assert_eq!(catalog.app_url("org.app"), "http://localhost:1234/api/apps/org.app");
    }

    #[test]
    fn absolute_url() {
        let catalog = Catalog::default();
        assert_eq!(
            catalog.absolute_url("/repo/appstream/x86_64/icons/128x128/org.app.png".to_string()),
            "https://flathub.org/repo/appstream/x86_64/icons/128x128/org.app.png"
        );
        assert_eq!(
            catalog.absolute_url("https://cdn.example.com/icon.png".to_string()),
            "https://cdn.example.com/icon.png"
        );
        assert_eq!(catalog.absolute_url("icon.png".to_string()), "icon.png");
    }
}
