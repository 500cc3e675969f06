//! SharePoint site addressing
//!
//! Graph addresses a site by host name plus server-relative path
//! (`/sites/{host}:/{path}:`) and a list by its display name.

use crate::error::{Error, Result};
use url::Url;

/// A SharePoint site split into host and server-relative path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRef {
    /// Host name, e.g. `contoso.sharepoint.com`
    pub host: String,
    /// Path without leading or trailing slash, e.g. `sites/TeamA`
    pub path: String,
}

impl SiteRef {
    /// Parse a site URL such as `https://contoso.sharepoint.com/sites/TeamA/`
    pub fn parse(site_url: &str) -> Result<Self> {
        let trimmed = site_url.trim();
        if trimmed.is_empty() {
            return Err(Error::config("Site URL is empty"));
        }

        let url = Url::parse(trimmed)
            .map_err(|e| Error::config(format!("Invalid site URL '{trimmed}': {e}")))?;

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| Error::config(format!("Site URL '{trimmed}' has no host")))?
            .to_string();

        let path = url.path().trim_matches('/').to_string();

        Ok(Self { host, path })
    }

    /// Short token naming the site in file names: last path segment, or the host
    pub fn token(&self) -> &str {
        self.path
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or(&self.host)
    }

    /// Graph site segment: `sites/{host}:/{path}:` or `sites/{host}` for the root site
    pub fn graph_segment(&self) -> String {
        if self.path.is_empty() {
            format!("sites/{}", self.host)
        } else {
            format!("sites/{}:/{}:", self.host, self.path)
        }
    }
}

impl std::fmt::Display for SiteRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.host, self.path)
    }
}

/// Columns endpoint of a list addressed by display name
pub fn columns_url(graph_base: &str, site: &SiteRef, list_title: &str) -> String {
    format!(
        "{}/{}/lists/{}/columns",
        graph_base.trim_end_matches('/'),
        site.graph_segment(),
        urlencoding::encode(list_title.trim())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_site_url() {
        let site = SiteRef::parse("https://contoso.sharepoint.com/sites/TeamA/").unwrap();
        assert_eq!(site.host, "contoso.sharepoint.com");
        assert_eq!(site.path, "sites/TeamA");
        assert_eq!(site.token(), "TeamA");
    }

    #[test]
    fn test_parse_nested_site() {
        let site = SiteRef::parse("https://contoso.sharepoint.com/sites/Hub/Sub").unwrap();
        assert_eq!(site.path, "sites/Hub/Sub");
        assert_eq!(site.token(), "Sub");
    }

    #[test]
    fn test_root_site() {
        let site = SiteRef::parse("https://contoso.sharepoint.com").unwrap();
        assert_eq!(site.path, "");
        assert_eq!(site.token(), "contoso.sharepoint.com");
        assert_eq!(site.graph_segment(), "sites/contoso.sharepoint.com");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(SiteRef::parse("").unwrap_err().is_config());
        assert!(SiteRef::parse("not a url").unwrap_err().is_config());
        assert!(SiteRef::parse("mailto:someone@example.com")
            .unwrap_err()
            .is_config());
    }

    #[test]
    fn test_columns_url() {
        let site = SiteRef::parse("https://contoso.sharepoint.com/sites/TeamA").unwrap();
        assert_eq!(
            columns_url("https://graph.microsoft.com/v1.0/", &site, "My Custom List"),
            "https://graph.microsoft.com/v1.0/sites/contoso.sharepoint.com:/sites/TeamA:/lists/My%20Custom%20List/columns"
        );
    }

    #[test]
    fn test_columns_url_encodes_special_characters() {
        let site = SiteRef::parse("https://contoso.sharepoint.com/sites/TeamA").unwrap();
        let url = columns_url("https://graph.example", &site, "R&D / Q1");
        assert!(url.ends_with("/lists/R%26D%20%2F%20Q1/columns"));
    }
}
