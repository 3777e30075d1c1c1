//! Directory service response records.

use serde::{Deserialize, Deserializer, Serialize};

/// `rel` of the link that points at an entry's downloadable artifact.
pub const DOWNLOAD_REL: &str = "download";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectoryListing {
    #[serde(default, deserialize_with = "null_as_default")]
    pub entries: Vec<DirectoryEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub faults: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub feature: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub directory: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub rel: String,
    pub href: String,
}

fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

impl DirectoryEntry {
    pub fn download_links(&self) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(|l| l.rel == DOWNLOAD_REL)
    }

    /// First download link. The directory API defines one per entry.
    pub fn download_link(&self) -> Option<&Link> {
        let link = self.download_links().next();
        if link.is_none() {
            tracing::debug!(feature = %self.feature, name = %self.name, "entry has no download link");
        }
        link
    }
}

impl DirectoryListing {
    /// Every download link of every entry, in listing order.
    pub fn all_download_links(&self) -> Vec<&Link> {
        self.entries.iter().flat_map(|e| e.download_links()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{"entries":[
        {"feature":"core-feature","directory":"/menubar","name":"buttons.json","size":0,
         "links":[{"rel":"file","href":"/html5/directory?feature=core-feature&path=/menubar/buttons.json"},
                  {"rel":"download","href":"/html5/features/core-feature//menubar/buttons.json"}]},
        {"feature":"core-version","directory":"/menubar","name":"buttons.json","size":21,
         "links":[{"rel":"download","href":"/html5/features/core-version//menubar/buttons.json"}]},
        {"feature":"bare","directory":"/menubar","name":"x","links":null}
    ],"faults":[]}"#;

    #[test]
    fn parses_service_listing() {
        let listing: DirectoryListing = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(listing.entries.len(), 3);
        assert_eq!(listing.entries[1].size, Some(21));
        assert!(listing.entries[2].links.is_empty());
    }

    #[test]
    fn download_link_lookup() {
        let listing: DirectoryListing = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(
            listing.entries[0].download_link().map(|l| l.href.as_str()),
            Some("/html5/features/core-feature//menubar/buttons.json")
        );
        assert_eq!(listing.entries[2].download_link(), None);
        assert_eq!(listing.all_download_links().len(), 2);
    }

    #[test]
    fn null_entries_mean_empty() {
        let listing: DirectoryListing =
            serde_json::from_str(r#"{"entries":null,"faults":null}"#).unwrap();
        assert!(listing.entries.is_empty());
        assert!(listing.all_download_links().is_empty());
    }
}
