//! Plex Media Server client over the JSON HTTP API.

use super::models::{LibraryItem, MediaContainer};
use super::{LibraryClient, LibrarySection};
use crate::core::media::MediaKind;
use crate::error::LibraryError;
use reqwest::blocking::{Client, Response};
use reqwest::header::ACCEPT;
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

const TOKEN_HEADER: &str = "X-Plex-Token";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Authenticated session with one Plex server
#[derive(Debug, Clone)]
pub struct PlexClient {
    server: Url,
    token: String,
    client: Client,
    /// Section title -> section key
    sections: HashMap<String, String>,
}

impl PlexClient {
    /// Build a client without contacting the server
    pub fn new(server: &str, token: &str) -> Result<Self, LibraryError> {
        let mut server = Url::parse(server).map_err(|e| LibraryError::Connect {
            server: server.to_string(),
            reason: e.to_string(),
        })?;
        // endpoints join relative to the base, so a proxy prefix survives
        if !server.path().ends_with('/') {
            let path = format!("{}/", server.path());
            server.set_path(&path);
        }
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LibraryError::Connect {
                server: server.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            server,
            token: token.to_string(),
            client,
            sections: HashMap::new(),
        })
    }

    /// Open a session: the server must accept the token and list its sections.
    pub fn connect(server: &str, token: &str) -> Result<Self, LibraryError> {
        let mut client = Self::new(server, token)?;
        let container: MediaContainer = client
            .get(&client.endpoint("/library/sections")?)
            .map_err(|e| LibraryError::Connect {
                server: client.server.to_string(),
                reason: e.to_string(),
            })?;

        for dir in container.into_directories() {
            if let (Some(key), Some(title)) = (dir.key, dir.title) {
                client.sections.insert(title, key);
            }
        }
        info!(
            sections = client.sections.len(),
            "Connected to Plex server {}", client.server
        );
        Ok(client)
    }

    fn endpoint(&self, path: &str) -> Result<Url, LibraryError> {
        self.server.join(path.trim_start_matches('/')).map_err(|e| LibraryError::Request {
            url: format!("{}{}", self.server, path),
            reason: e.to_string(),
        })
    }

    /// `/library/sections/{key}/all?type={1|4}&duplicate=1`
    pub fn duplicates_url(&self, section_key: &str, kind: MediaKind) -> Result<Url, LibraryError> {
        let mut url = self.endpoint(&format!("/library/sections/{}/all", section_key))?;
        url.query_pairs_mut()
            .append_pair("type", &kind.plex_type().to_string())
            .append_pair("duplicate", "1");
        Ok(url)
    }

    /// `{container_key}/media/{media_id}`
    pub fn delete_url(&self, container_key: &str, media_id: u64) -> Result<Url, LibraryError> {
        self.endpoint(&format!("{}/media/{}", container_key, media_id))
    }

    fn request(&self, method: Method, url: &Url) -> Result<Response, LibraryError> {
        debug!("Request: {} {}", method, url);
        let response = self
            .client
            .request(method, url.clone())
            .header(TOKEN_HEADER, &self.token)
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|e| LibraryError::Request {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(LibraryError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            })
        }
    }

    fn get<T: DeserializeOwned>(&self, url: &Url) -> Result<T, LibraryError> {
        let text = self
            .request(Method::GET, url)?
            .text()
            .map_err(|e| LibraryError::Request {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        serde_json::from_str(&text).map_err(|e| LibraryError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    /// Full metadata of one item, which includes the audio streams of each part
    fn item_detail(&self, rating_key: &str) -> Result<Option<LibraryItem>, LibraryError> {
        let url = self.endpoint(&format!("/library/metadata/{}", rating_key))?;
        let container: MediaContainer = self.get(&url)?;
        Ok(container.into_metadata().into_iter().next())
    }

    fn with_detail(&self, item: LibraryItem) -> LibraryItem {
        let Some(rating_key) = item.rating_key.as_deref() else {
            return item;
        };
        match self.item_detail(rating_key) {
            Ok(Some(detail)) if !detail.media.is_empty() => detail,
            Ok(_) => item,
            Err(e) => {
                warn!("Using listing data for {:?}: {}", item.display_title(), e);
                item
            }
        }
    }
}

impl LibraryClient for PlexClient {
    fn duplicates(&self, section: &LibrarySection) -> Result<Vec<LibraryItem>, LibraryError> {
        let key = self
            .sections
            .get(&section.name)
            .ok_or_else(|| LibraryError::SectionNotFound {
                name: section.name.clone(),
            })?;

        let container: MediaContainer = self.get(&self.duplicates_url(key, section.kind)?)?;
        let items = container.into_metadata();
        debug!(count = items.len(), "Duplicate listing for {:?}", section.name);

        Ok(items.into_iter().map(|item| self.with_detail(item)).collect())
    }

    fn delete_media(&self, container_key: &str, media_id: u64) -> Result<(), LibraryError> {
        let url = self.delete_url(container_key, media_id)?;
        self.request(Method::DELETE, &url)?;
        info!("Deleted media item {} of {}", media_id, container_key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> PlexClient {
        PlexClient::new("http://plex.local:32400", "secret").unwrap()
    }

    #[test]
    fn duplicates_url_carries_type_and_flag() {
        let url = client().duplicates_url("3", MediaKind::Episode).unwrap();
        assert_eq!(
            url.as_str(),
            "http://plex.local:32400/library/sections/3/all?type=4&duplicate=1"
        );
    }

    #[test]
    fn delete_url_joins_item_key() {
        let url = client().delete_url("/library/metadata/1234", 7).unwrap();
        assert_eq!(url.as_str(), "http://plex.local:32400/library/metadata/1234/media/7");
    }

    #[test]
    fn trailing_slash_on_server_is_harmless() {
        let client = PlexClient::new("http://plex.local:32400/", "secret").unwrap();
        let url = client.delete_url("/library/metadata/1", 2).unwrap();
        assert_eq!(url.as_str(), "http://plex.local:32400/library/metadata/1/media/2");
    }

    #[test]
    fn server_path_prefix_is_kept() {
        for server in ["https://host.example/plex", "https://host.example/plex/"] {
            let client = PlexClient::new(server, "secret").unwrap();
            let url = client.delete_url("/library/metadata/1", 2).unwrap();
            assert_eq!(url.as_str(), "https://host.example/plex/library/metadata/1/media/2");

            let url = client.duplicates_url("5", MediaKind::Movie).unwrap();
            assert_eq!(
                url.as_str(),
                "https://host.example/plex/library/sections/5/all?type=1&duplicate=1"
            );
        }
    }

    #[test]
    fn invalid_server_is_rejected() {
        let result = PlexClient::new("not a url", "secret");
        assert!(matches!(result, Err(LibraryError::Connect { .. })));
    }

    #[test]
    fn unknown_section_is_reported() {
        let section = LibrarySection::new("Movies", MediaKind::Movie);
        let result = client().duplicates(&section);
        assert!(matches!(result, Err(LibraryError::SectionNotFound { .. })));
    }
}
