use std::fmt;
use std::sync::Arc;

use marquee_common::{CatalogItemId, MediaKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::session::{ApiClient, ApiRequest, ClientError};

/// A per-user list of saved titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SavedList {
    Favorites,
    WatchLater,
}

impl SavedList {
    /// Backend path of the list.
    pub fn path(self) -> &'static str {
        match self {
            Self::Favorites => "/favorites",
            Self::WatchLater => "/watch-later",
        }
    }
}

impl fmt::Display for SavedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Favorites => write!(f, "favorites"),
            Self::WatchLater => write!(f, "watch later"),
        }
    }
}

/// A title saved to one of the user's lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedTitle {
    pub media_id: CatalogItemId,
    pub media_type: MediaKind,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RemoveTitle {
    media_id: CatalogItemId,
    media_type: MediaKind,
}

/// Favorites and watch-later calls. All of them require a session.
pub struct LibraryApi {
    client: Arc<ApiClient>,
}

impl LibraryApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self, list: SavedList) -> Result<Vec<SavedTitle>, ClientError> {
        let titles: Vec<SavedTitle> = self
            .client
            .send_json(&ApiRequest::get(list.path()))
            .await?;
        debug!(%list, count = titles.len(), "Fetched saved titles");
        Ok(titles)
    }

    pub async fn add(&self, list: SavedList, title: &SavedTitle) -> Result<(), ClientError> {
        let request = ApiRequest::post(format!("{}/add", list.path())).json(title)?;
        self.client.send_empty(&request).await
    }

    pub async fn remove(
        &self,
        list: SavedList,
        media_id: CatalogItemId,
        media_type: MediaKind,
    ) -> Result<(), ClientError> {
        let request = ApiRequest::post(format!("{}/remove", list.path())).json(&RemoveTitle {
            media_id,
            media_type,
        })?;
        self.client.send_empty(&request).await
    }
}
