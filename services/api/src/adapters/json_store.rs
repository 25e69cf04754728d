//! services/api/src/adapters/json_store.rs
//!
//! This module contains the document store adapter, the concrete implementation
//! of the `SettingsRepository` port from the `core` crate. The whole calendar
//! lives in one pretty-printed JSON file that is read and rewritten wholesale.

use async_trait::async_trait;
use advent_calendar_core::domain::{Gift, GiftLike, Settings, DEFAULT_ADMIN_PASSWORD};
use advent_calendar_core::ports::{PortError, PortResult, SettingsRepository};
use advent_calendar_core::time::{format_timestamp, parse_timestamp};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A file-backed adapter that implements the `SettingsRepository` port.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a new `JsonFileStore`. Nothing touches the disk until first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_parent_dir(&self) -> PortResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                PortError::Io(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }
        Ok(())
    }
}

//=========================================================================================
// "Impure" Document Record Structs
//=========================================================================================

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsRecord {
    christmas_date: String,
    #[serde(default)]
    gifts: Vec<GiftRecord>,
    #[serde(default)]
    likes: Vec<GiftLikeRecord>,
    #[serde(default)]
    final_message: String,
    #[serde(default = "default_admin_password")]
    admin_password: String,
    #[serde(default)]
    development_mode: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    simulated_date: Option<String>,
}

fn default_admin_password() -> String {
    DEFAULT_ADMIN_PASSWORD.to_string()
}

impl SettingsRecord {
    fn to_domain(self) -> PortResult<Settings> {
        Ok(Settings {
            christmas_date: parse_stored(&self.christmas_date, "christmasDate")?,
            gifts: self
                .gifts
                .into_iter()
                .map(GiftRecord::to_domain)
                .collect::<PortResult<_>>()?,
            likes: self
                .likes
                .into_iter()
                .map(GiftLikeRecord::to_domain)
                .collect::<PortResult<_>>()?,
            final_message: self.final_message,
            admin_password: self.admin_password,
            development_mode: self.development_mode,
            simulated_date: self
                .simulated_date
                .as_deref()
                .map(|raw| parse_stored(raw, "simulatedDate"))
                .transpose()?,
        })
    }

    fn from_domain(settings: &Settings) -> Self {
        Self {
            christmas_date: format_timestamp(&settings.christmas_date),
            gifts: settings.gifts.iter().map(GiftRecord::from_domain).collect(),
            likes: settings.likes.iter().map(GiftLikeRecord::from_domain).collect(),
            final_message: settings.final_message.clone(),
            admin_password: settings.admin_password.clone(),
            development_mode: settings.development_mode,
            simulated_date: settings.simulated_date.as_ref().map(format_timestamp),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GiftRecord {
    id: u32,
    #[serde(default)]
    text: String,
    #[serde(default)]
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    opened: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    opened_at: Option<String>,
}
impl GiftRecord {
    fn to_domain(self) -> PortResult<Gift> {
        Ok(Gift {
            id: self.id,
            order: self.order,
            title: self.title,
            text: self.text,
            image: self.image.filter(|url| !url.is_empty()),
            opened: self.opened.unwrap_or(false),
            opened_at: self
                .opened_at
                .as_deref()
                .map(|raw| parse_stored(raw, "openedAt"))
                .transpose()?,
        })
    }

    fn from_domain(gift: &Gift) -> Self {
        Self {
            id: gift.id,
            text: gift.text.clone(),
            title: gift.title.clone(),
            image: gift.image.clone(),
            order: gift.order,
            opened: gift.opened.then_some(true),
            opened_at: gift.opened_at.as_ref().map(format_timestamp),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GiftLikeRecord {
    gift_id: u32,
    liked: bool,
    liked_at: String,
}
impl GiftLikeRecord {
    fn to_domain(self) -> PortResult<GiftLike> {
        Ok(GiftLike {
            gift_id: self.gift_id,
            liked: self.liked,
            liked_at: parse_stored(&self.liked_at, "likedAt")?,
        })
    }

    fn from_domain(like: &GiftLike) -> Self {
        Self {
            gift_id: like.gift_id,
            liked: like.liked,
            liked_at: format_timestamp(&like.liked_at),
        }
    }
}

fn parse_stored(
    raw: &str,
    field: &str,
) -> PortResult<chrono::DateTime<chrono::FixedOffset>> {
    parse_timestamp(raw).map_err(|e| PortError::Corrupt(format!("{}: {}", field, e)))
}

//=========================================================================================
// `SettingsRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl SettingsRepository for JsonFileStore {
    async fn load(&self) -> PortResult<Option<Settings>> {
        self.ensure_parent_dir().await?;

        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(PortError::Io(format!(
                    "cannot read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let record: SettingsRecord =
            serde_json::from_str(&raw).map_err(|e| PortError::Corrupt(e.to_string()))?;
        record.to_domain().map(Some)
    }

    async fn save(&self, settings: &Settings) -> PortResult<()> {
        self.ensure_parent_dir().await?;

        let json = serde_json::to_string_pretty(&SettingsRecord::from_domain(settings))
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Write next to the target and rename so readers never see a torn file.
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)
            .await
            .map_err(|e| PortError::Io(format!("cannot write {}: {}", tmp_path.display(), e)))?;
        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| PortError::Io(format!("cannot replace {}: {}", self.path.display(), e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_loads_as_none_and_creates_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("data").join("settings.json"));

        assert!(store.load().await.unwrap().is_none());
        assert!(dir.path().join("data").is_dir());
    }

    #[tokio::test]
    async fn saved_document_reads_back_identically() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("settings.json"));
        let mut settings = Settings::default();
        settings.gifts[0].opened = true;
        settings.gifts[0].opened_at = Some(parse_timestamp("2024-12-24T08:00:00+01:00").unwrap());
        settings.simulated_date = Some(parse_timestamp("2024-12-20T00:00:00Z").unwrap());

        store.save(&settings).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(settings));
        assert!(!dir.path().join("settings.json.tmp").exists());
    }

    #[tokio::test]
    async fn reads_the_camel_case_document_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let raw = r#"{
          "christmasDate": "2024-12-25T00:00:00",
          "gifts": [
            { "id": 1, "title": "Hello", "text": "World", "order": 1, "opened": true, "openedAt": "2024-12-24T10:00:00.000Z" },
            { "id": 7, "title": "", "text": "", "order": 2, "image": "" }
          ],
          "finalMessage": "Bye",
          "adminPassword": "hunter2",
          "developmentMode": false
        }"#;
        std::fs::write(&path, raw).unwrap();

        let settings = JsonFileStore::new(&path).load().await.unwrap().unwrap();
        assert_eq!(settings.gifts.len(), 2);
        assert!(settings.gifts[0].opened);
        assert_eq!(settings.gifts[1].image, None);
        assert!(settings.likes.is_empty());
        assert_eq!(settings.admin_password, "hunter2");
        assert_eq!(format_timestamp(&settings.christmas_date), "2024-12-25T00:00:00Z");
    }

    #[tokio::test]
    async fn unparseable_document_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonFileStore::new(&path).load().await.unwrap_err();
        assert!(matches!(err, PortError::Corrupt(_)));
    }
}
