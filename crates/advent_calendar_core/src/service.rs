//! crates/advent_calendar_core/src/service.rs
//!
//! `CalendarService` is the single access point to the document. Every
//! operation loads the whole document, applies one mutation from `catalog`,
//! and writes the whole document back while holding one async mutex, so two
//! requests never interleave their reads and writes. There is no version
//! check: the last completed write wins.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::catalog;
use crate::domain::{
    CalendarView, CatalogReport, CountdownSnapshot, GiftLike, GiftView, PublicSettings, Settings,
    DEFAULT_ADMIN_PASSWORD,
};
use crate::ports::{Clock, PortResult, SettingsRepository};
use crate::schedule;

/// The two clocks a mutation sees. `effective` drives unlock decisions and
/// honours the simulated date; `real` is what gets stored on records.
#[derive(Debug, Clone, Copy)]
struct Instants {
    effective: DateTime<FixedOffset>,
    real: DateTime<FixedOffset>,
}

pub struct CalendarService {
    repository: Arc<dyn SettingsRepository>,
    clock: Arc<dyn Clock>,
    lock: Mutex<()>,
}

impl CalendarService {
    pub fn new(repository: Arc<dyn SettingsRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            lock: Mutex::new(()),
        }
    }

    /// Reads the document, writing the default one first if none exists.
    /// Callers must hold `self.lock`.
    async fn load_or_bootstrap(&self) -> PortResult<Settings> {
        if let Some(settings) = self.repository.load().await? {
            return Ok(settings);
        }

        info!("No settings document found, writing defaults");
        let settings = Settings::default();
        self.repository.save(&settings).await?;
        Ok(settings)
    }

    /// Runs one read-modify-write cycle. Nothing is written when `mutate` fails.
    async fn modify<T>(
        &self,
        operation: &str,
        mutate: impl FnOnce(&mut Settings, Instants) -> PortResult<T>,
    ) -> PortResult<T> {
        let _guard = self.lock.lock().await;

        let result: PortResult<T> = async {
            let mut settings = self.load_or_bootstrap().await?;
            let real_now = self.clock.now();
            let instants = Instants {
                effective: schedule::effective_now(&settings, real_now),
                real: real_now.fixed_offset(),
            };
            let value = mutate(&mut settings, instants)?;
            self.repository.save(&settings).await?;
            Ok(value)
        }
        .await;

        if let Err(e) = &result {
            error!("{} failed: {:?}", operation, e);
        }
        result
    }

    async fn read(&self) -> PortResult<Settings> {
        let _guard = self.lock.lock().await;
        self.load_or_bootstrap().await.inspect_err(|e| {
            error!("Failed to load settings: {:?}", e);
        })
    }

    /// The effective now for an already loaded document.
    pub fn effective_now(&self, settings: &Settings) -> DateTime<FixedOffset> {
        schedule::effective_now(settings, self.clock.now())
    }

    //=====================================================================================
    // Reads
    //=====================================================================================

    /// The document without its admin password.
    pub async fn load(&self) -> PortResult<PublicSettings> {
        Ok(self.read().await?.to_public())
    }

    pub async fn calendar(&self) -> PortResult<CalendarView> {
        let settings = self.read().await?;
        let now = self.effective_now(&settings);
        let is_target_day = schedule::is_target_day(now, settings.christmas_date);

        let gifts = settings
            .gifts_in_display_order()
            .into_iter()
            .map(|gift| GiftView {
                status: schedule::gift_status(gift, &settings, now),
                empty: gift.is_empty(),
                liked: settings.is_liked(gift.id),
                gift: gift.clone(),
            })
            .collect();

        Ok(CalendarView {
            now,
            christmas_date: settings.christmas_date,
            countdown: schedule::countdown(now, settings.christmas_date),
            is_target_day,
            final_message: is_target_day.then(|| settings.final_message.clone()),
            development_mode: settings.development_mode,
            gifts,
        })
    }

    pub async fn countdown(&self) -> PortResult<CountdownSnapshot> {
        let settings = self.read().await?;
        let now = self.effective_now(&settings);
        Ok(CountdownSnapshot {
            now,
            countdown: schedule::countdown(now, settings.christmas_date),
            is_target_day: schedule::is_target_day(now, settings.christmas_date),
        })
    }

    /// Without `max_days` the report is sized by the current number of gifts.
    pub async fn catalog_report(&self, max_days: Option<u32>) -> PortResult<CatalogReport> {
        let settings = self.read().await?;
        let max_days = max_days
            .unwrap_or_else(|| u32::try_from(settings.gifts.len()).unwrap_or(u32::MAX));
        catalog::report(&settings, max_days)
    }

    //=====================================================================================
    // Catalog
    //=====================================================================================

    /// Replaces the whole document. Likes without a matching gift are dropped.
    pub async fn save(&self, settings: Settings) -> PortResult<()> {
        let dropped = self
            .modify("save", move |current, _| catalog::replace(current, settings))
            .await?;
        if dropped > 0 {
            warn!("Dropped {} like records without a matching gift", dropped);
        }
        info!("Settings saved");
        Ok(())
    }

    pub async fn regenerate(&self, christmas_date: DateTime<FixedOffset>) -> PortResult<u32> {
        let count = self
            .modify("regenerate", |settings, at| {
                catalog::regenerate(settings, christmas_date, at.effective)
            })
            .await?;
        info!("Regenerated {} empty gifts for {}", count, christmas_date);
        Ok(count)
    }

    pub async fn fill_missing(&self, max_days: u32) -> PortResult<Vec<u32>> {
        let created = self
            .modify("fill_missing", |settings, _| catalog::fill_missing(settings, max_days))
            .await?;
        info!("Created {} gifts for missing days up to {}", created.len(), max_days);
        Ok(created)
    }

    pub async fn update_gift(
        &self,
        id: u32,
        title: String,
        text: String,
        image: Option<String>,
    ) -> PortResult<()> {
        self.modify("update_gift", |settings, _| {
            catalog::update_gift(settings, id, title, text, image)
        })
        .await
    }

    pub async fn delete_gift(&self, id: u32) -> PortResult<()> {
        let removed = self
            .modify("delete_gift", |settings, _| Ok(catalog::delete_gift(settings, id)))
            .await?;
        if !removed {
            warn!("Delete requested for unknown gift {}", id);
        }
        Ok(())
    }

    pub async fn prune_beyond(&self, max_days: u32) -> PortResult<Vec<u32>> {
        let removed = self
            .modify("prune_beyond", |settings, _| Ok(catalog::prune_beyond(settings, max_days)))
            .await?;
        info!("Pruned {} gifts beyond day {}", removed.len(), max_days);
        Ok(removed)
    }

    //=====================================================================================
    // Engagement
    //=====================================================================================

    pub async fn toggle_like(&self, gift_id: u32) -> PortResult<GiftLike> {
        self.modify("toggle_like", |settings, at| {
            catalog::toggle_like(settings, gift_id, at.real)
        })
        .await
    }

    pub async fn mark_opened(&self, gift_id: u32) -> PortResult<()> {
        self.modify("mark_opened", |settings, at| {
            catalog::mark_opened(settings, gift_id, at.effective, at.real).map(|_| ())
        })
        .await
    }

    //=====================================================================================
    // Admin authentication
    //=====================================================================================

    /// Plaintext comparison against the stored password, or against the
    /// compiled-in default while no document exists. Never writes.
    pub async fn authenticate(&self, password: &str) -> PortResult<bool> {
        let _guard = self.lock.lock().await;
        let stored = self.repository.load().await.inspect_err(|e| {
            error!("Failed to load settings for authentication: {:?}", e);
        })?;

        Ok(match stored {
            Some(settings) => settings.admin_password == password,
            None => password == DEFAULT_ADMIN_PASSWORD,
        })
    }

    /// Replaces the password. Returns `false` without writing when
    /// `old_password` does not match.
    pub async fn change_password(&self, old_password: &str, new_password: &str) -> PortResult<bool> {
        let changed = self
            .modify("change_password", |settings, _| {
                if settings.admin_password != old_password {
                    return Ok(false);
                }
                settings.admin_password = new_password.to_string();
                Ok(true)
            })
            .await?;

        if changed {
            info!("Admin password changed");
        } else {
            warn!("Password change rejected: old password mismatch");
        }
        Ok(changed)
    }
}
