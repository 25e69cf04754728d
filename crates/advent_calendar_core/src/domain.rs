//! crates/advent_calendar_core/src/domain.rs
//!
//! Defines the pure, core data structures for the calendar.
//! These structs are independent of the JSON document format and of HTTP.

use chrono::{DateTime, FixedOffset, NaiveDate};

/// Password accepted before any document has been written.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Upper bound on the number of gifts produced by a regeneration.
pub const MAX_GENERATED_GIFTS: u32 = 25;

/// Largest planned calendar length accepted by the catalog tools.
pub const MAX_CATALOG_DAYS: u32 = 366;

/// One calendar entry, unlocked on day-index `order`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gift {
    pub id: u32,
    pub order: u32,
    pub title: String,
    pub text: String,
    pub image: Option<String>,
    pub opened: bool,
    pub opened_at: Option<DateTime<FixedOffset>>,
}

impl Gift {
    /// A gift with no content, as produced by regeneration and gap filling.
    pub fn empty(id: u32, order: u32) -> Self {
        Self {
            id,
            order,
            title: String::new(),
            text: String::new(),
            image: None,
            opened: false,
            opened_at: None,
        }
    }

    /// A gift cannot be opened while either its title or its text is blank.
    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty() || self.text.trim().is_empty()
    }
}

/// Engagement record for a single gift, created lazily on the first toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiftLike {
    pub gift_id: u32,
    pub liked: bool,
    pub liked_at: DateTime<FixedOffset>,
}

/// The whole persisted document, as held by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub christmas_date: DateTime<FixedOffset>,
    pub gifts: Vec<Gift>,
    pub likes: Vec<GiftLike>,
    pub final_message: String,
    pub admin_password: String,
    pub development_mode: bool,
    pub simulated_date: Option<DateTime<FixedOffset>>,
}

impl Settings {
    pub fn gift(&self, id: u32) -> Option<&Gift> {
        self.gifts.iter().find(|g| g.id == id)
    }

    pub fn like_for(&self, gift_id: u32) -> Option<&GiftLike> {
        self.likes.iter().find(|l| l.gift_id == gift_id)
    }

    pub fn is_liked(&self, gift_id: u32) -> bool {
        self.like_for(gift_id).is_some_and(|l| l.liked)
    }

    /// Gifts in display order: `order` ascending, insertion order on ties.
    pub fn gifts_in_display_order(&self) -> Vec<&Gift> {
        let mut gifts: Vec<&Gift> = self.gifts.iter().collect();
        gifts.sort_by_key(|g| g.order);
        gifts
    }

    /// Strips the admin password for untrusted callers.
    pub fn to_public(&self) -> PublicSettings {
        PublicSettings {
            christmas_date: self.christmas_date,
            gifts: self.gifts.clone(),
            likes: self.likes.clone(),
            final_message: self.final_message.clone(),
            development_mode: self.development_mode,
            simulated_date: self.simulated_date,
        }
    }

    /// Rebuilds a full document from a public copy and the stored secret.
    pub fn from_public(public: PublicSettings, admin_password: String) -> Self {
        Self {
            christmas_date: public.christmas_date,
            gifts: public.gifts,
            likes: public.likes,
            final_message: public.final_message,
            admin_password,
            development_mode: public.development_mode,
            simulated_date: public.simulated_date,
        }
    }
}

impl Default for Settings {
    /// The document written on first start: three sample gifts anchored on
    /// Christmas 2024 at midnight UTC.
    fn default() -> Self {
        let christmas_date = NaiveDate::from_ymd_opt(2024, 12, 25)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc().fixed_offset())
            .unwrap_or_default();

        let sample = |id: u32, title: &str, text: &str| Gift {
            title: title.to_string(),
            text: text.to_string(),
            ..Gift::empty(id, id)
        };

        Self {
            christmas_date,
            gifts: vec![
                sample(1, "First gift", "A little something to start this magical calendar! 🎁"),
                sample(2, "Second surprise", "A small treat to make you smile 😊"),
                sample(3, "Third gift", "Something special just for you ✨"),
            ],
            likes: Vec::new(),
            final_message: "Merry Christmas, my love! 🎄 After all these little daily gifts, here is the best one: spending Christmas with you. 💖".to_string(),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            development_mode: false,
            simulated_date: None,
        }
    }
}

/// The document as exposed to untrusted callers: never carries the password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicSettings {
    pub christmas_date: DateTime<FixedOffset>,
    pub gifts: Vec<Gift>,
    pub likes: Vec<GiftLike>,
    pub final_message: String,
    pub development_mode: bool,
    pub simulated_date: Option<DateTime<FixedOffset>>,
}

/// Time remaining until the target date, clamped at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Countdown {
    pub fn is_elapsed(&self) -> bool {
        self.days <= 0 && self.hours <= 0 && self.minutes <= 0 && self.seconds <= 0
    }
}

/// Open state of a gift at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GiftStatus {
    Locked,
    Unlockable,
    Opened,
}

/// A gift annotated with everything the calendar page needs to render it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiftView {
    pub gift: Gift,
    pub status: GiftStatus,
    pub empty: bool,
    pub liked: bool,
}

/// Snapshot of the calendar at the effective now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarView {
    pub now: DateTime<FixedOffset>,
    pub christmas_date: DateTime<FixedOffset>,
    pub countdown: Countdown,
    pub is_target_day: bool,
    /// Only revealed once the target day has been reached.
    pub final_message: Option<String>,
    pub development_mode: bool,
    pub gifts: Vec<GiftView>,
}

/// Countdown state pushed to the page every second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownSnapshot {
    pub now: DateTime<FixedOffset>,
    pub countdown: Countdown,
    pub is_target_day: bool,
}

/// Consistency of the gift list against an intended number of days.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogReport {
    pub max_days: u32,
    pub total_gifts: usize,
    pub opened_gifts: usize,
    pub liked_gifts: usize,
    pub missing_days: Vec<u32>,
    pub extra_gift_ids: Vec<u32>,
    pub duplicate_orders: Vec<u32>,
}
