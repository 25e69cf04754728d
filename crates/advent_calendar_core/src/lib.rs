pub mod catalog;
pub mod domain;
pub mod ports;
pub mod schedule;
pub mod service;
pub mod time;

pub use domain::{
    CalendarView, CatalogReport, Countdown, CountdownSnapshot, Gift, GiftLike, GiftStatus,
    GiftView, PublicSettings, Settings, DEFAULT_ADMIN_PASSWORD, MAX_CATALOG_DAYS, MAX_GENERATED_GIFTS,
};
pub use ports::{Clock, PortError, PortResult, SettingsRepository};
pub use service::CalendarService;
