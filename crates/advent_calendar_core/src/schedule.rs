//! crates/advent_calendar_core/src/schedule.rs
//!
//! The unlock scheduler. Pure functions over the document and an instant;
//! nothing here reads the real clock or touches storage.
//!
//! The schedule is countdown-indexed: on day `d` before the target date the
//! gifts with `order <= total - d` are unlockable, so exactly one more index
//! opens per calendar day and every gift is open on the target date itself.

use chrono::{DateTime, FixedOffset, Utc};
use crate::domain::{Countdown, Gift, GiftStatus, Settings};

const MS_PER_DAY: i64 = 86_400_000;
const MS_PER_HOUR: i64 = 3_600_000;
const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_SECOND: i64 = 1_000;

/// The instant all date math runs against: the simulated date while
/// development mode is on, the real instant otherwise.
pub fn effective_now(settings: &Settings, real_now: DateTime<Utc>) -> DateTime<FixedOffset> {
    match (settings.development_mode, settings.simulated_date) {
        (true, Some(simulated)) => simulated,
        _ => real_now.fixed_offset(),
    }
}

/// Whole calendar days from `now` to `target`, both truncated to dates in the
/// target's own offset. Negative once the target day has passed.
pub fn days_until_target(now: DateTime<FixedOffset>, target: DateTime<FixedOffset>) -> i64 {
    let today = now.with_timezone(target.offset()).date_naive();
    (target.date_naive() - today).num_days()
}

/// Whether the gift at day-index `gift_order` may be opened at `now`.
pub fn can_open(
    gift_order: u32,
    total_gifts: usize,
    christmas_date: DateTime<FixedOffset>,
    now: DateTime<FixedOffset>,
) -> bool {
    let days = days_until_target(now, christmas_date);
    days >= 0 && i64::from(gift_order) <= total_gifts as i64 - days
}

/// Remaining time to the target, decomposed and clamped at zero.
pub fn countdown(now: DateTime<FixedOffset>, christmas_date: DateTime<FixedOffset>) -> Countdown {
    let distance = (christmas_date - now).num_milliseconds();
    if distance <= 0 {
        return Countdown::default();
    }

    Countdown {
        days: distance / MS_PER_DAY,
        hours: (distance % MS_PER_DAY) / MS_PER_HOUR,
        minutes: (distance % MS_PER_HOUR) / MS_PER_MINUTE,
        seconds: (distance % MS_PER_MINUTE) / MS_PER_SECOND,
    }
}

/// True once the target instant has been reached and the countdown is spent.
pub fn is_target_day(now: DateTime<FixedOffset>, christmas_date: DateTime<FixedOffset>) -> bool {
    countdown(now, christmas_date).is_elapsed() && now >= christmas_date
}

/// Ceiling of the number of days between `now` and `target`, used to size
/// a regenerated calendar. Zero or negative when the target is not ahead.
pub fn days_until_ceil(now: DateTime<FixedOffset>, target: DateTime<FixedOffset>) -> i64 {
    let distance = (target - now).num_milliseconds();
    if distance <= 0 {
        return distance / MS_PER_DAY;
    }
    (distance + MS_PER_DAY - 1) / MS_PER_DAY
}

pub fn gift_status(gift: &Gift, settings: &Settings, now: DateTime<FixedOffset>) -> GiftStatus {
    if gift.opened {
        GiftStatus::Opened
    } else if can_open(gift.order, settings.gifts.len(), settings.christmas_date, now) {
        GiftStatus::Unlockable
    } else {
        GiftStatus::Locked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::parse_timestamp;

    fn at(raw: &str) -> DateTime<FixedOffset> {
        parse_timestamp(raw).unwrap()
    }

    #[test]
    fn every_gift_opens_on_the_target_day() {
        let target = at("2024-12-25T00:00:00Z");
        let now = at("2024-12-25T18:30:00Z");
        assert!(can_open(1, 3, target, now));
        assert!(can_open(2, 3, target, now));
        assert!(can_open(3, 3, target, now));
    }

    #[test]
    fn two_days_out_only_the_first_index_opens() {
        let target = at("2024-12-25T00:00:00Z");
        let now = at("2024-12-23T23:59:59Z");
        assert_eq!(days_until_target(now, target), 2);
        assert!(can_open(1, 3, target, now));
        assert!(!can_open(2, 3, target, now));
        assert!(!can_open(3, 3, target, now));
    }

    #[test]
    fn nothing_opens_after_the_target_day() {
        let target = at("2024-12-25T00:00:00Z");
        let now = at("2024-12-26T00:00:01Z");
        assert!(!can_open(1, 3, target, now));
    }

    #[test]
    fn nothing_opens_before_the_calendar_starts() {
        let target = at("2024-12-25T00:00:00Z");
        let now = at("2024-12-01T12:00:00Z");
        assert!(!can_open(1, 3, target, now));
    }

    #[test]
    fn days_are_truncated_in_the_target_offset() {
        // 23:30 UTC on the 24th is already the 25th in Paris.
        let target = at("2024-12-25T00:00:00+01:00");
        let now = at("2024-12-24T23:30:00Z");
        assert_eq!(days_until_target(now, target), 0);
    }

    #[test]
    fn countdown_decomposes_and_clamps() {
        let target = at("2024-12-25T00:00:00Z");
        let now = at("2024-12-23T21:58:30Z");
        assert_eq!(
            countdown(now, target),
            Countdown { days: 1, hours: 2, minutes: 1, seconds: 30 }
        );
        assert_eq!(countdown(at("2024-12-26T00:00:00Z"), target), Countdown::default());
    }

    #[test]
    fn target_day_is_an_instant_comparison() {
        let target = at("2024-12-25T12:00:00Z");
        assert!(!is_target_day(at("2024-12-25T11:59:59Z"), target));
        assert!(is_target_day(at("2024-12-25T12:00:00Z"), target));
    }

    #[test]
    fn ceil_days_rounds_partial_days_up() {
        let now = at("2024-12-01T12:00:00Z");
        assert_eq!(days_until_ceil(now, at("2024-12-02T12:00:00Z")), 1);
        assert_eq!(days_until_ceil(now, at("2024-12-02T12:00:01Z")), 2);
        assert_eq!(days_until_ceil(now, now), 0);
        assert!(days_until_ceil(now, at("2024-11-30T12:00:00Z")) < 0);
    }

    #[test]
    fn simulated_date_only_applies_in_development_mode() {
        let mut settings = Settings::default();
        let real = at("2030-01-01T00:00:00Z").with_timezone(&Utc);
        settings.simulated_date = Some(at("2024-12-20T00:00:00Z"));

        assert_eq!(effective_now(&settings, real), real.fixed_offset());
        settings.development_mode = true;
        assert_eq!(effective_now(&settings, real), at("2024-12-20T00:00:00Z"));
    }
}
