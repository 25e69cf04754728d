//! crates/advent_calendar_core/src/catalog.rs
//!
//! Gift catalog and engagement mutations over an in-memory document.
//!
//! Each function either applies its whole effect to `settings` or returns an
//! error without touching it, so the caller can persist the result as-is.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::{DateTime, FixedOffset};
use crate::domain::{
    CatalogReport, Gift, GiftLike, Settings, MAX_CATALOG_DAYS, MAX_GENERATED_GIFTS,
};
use crate::ports::{PortError, PortResult};
use crate::schedule;

/// Replaces every gift with `min(ceil(days until target), 25)` empty gifts
/// numbered `1..=count` and moves the target date. Likes of the discarded
/// gifts are dropped with them. Returns the number of gifts created.
pub fn regenerate(
    settings: &mut Settings,
    christmas_date: DateTime<FixedOffset>,
    now: DateTime<FixedOffset>,
) -> PortResult<u32> {
    let days_until = schedule::days_until_ceil(now, christmas_date);
    if days_until <= 0 {
        return Err(PortError::InvalidDate(
            "the target date must be in the future".to_string(),
        ));
    }

    let count = u32::try_from(days_until)
        .unwrap_or(u32::MAX)
        .min(MAX_GENERATED_GIFTS);

    settings.gifts = (1..=count).map(|i| Gift::empty(i, i)).collect();
    settings.likes.clear();
    settings.christmas_date = christmas_date;
    Ok(count)
}

/// Swaps in a whole document supplied by the editor. Gift ids must be
/// unique; likes that point at no gift, or repeat a gift, are dropped.
/// Returns how many like records were discarded.
pub fn replace(current: &mut Settings, mut incoming: Settings) -> PortResult<usize> {
    let mut ids = HashSet::new();
    if let Some(gift) = incoming.gifts.iter().find(|g| !ids.insert(g.id)) {
        return Err(PortError::InvalidInput(format!("duplicate gift id {}", gift.id)));
    }

    let before = incoming.likes.len();
    let mut liked = HashSet::new();
    incoming
        .likes
        .retain(|l| ids.contains(&l.gift_id) && liked.insert(l.gift_id));

    let dropped = before - incoming.likes.len();
    *current = incoming;
    Ok(dropped)
}

fn check_max_days(max_days: u32) -> PortResult<()> {
    if max_days > MAX_CATALOG_DAYS {
        return Err(PortError::InvalidInput(format!(
            "maxDays must be at most {}, got {}",
            MAX_CATALOG_DAYS, max_days
        )));
    }
    Ok(())
}

/// Day-indices in `1..=max_days` that no gift currently occupies.
pub fn missing_days(settings: &Settings, max_days: u32) -> Vec<u32> {
    let taken: HashSet<u32> = settings.gifts.iter().map(|g| g.order).collect();
    (1..=max_days).filter(|day| !taken.contains(day)).collect()
}

/// Appends an empty gift for every missing day-index. New ids are the
/// current maximum id offset by the day, so they never collide with each
/// other or with existing ids. Returns the created ids.
pub fn fill_missing(settings: &mut Settings, max_days: u32) -> PortResult<Vec<u32>> {
    check_max_days(max_days)?;

    let base_id = settings.gifts.iter().map(|g| g.id).max().unwrap_or(0);
    let created = missing_days(settings, max_days)
        .into_iter()
        .map(|day| {
            base_id
                .checked_add(day)
                .map(|id| Gift::empty(id, day))
                .ok_or_else(|| {
                    PortError::InvalidInput(format!(
                        "no free gift id above {} for day {}",
                        base_id, day
                    ))
                })
        })
        .collect::<PortResult<Vec<Gift>>>()?;

    let ids = created.iter().map(|g| g.id).collect();
    settings.gifts.extend(created);
    Ok(ids)
}

/// Replaces a gift's content. An empty or blank `image` clears it.
pub fn update_gift(
    settings: &mut Settings,
    id: u32,
    title: String,
    text: String,
    image: Option<String>,
) -> PortResult<()> {
    let gift = settings
        .gifts
        .iter_mut()
        .find(|g| g.id == id)
        .ok_or_else(|| PortError::NotFound(format!("Gift {} not found", id)))?;

    gift.title = title;
    gift.text = text;
    gift.image = image.filter(|url| !url.trim().is_empty());
    Ok(())
}

/// Removes a gift and its like record. Returns whether anything was removed.
pub fn delete_gift(settings: &mut Settings, id: u32) -> bool {
    let before = settings.gifts.len();
    settings.gifts.retain(|g| g.id != id);
    settings.likes.retain(|l| l.gift_id != id);
    settings.gifts.len() != before
}

/// Removes every gift whose `order` exceeds `max_days`, along with its like.
/// Returns the removed ids.
pub fn prune_beyond(settings: &mut Settings, max_days: u32) -> Vec<u32> {
    let removed: Vec<u32> = settings
        .gifts
        .iter()
        .filter(|g| g.order > max_days)
        .map(|g| g.id)
        .collect();

    settings.gifts.retain(|g| g.order <= max_days);
    settings.likes.retain(|l| !removed.contains(&l.gift_id));
    removed
}

/// Flips the like flag of a gift, creating the record as liked on first use.
/// `liked_at` is stamped on every toggle.
pub fn toggle_like(
    settings: &mut Settings,
    gift_id: u32,
    liked_at: DateTime<FixedOffset>,
) -> PortResult<GiftLike> {
    if settings.gift(gift_id).is_none() {
        return Err(PortError::NotFound(format!("Gift {} not found", gift_id)));
    }

    if let Some(like) = settings.likes.iter_mut().find(|l| l.gift_id == gift_id) {
        like.liked = !like.liked;
        like.liked_at = liked_at;
        return Ok(like.clone());
    }

    let like = GiftLike { gift_id, liked: true, liked_at };
    settings.likes.push(like.clone());
    Ok(like)
}

/// Marks a gift opened. The first `opened_at` is kept on later calls;
/// a gift that is not yet opened must be unlockable at `now`, which may be
/// the simulated clock while `opened_at` is always the real one.
pub fn mark_opened(
    settings: &mut Settings,
    gift_id: u32,
    now: DateTime<FixedOffset>,
    opened_at: DateTime<FixedOffset>,
) -> PortResult<Gift> {
    let total = settings.gifts.len();
    let christmas_date = settings.christmas_date;
    let gift = settings
        .gifts
        .iter_mut()
        .find(|g| g.id == gift_id)
        .ok_or_else(|| PortError::NotFound(format!("Gift {} not found", gift_id)))?;

    if gift.opened {
        return Ok(gift.clone());
    }

    if !schedule::can_open(gift.order, total, christmas_date, now) {
        return Err(PortError::Locked(format!(
            "gift {} (day {}) cannot be opened yet",
            gift_id, gift.order
        )));
    }

    gift.opened = true;
    gift.opened_at = Some(opened_at);
    Ok(gift.clone())
}

/// Summarises how the gift list lines up with an intended number of days.
pub fn report(settings: &Settings, max_days: u32) -> PortResult<CatalogReport> {
    check_max_days(max_days)?;

    let mut per_order: BTreeMap<u32, usize> = BTreeMap::new();
    for gift in &settings.gifts {
        *per_order.entry(gift.order).or_default() += 1;
    }

    let gift_ids: BTreeSet<u32> = settings.gifts.iter().map(|g| g.id).collect();

    Ok(CatalogReport {
        max_days,
        total_gifts: settings.gifts.len(),
        opened_gifts: settings.gifts.iter().filter(|g| g.opened).count(),
        liked_gifts: settings
            .likes
            .iter()
            .filter(|l| l.liked && gift_ids.contains(&l.gift_id))
            .count(),
        missing_days: missing_days(settings, max_days),
        extra_gift_ids: settings
            .gifts_in_display_order()
            .into_iter()
            .filter(|g| g.order > max_days)
            .map(|g| g.id)
            .collect(),
        duplicate_orders: per_order
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(order, _)| order)
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::parse_timestamp;

    fn at(raw: &str) -> DateTime<FixedOffset> {
        parse_timestamp(raw).unwrap()
    }

    fn orders(settings: &Settings) -> Vec<u32> {
        let mut orders: Vec<u32> = settings.gifts.iter().map(|g| g.order).collect();
        orders.sort_unstable();
        orders
    }

    #[test]
    fn regenerate_sizes_by_ceiling_of_days() {
        let mut settings = Settings::default();
        let now = at("2024-12-20T12:00:00Z");
        let count = regenerate(&mut settings, at("2024-12-25T00:00:00Z"), now).unwrap();

        assert_eq!(count, 5);
        assert_eq!(orders(&settings), vec![1, 2, 3, 4, 5]);
        assert!(settings.gifts.iter().all(|g| g.id == g.order && g.is_empty() && !g.opened));
        assert_eq!(settings.christmas_date, at("2024-12-25T00:00:00Z"));
    }

    #[test]
    fn regenerate_caps_at_twenty_five() {
        let mut settings = Settings::default();
        let count =
            regenerate(&mut settings, at("2099-01-01T00:00:00Z"), at("2024-01-01T00:00:00Z")).unwrap();
        assert_eq!(count, MAX_GENERATED_GIFTS);
        assert_eq!(settings.gifts.len(), 25);
    }

    #[test]
    fn regenerate_rejects_past_dates_without_changes() {
        let mut settings = Settings::default();
        let before = settings.clone();
        let err = regenerate(&mut settings, at("2024-12-25T00:00:00Z"), at("2024-12-25T00:00:00Z"))
            .unwrap_err();
        assert!(matches!(err, PortError::InvalidDate(_)));
        assert_eq!(settings, before);
    }

    #[test]
    fn regenerate_drops_likes_of_replaced_gifts() {
        let mut settings = Settings::default();
        let now = at("2024-12-01T00:00:00Z");
        toggle_like(&mut settings, 2, now).unwrap();
        regenerate(&mut settings, at("2024-12-25T00:00:00Z"), now).unwrap();
        assert!(settings.likes.is_empty());
    }

    #[test]
    fn fill_missing_is_idempotent() {
        let mut settings = Settings::default();
        settings.gifts.retain(|g| g.order != 2);

        let created = fill_missing(&mut settings, 5).unwrap();
        assert_eq!(created, vec![5, 7, 8]);
        assert_eq!(orders(&settings), vec![1, 2, 3, 4, 5]);

        assert!(fill_missing(&mut settings, 5).unwrap().is_empty());
        assert_eq!(orders(&settings), vec![1, 2, 3, 4, 5]);

        let ids: HashSet<u32> = settings.gifts.iter().map(|g| g.id).collect();
        assert_eq!(ids.len(), settings.gifts.len());
    }

    #[test]
    fn fill_missing_refuses_to_wrap_gift_ids() {
        let mut settings = Settings::default();
        settings.gifts = vec![Gift::empty(u32::MAX - 1, 1)];
        let before = settings.clone();

        let err = fill_missing(&mut settings, 3).unwrap_err();
        assert!(matches!(err, PortError::InvalidInput(_)));
        assert_eq!(settings, before);
    }

    #[test]
    fn catalog_tools_reject_oversized_calendars() {
        let mut settings = Settings::default();
        assert!(matches!(
            fill_missing(&mut settings, u32::MAX),
            Err(PortError::InvalidInput(_))
        ));
        assert!(matches!(report(&settings, u32::MAX), Err(PortError::InvalidInput(_))));
        assert_eq!(settings.gifts.len(), 3);

        let created = fill_missing(&mut settings, MAX_CATALOG_DAYS).unwrap();
        assert_eq!(created.len(), MAX_CATALOG_DAYS as usize - 3);
    }

    #[test]
    fn replace_drops_orphan_and_repeated_likes() {
        let mut current = Settings::default();
        let now = at("2024-12-01T00:00:00Z");

        let mut incoming = Settings::default();
        incoming.gifts.retain(|g| g.id != 3);
        incoming.likes = vec![
            GiftLike { gift_id: 1, liked: true, liked_at: now },
            GiftLike { gift_id: 1, liked: false, liked_at: now },
            GiftLike { gift_id: 3, liked: true, liked_at: now },
            GiftLike { gift_id: 77, liked: true, liked_at: now },
        ];

        assert_eq!(replace(&mut current, incoming).unwrap(), 3);
        assert_eq!(current.gifts.len(), 2);
        assert_eq!(current.likes.len(), 1);
        assert!(current.like_for(1).unwrap().liked);
    }

    #[test]
    fn replace_rejects_duplicate_gift_ids() {
        let mut current = Settings::default();
        let before = current.clone();

        let mut incoming = Settings::default();
        incoming.gifts.push(Gift::empty(2, 4));

        let err = replace(&mut current, incoming).unwrap_err();
        assert!(matches!(err, PortError::InvalidInput(_)));
        assert_eq!(current, before);
    }

    #[test]
    fn update_replaces_content_and_clears_blank_image() {
        let mut settings = Settings::default();
        update_gift(&mut settings, 1, "A".into(), "B".into(), Some("https://x/y.png".into())).unwrap();
        assert_eq!(settings.gift(1).unwrap().image.as_deref(), Some("https://x/y.png"));

        update_gift(&mut settings, 1, "A".into(), "B".into(), Some("  ".into())).unwrap();
        let gift = settings.gift(1).unwrap();
        assert_eq!((gift.title.as_str(), gift.text.as_str()), ("A", "B"));
        assert_eq!(gift.image, None);
        assert_eq!(gift.order, 1);
    }

    #[test]
    fn update_unknown_gift_is_not_found() {
        let mut settings = Settings::default();
        let err = update_gift(&mut settings, 42, "A".into(), "B".into(), None).unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));
    }

    #[test]
    fn delete_cascades_to_likes_and_tolerates_unknown_ids() {
        let mut settings = Settings::default();
        toggle_like(&mut settings, 1, at("2024-12-01T00:00:00Z")).unwrap();

        assert!(delete_gift(&mut settings, 1));
        assert!(settings.gift(1).is_none());
        assert!(settings.like_for(1).is_none());
        assert!(!delete_gift(&mut settings, 1));
    }

    #[test]
    fn prune_removes_extra_days_and_their_likes() {
        let mut settings = Settings::default();
        let now = at("2024-12-01T00:00:00Z");
        toggle_like(&mut settings, 3, now).unwrap();
        toggle_like(&mut settings, 1, now).unwrap();

        assert_eq!(prune_beyond(&mut settings, 2), vec![3]);
        assert_eq!(orders(&settings), vec![1, 2]);
        assert!(settings.like_for(3).is_none());
        assert!(settings.like_for(1).is_some());

        let snapshot = settings.clone();
        assert!(prune_beyond(&mut settings, 2).is_empty());
        assert_eq!(settings, snapshot);
    }

    #[test]
    fn toggle_like_is_an_involution() {
        let mut settings = Settings::default();
        let first = toggle_like(&mut settings, 2, at("2024-12-01T00:00:00Z")).unwrap();
        assert!(first.liked);

        let second = toggle_like(&mut settings, 2, at("2024-12-01T00:01:00Z")).unwrap();
        let third = toggle_like(&mut settings, 2, at("2024-12-01T00:02:00Z")).unwrap();
        assert!(!second.liked);
        assert_eq!(third.liked, first.liked);
        assert!(third.liked_at > second.liked_at);
        assert_eq!(settings.likes.len(), 1);
    }

    #[test]
    fn toggle_like_on_unknown_gift_creates_nothing() {
        let mut settings = Settings::default();
        assert!(toggle_like(&mut settings, 99, at("2024-12-01T00:00:00Z")).is_err());
        assert!(settings.likes.is_empty());
    }

    #[test]
    fn mark_opened_keeps_first_timestamp() {
        let mut settings = Settings::default();
        let first = at("2024-12-25T08:00:00Z");
        let later = at("2024-12-25T09:00:00Z");

        let opened = mark_opened(&mut settings, 3, first, first).unwrap();
        assert!(opened.opened);
        assert_eq!(opened.opened_at, Some(first));

        let again = mark_opened(&mut settings, 3, later, later).unwrap();
        assert_eq!(again.opened_at, Some(first));
    }

    #[test]
    fn mark_opened_refuses_locked_gifts() {
        let mut settings = Settings::default();
        let now = at("2024-12-23T08:00:00Z");
        let err = mark_opened(&mut settings, 3, now, now).unwrap_err();
        assert!(matches!(err, PortError::Locked(_)));
        assert!(!settings.gift(3).unwrap().opened);
    }

    #[test]
    fn mark_opened_gates_on_now_but_stamps_opened_at() {
        let mut settings = Settings::default();
        let simulated = at("2024-12-25T00:00:00Z");
        let real = at("2030-06-01T12:00:00Z");

        let opened = mark_opened(&mut settings, 3, simulated, real).unwrap();
        assert_eq!(opened.opened_at, Some(real));
    }

    #[test]
    fn report_flags_missing_extra_and_duplicate_days() {
        let mut settings = Settings::default();
        settings.gifts.push(Gift::empty(10, 2));
        settings.gifts.push(Gift::empty(11, 7));
        toggle_like(&mut settings, 1, at("2024-12-01T00:00:00Z")).unwrap();

        let report = report(&settings, 5).unwrap();
        assert_eq!(report.total_gifts, 5);
        assert_eq!(report.missing_days, vec![4, 5]);
        assert_eq!(report.extra_gift_ids, vec![11]);
        assert_eq!(report.duplicate_orders, vec![2]);
        assert_eq!(report.liked_gifts, 1);
        assert_eq!(report.opened_gifts, 0);
    }
}
