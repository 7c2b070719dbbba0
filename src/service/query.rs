//! Range and listing queries

use crate::types::{CalendarResult, Event};

use super::{DateRange, EventService};

/// Active events of `user_id` inside `range`, in calendar order
pub fn events_in(
    service: &EventService,
    user_id: &str,
    range: DateRange,
) -> CalendarResult<Vec<Event>> {
    let mut events = service
        .store
        .get_by_date_range(user_id, range.start, range.end)?;
    sort_chronologically(&mut events);
    Ok(events)
}

pub fn active_events(service: &EventService, user_id: &str) -> CalendarResult<Vec<Event>> {
    let mut events = service.store.get_all_active(user_id)?;
    sort_chronologically(&mut events);
    Ok(events)
}

/// The store returns events unordered; callers get them by date, then creation
fn sort_chronologically(events: &mut [Event]) {
    events.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
}

#[cfg(test)]
mod tests {
    use crate::service::EventService;
    use chrono::{Days, NaiveDate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_events_for_day() {
        let service = EventService::in_memory();
        let day = date(2024, 1, 15);
        service.create_event("user1", "Event 1", day, None).unwrap();
        service.create_event("user1", "Event 2", day, None).unwrap();
        service
            .create_event("user1", "Event 3", date(2024, 1, 16), None)
            .unwrap();

        let events = service.events_for_day("user1", day).unwrap();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.date == day));
    }

    #[test]
    fn test_events_for_week() {
        let service = EventService::in_memory();
        let start = date(2024, 1, 15);
        for i in 0..8 {
            let on = start.checked_add_days(Days::new(i)).unwrap();
            service.create_event("user1", "Event", on, None).unwrap();
        }

        let events = service.events_for_week("user1", start).unwrap();
        assert_eq!(events.len(), 7);
        assert_eq!(events.first().unwrap().date, start);
        assert_eq!(events.last().unwrap().date, date(2024, 1, 21));
    }

    #[test]
    fn test_events_for_month() {
        let service = EventService::in_memory();
        for day in 1..=5 {
            service
                .create_event("user1", "Event", date(2024, 1, day), None)
                .unwrap();
        }
        service
            .create_event("user1", "February", date(2024, 2, 1), None)
            .unwrap();
        service
            .create_event("user1", "December", date(2023, 12, 31), None)
            .unwrap();

        let events = service.events_for_month("user1", date(2024, 1, 15)).unwrap();
        assert_eq!(events.len(), 5);
        let days: Vec<NaiveDate> = events.iter().map(|e| e.date).collect();
        assert_eq!(days, (1..=5).map(|d| date(2024, 1, d)).collect::<Vec<_>>());
    }

    #[test]
    fn test_queries_are_scoped_to_user() {
        let service = EventService::in_memory();
        let day = date(2024, 1, 15);
        service.create_event("alice", "Mine", day, None).unwrap();
        service.create_event("bob", "Not mine", day, None).unwrap();

        let events = service.events_for_day("alice", day).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].text, "Mine");
        assert_eq!(service.active_events("bob").unwrap().len(), 1);
    }
}
