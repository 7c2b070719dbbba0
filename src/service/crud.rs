//! Create, update and delete through the façade

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::types::{CalendarResult, Event};
use crate::validation::validate_event;

use super::EventService;

/// Validate and store a new event under a freshly generated id
pub fn create_event(
    service: &EventService,
    user_id: &str,
    text: &str,
    date: NaiveDate,
    reminder_at: Option<DateTime<Utc>>,
) -> CalendarResult<Event> {
    let event = Event::new(
        Uuid::new_v4().to_string(),
        user_id,
        date,
        text,
        reminder_at,
        Utc::now(),
    );
    validate_event(&event)?;

    service.store.create(event.clone())?;
    Ok(event)
}

/// Replace text, date and reminder of an existing event.
///
/// Works on a copy: the stored record is untouched unless the new values validate.
pub fn update_event(
    service: &EventService,
    user_id: &str,
    event_id: &str,
    text: &str,
    date: NaiveDate,
    reminder_at: Option<DateTime<Utc>>,
) -> CalendarResult<Event> {
    let mut event = service.store.get_by_id(user_id, event_id)?;

    event.text = text.to_string();
    event.date = date;
    event.reminder_at = reminder_at;
    event.updated_at = Utc::now();
    validate_event(&event)?;

    service.store.update(event.clone())?;
    Ok(event)
}

pub fn delete_event(service: &EventService, user_id: &str, event_id: &str) -> CalendarResult<()> {
    service.store.delete(user_id, event_id)
}

pub fn get_event(service: &EventService, user_id: &str, event_id: &str) -> CalendarResult<Event> {
    service.store.get_by_id(user_id, event_id)
}

#[cfg(test)]
mod tests {
    use crate::service::EventService;
    use crate::types::CalendarError;
    use crate::validation::ValidationError;
    use chrono::{Duration, NaiveDate, Utc};

    fn jan(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_create_event() {
        let service = EventService::in_memory();
        let event = service.create_event("user1", "Test event", jan(15), None).unwrap();

        assert_eq!(event.user_id, "user1");
        assert_eq!(event.text, "Test event");
        assert_eq!(event.date, jan(15));
        assert!(!event.archived);
        assert!(!event.id.is_empty());
        assert_eq!(event.created_at, event.updated_at);
    }

    #[test]
    fn test_create_event_generates_distinct_ids() {
        let service = EventService::in_memory();
        let a = service.create_event("user1", "A", jan(15), None).unwrap();
        let b = service.create_event("user1", "B", jan(15), None).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_create_event_invalid_data() {
        let service = EventService::in_memory();
        let cases = [
            ("", "Test", ValidationError::EmptyUserId),
            ("user1", "", ValidationError::EmptyText),
        ];

        for (user_id, text, expected) in cases {
            let err = service.create_event(user_id, text, jan(15), None).unwrap_err();
            assert_eq!(err, CalendarError::InvalidInput(expected));
        }
        assert!(service.active_events("user1").unwrap().is_empty());
    }

    #[test]
    fn test_update_event() {
        let service = EventService::in_memory();
        let original = service.create_event("user1", "Original", jan(15), None).unwrap();
        let reminder = Utc::now() + Duration::hours(1);

        let updated = service
            .update_event("user1", &original.id, "Updated", jan(20), Some(reminder))
            .unwrap();

        assert_eq!(updated.text, "Updated");
        assert_eq!(updated.date, jan(20));
        assert_eq!(updated.reminder_at, Some(reminder));
        assert_eq!(updated.created_at, original.created_at);
        assert!(updated.updated_at >= original.updated_at);
        assert_eq!(service.get_event("user1", &original.id).unwrap(), updated);
    }

    #[test]
    fn test_invalid_update_leaves_record() {
        let service = EventService::in_memory();
        let original = service.create_event("user1", "Original", jan(15), None).unwrap();

        let err = service
            .update_event("user1", &original.id, "  ", jan(20), None)
            .unwrap_err();
        assert_eq!(err, CalendarError::InvalidInput(ValidationError::EmptyText));
        assert_eq!(service.get_event("user1", &original.id).unwrap(), original);
    }

    #[test]
    fn test_update_event_not_found() {
        let service = EventService::in_memory();
        let err = service
            .update_event("user1", "nonexistent", "Text", jan(15), None)
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete_event() {
        let service = EventService::in_memory();
        let event = service.create_event("user1", "Test", jan(15), None).unwrap();

        service.delete_event("user1", &event.id).unwrap();
        assert!(service.get_event("user1", &event.id).unwrap_err().is_not_found());
        assert!(service.delete_event("user1", &event.id).unwrap_err().is_not_found());
    }
}
