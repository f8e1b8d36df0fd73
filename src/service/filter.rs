use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::{Category, Request, Room};

/// Listing criteria. Every criterion is optional and all of them must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    /// Case-insensitive substring of the title. Blank means no constraint.
    pub title: Option<String>,
    /// Earliest creation date, inclusive.
    pub from: Option<NaiveDate>,
    /// Latest creation date, inclusive.
    pub to: Option<NaiveDate>,
    /// Exact category.
    pub category: Option<Category>,
    /// Exact room.
    pub room: Option<Room>,
}

impl Filter {
    /// Whether `request` satisfies every criterion.
    ///
    /// Dates are compared on the UTC calendar date of creation, so a request
    /// created at any time on the `to` day is included.
    #[must_use]
    pub fn matches(&self, request: &Request) -> bool {
        if let Some(needle) = self.title.as_deref() {
            if !needle.trim().is_empty() && !request.title().contains(needle) {
                return false;
            }
        }

        let created = request.created().date_naive();
        if self.from.is_some_and(|from| created < from) {
            return false;
        }
        if self.to.is_some_and(|to| created > to) {
            return false;
        }

        if self.category.is_some_and(|category| request.category() != category) {
            return false;
        }

        if self.room.is_some_and(|room| request.room() != room) {
            return false;
        }

        true
    }

    /// Keeps the matching requests, highest priority first and newest first
    /// within a priority.
    #[must_use]
    pub fn apply(&self, requests: impl IntoIterator<Item = Request>) -> Vec<Request> {
        let mut matching: Vec<Request> = requests
            .into_iter()
            .filter(|request| self.matches(request))
            .collect();
        matching.sort_by(listing_order);
        matching
    }
}

fn listing_order(a: &Request, b: &Request) -> Ordering {
    b.priority()
        .cmp(&a.priority())
        .then_with(|| b.created().cmp(&a.created()))
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};

    use super::*;
    use crate::{NewRequest, Priority, Title};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, day, hour, 0, 0).unwrap()
    }

    fn request(
        title: &str,
        room: Room,
        category: Category,
        priority: u8,
        created: DateTime<Utc>,
    ) -> Request {
        Request::new(
            NewRequest {
                title: Title::new(title).unwrap(),
                room,
                category,
                priority: Priority::new(priority).unwrap(),
            },
            "alice",
            created,
        )
    }

    fn sample() -> Vec<Request> {
        vec![
            request("Printer toner", Room::MeetingRoom, Category::Electronics, 5, at(1, 9)),
            request("Coffee beans", Room::Kitchen, Category::Food, 8, at(2, 10)),
            request("Paper towels", Room::Bathroom, Category::Other, 5, at(3, 23)),
            request("HDMI cable", Room::MeetingRoom, Category::Electronics, 2, at(4, 0)),
        ]
    }

    fn titles(requests: &[Request]) -> Vec<&str> {
        requests.iter().map(|r| r.title().as_str()).collect()
    }

    #[test]
    fn no_criteria_sorts_by_priority_then_newest() {
        let result = Filter::default().apply(sample());
        assert_eq!(
            titles(&result),
            ["Coffee beans", "Paper towels", "Printer toner", "HDMI cable"]
        );
    }

    #[test]
    fn result_order_holds_for_every_pair() {
        let result = Filter::default().apply(sample());
        for pair in result.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(
                a.priority() > b.priority()
                    || (a.priority() == b.priority() && a.created() >= b.created())
            );
        }
    }

    #[test]
    fn title_is_a_case_insensitive_substring() {
        let filter = Filter {
            title: Some("TONER".to_string()),
            ..Filter::default()
        };
        assert_eq!(titles(&filter.apply(sample())), ["Printer toner"]);
    }

    #[test]
    fn blank_title_is_ignored() {
        let filter = Filter {
            title: Some("  ".to_string()),
            ..Filter::default()
        };
        assert_eq!(filter.apply(sample()).len(), 4);
    }

    #[test]
    fn title_needle_keeps_its_spaces() {
        let requests = vec![
            request("Big ton", Room::Kitchen, Category::Other, 3, at(1, 9)),
            request("Baton", Room::Kitchen, Category::Other, 3, at(1, 10)),
        ];
        let filter = Filter {
            title: Some(" ton".to_string()),
            ..Filter::default()
        };
        assert_eq!(titles(&filter.apply(requests)), ["Big ton"]);
    }

    #[test]
    fn date_bounds_are_inclusive_calendar_days() {
        let filter = Filter {
            from: NaiveDate::from_ymd_opt(2024, 4, 2),
            to: NaiveDate::from_ymd_opt(2024, 4, 3),
            ..Filter::default()
        };
        // "Paper towels" was created at 23:00 on the 3rd and is still included.
        assert_eq!(
            titles(&filter.apply(sample())),
            ["Coffee beans", "Paper towels"]
        );
    }

    #[test]
    fn category_and_room_are_exact() {
        let filter = Filter {
            category: Some(Category::Electronics),
            room: Some(Room::MeetingRoom),
            ..Filter::default()
        };
        assert_eq!(
            titles(&filter.apply(sample())),
            ["Printer toner", "HDMI cable"]
        );
    }

    #[test]
    fn criteria_are_combined() {
        let filter = Filter {
            title: Some("cable".to_string()),
            category: Some(Category::Food),
            ..Filter::default()
        };
        assert!(filter.apply(sample()).is_empty());
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(Filter::default().apply(Vec::new()).is_empty());
    }
}
