use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use non_empty_string::NonEmptyString;
use serde::{Deserialize, Serialize};

use crate::domain::Config;

/// The title of a request.
///
/// Titles are trimmed of surrounding whitespace and must not be empty.
/// Together with the [`Room`] a title forms the identity of a request, and
/// that comparison ignores case (see [`Title::same_as`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Title(NonEmptyString);

impl Title {
    /// Creates a new title.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyTitleError`] if the title is empty or only whitespace.
    pub fn new(title: impl Into<String>) -> Result<Self, EmptyTitleError> {
        let title = title.into();
        NonEmptyString::new(title.trim().to_string())
            .map(Self)
            .map_err(|_| EmptyTitleError)
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Case-insensitive equality, as used by the identity key.
    #[must_use]
    pub fn same_as(&self, other: &str) -> bool {
        self.as_str().to_lowercase() == other.trim().to_lowercase()
    }

    /// Case-insensitive substring match.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.as_str()
            .to_lowercase()
            .contains(&needle.to_lowercase())
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Title {
    type Err = EmptyTitleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Title {
    type Error = EmptyTitleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Title> for String {
    fn from(title: Title) -> Self {
        title.as_str().to_string()
    }
}

/// Error returned when a title is empty or blank.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("title must not be empty")]
pub struct EmptyTitleError;

/// The priority of a request, from 1 (lowest) to 10 (highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Priority(u8);

impl Priority {
    /// The lowest valid priority.
    pub const MIN: Self = Self(1);

    /// The highest valid priority.
    pub const MAX: Self = Self(10);

    /// Creates a priority, validating that it lies in `1..=10`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPriority`] if the value is out of range.
    pub fn new(value: u8) -> Result<Self, InvalidPriority> {
        if (Self::MIN.0..=Self::MAX.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidPriority(value.to_string()))
        }
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for Priority {
    type Error = InvalidPriority;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.0
    }
}

impl FromStr for Priority {
    type Err = InvalidPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .map_err(|_| InvalidPriority(s.to_string()))
            .and_then(Self::new)
    }
}

/// Error returned when a priority is outside `1..=10`.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("priority must be in the range from 1 to 10, got '{0}'")]
pub struct InvalidPriority(String);

/// The room a request is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Room {
    /// The meeting room.
    MeetingRoom,
    /// The kitchen.
    Kitchen,
    /// The bathroom.
    Bathroom,
}

impl Room {
    /// All rooms, in declaration order.
    pub const ALL: [Self; 3] = [Self::MeetingRoom, Self::Kitchen, Self::Bathroom];

    const fn name(self) -> &'static str {
        match self {
            Self::MeetingRoom => "MeetingRoom",
            Self::Kitchen => "Kitchen",
            Self::Bathroom => "Bathroom",
        }
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Room {
    type Err = ParseRoomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalise_label(s);
        Self::ALL
            .into_iter()
            .find(|room| room.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| ParseRoomError(s.to_string()))
    }
}

/// Error returned when a string does not name a [`Room`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid room '{0}', expected one of: MeetingRoom, Kitchen, Bathroom")]
pub struct ParseRoomError(String);

/// The category of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Electronics, such as cables or printer toner.
    Electronics,
    /// Food and drink.
    Food,
    /// Anything else.
    Other,
}

impl Category {
    /// All categories, in declaration order.
    pub const ALL: [Self; 3] = [Self::Electronics, Self::Food, Self::Other];

    const fn name(self) -> &'static str {
        match self {
            Self::Electronics => "Electronics",
            Self::Food => "Food",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalise_label(s);
        Self::ALL
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

/// Error returned when a string does not name a [`Category`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid category '{0}', expected one of: Electronics, Food, Other")]
pub struct ParseCategoryError(String);

/// Strips separators so that `meeting-room`, `meeting_room` and
/// `MeetingRoom` all name the same variant.
fn normalise_label(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .collect()
}

/// The user performing an operation.
///
/// Identity is a trusted username string; nothing here authenticates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    name: String,
    admin: bool,
}

impl Actor {
    /// Creates an actor with an explicit admin flag.
    #[must_use]
    pub fn new(name: impl Into<String>, admin: bool) -> Self {
        Self {
            name: name.into(),
            admin,
        }
    }

    /// Creates an actor, granting admin rights when the name matches the
    /// configured admin user (ignoring case).
    #[must_use]
    pub fn resolve(name: impl Into<String>, config: &Config) -> Self {
        let name = name.into();
        let admin = name.to_lowercase() == config.admin_user().to_lowercase();
        Self { name, admin }
    }

    /// The username.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the actor may see and delete every request.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.admin
    }
}

/// The caller-supplied fields of a request.
///
/// Owner and creation time are not part of this type; they are always set
/// by the service when the request is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRequest {
    /// The request title.
    pub title: Title,
    /// The room the request is for.
    pub room: Room,
    /// The request category.
    pub category: Category,
    /// The request priority.
    pub priority: Priority,
}

/// A stored shortage request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    title: Title,
    owner: String,
    room: Room,
    category: Category,
    priority: Priority,
    created: DateTime<Utc>,
}

impl Request {
    /// Builds a stored request from its caller-supplied fields.
    #[must_use]
    pub fn new(fields: NewRequest, owner: impl Into<String>, created: DateTime<Utc>) -> Self {
        let NewRequest {
            title,
            room,
            category,
            priority,
        } = fields;
        Self {
            title,
            owner: owner.into(),
            room,
            category,
            priority,
            created,
        }
    }

    /// The request title.
    #[must_use]
    pub const fn title(&self) -> &Title {
        &self.title
    }

    /// The username of the user who registered the request.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The room the request is for.
    #[must_use]
    pub const fn room(&self) -> Room {
        self.room
    }

    /// The request category.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// The request priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// When the request was registered.
    #[must_use]
    pub const fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Whether this request has the identity `(title, room)`.
    #[must_use]
    pub fn is_identified_by(&self, title: &str, room: Room) -> bool {
        self.room == room && self.title.same_as(title)
    }

    /// Whether `actor` is allowed to delete this request.
    #[must_use]
    pub fn can_be_deleted_by(&self, actor: &Actor) -> bool {
        actor.is_admin() || self.owner == actor.name()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn title_is_trimmed() {
        let title = Title::new("  Printer toner ").unwrap();
        assert_eq!(title.as_str(), "Printer toner");
    }

    #[test]
    fn blank_title_is_rejected() {
        assert_eq!(Title::new("").unwrap_err(), EmptyTitleError);
        assert_eq!(Title::new("   ").unwrap_err(), EmptyTitleError);
    }

    #[test]
    fn title_comparison_ignores_case() {
        let title = Title::new("Printer Toner").unwrap();
        assert!(title.same_as("printer toner"));
        assert!(title.same_as("PRINTER TONER"));
        assert!(!title.same_as("printer"));
        assert!(title.contains("TONER"));
        assert!(!title.contains("paper"));
    }

    #[test]
    fn title_comparison_handles_non_ascii() {
        let title = Title::new("Кофе").unwrap();
        assert!(title.same_as("кофе"));
        assert!(title.contains("КОФ"));
    }

    #[test]
    fn priority_bounds() {
        assert!(Priority::new(0).is_err());
        assert_eq!(Priority::new(1).unwrap(), Priority::MIN);
        assert_eq!(Priority::new(10).unwrap(), Priority::MAX);
        assert!(Priority::new(11).is_err());
    }

    #[test]
    fn priority_parses_from_str() {
        assert_eq!("7".parse::<Priority>().unwrap().get(), 7);
        assert_eq!(
            "300".parse::<Priority>().unwrap_err(),
            InvalidPriority("300".to_string())
        );
        assert!("-1".parse::<Priority>().is_err());
        assert!("high".parse::<Priority>().is_err());
    }

    #[test]
    fn priority_out_of_range_fails_to_deserialize() {
        assert!(serde_json::from_str::<Priority>("11").is_err());
        assert_eq!(serde_json::from_str::<Priority>("4").unwrap().get(), 4);
    }

    #[test]
    fn room_parses_case_insensitively() {
        assert_eq!("meetingroom".parse::<Room>().unwrap(), Room::MeetingRoom);
        assert_eq!("meeting-room".parse::<Room>().unwrap(), Room::MeetingRoom);
        assert_eq!("KITCHEN".parse::<Room>().unwrap(), Room::Kitchen);
        assert!("garage".parse::<Room>().is_err());
    }

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("food".parse::<Category>().unwrap(), Category::Food);
        assert_eq!(
            "Electronics".parse::<Category>().unwrap(),
            Category::Electronics
        );
        assert!("furniture".parse::<Category>().is_err());
    }

    #[test]
    fn admin_is_resolved_from_config_ignoring_case() {
        let config = Config::default();
        assert!(Actor::resolve("Admin", &config).is_admin());
        assert!(Actor::resolve("ADMIN", &config).is_admin());
        assert!(!Actor::resolve("alice", &config).is_admin());
    }

    #[test]
    fn identity_matches_title_and_room() {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let request = Request::new(
            NewRequest {
                title: Title::new("Coffee").unwrap(),
                room: Room::Kitchen,
                category: Category::Food,
                priority: Priority::new(3).unwrap(),
            },
            "alice",
            created,
        );

        assert!(request.is_identified_by("coffee", Room::Kitchen));
        assert!(!request.is_identified_by("coffee", Room::MeetingRoom));
        assert!(request.can_be_deleted_by(&Actor::new("alice", false)));
        assert!(!request.can_be_deleted_by(&Actor::new("bob", false)));
        assert!(request.can_be_deleted_by(&Actor::new("bob", true)));
    }
}
