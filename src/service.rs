//! The request lifecycle.
//!
//! [`RequestService`] owns no state of its own. Every operation loads the
//! full request set from its [`Store`], decides, and (for mutations) saves
//! the whole set back.

use std::fmt;

use chrono::{DateTime, Utc};
use tracing::instrument;

use crate::{
    Actor, NewRequest, Request, Room,
    storage::{Store, StoreError},
};

mod filter;
pub use filter::Filter;

type Clock = Box<dyn Fn() -> DateTime<Utc>>;

/// Registers, deletes, and lists requests held in a [`Store`].
pub struct RequestService<S> {
    store: S,
    clock: Clock,
}

impl<S> fmt::Debug for RequestService<S>
where
    S: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestService")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

/// The outcome of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registered {
    /// No request with the same title and room existed.
    Created(Request),
    /// A lower-priority request with the same title and room was replaced.
    Replaced {
        /// The newly stored request.
        request: Request,
        /// The request that was removed.
        previous: Request,
    },
}

impl Registered {
    /// The request that is now stored.
    #[must_use]
    pub const fn request(&self) -> &Request {
        match self {
            Self::Created(request) | Self::Replaced { request, .. } => request,
        }
    }
}

/// Errors returned by [`RequestService`] operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A request with the same title and room and an equal or higher
    /// priority already exists.
    #[error(
        "a request titled '{title}' in room {room} already exists with equal or higher priority \
         ({existing_priority})"
    )]
    DuplicateConflict {
        /// The title of the existing request.
        title: String,
        /// The room of the existing request.
        room: Room,
        /// The priority of the existing request.
        existing_priority: u8,
    },

    /// No request with the given title and room exists.
    #[error("no request titled '{title}' in room {room}")]
    NotFound {
        /// The requested title.
        title: String,
        /// The requested room.
        room: Room,
    },

    /// The request exists but belongs to another user.
    #[error("you can only delete your own requests ('{title}' in room {room})")]
    Unauthorized {
        /// The title of the request.
        title: String,
        /// The room of the request.
        room: Room,
    },

    /// The store failed to load or save.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl Error {
    /// Whether this is an expected business outcome rather than a failure of
    /// the underlying storage.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

impl<S: Store> RequestService<S> {
    /// Creates a service over `store`, stamping requests with the system
    /// clock.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, Utc::now)
    }

    /// Creates a service over `store` using `clock` for creation times.
    pub fn with_clock(store: S, clock: impl Fn() -> DateTime<Utc> + 'static) -> Self {
        Self {
            store,
            clock: Box::new(clock),
        }
    }

    /// Returns the underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Registers a request on behalf of `actor`.
    ///
    /// If a request with the same title (ignoring case) and room exists, it
    /// is replaced only when the new priority is strictly higher. The stored
    /// request is always owned by `actor` and stamped with the current time.
    ///
    /// # Errors
    ///
    /// - [`Error::DuplicateConflict`] if an existing request has an equal or
    ///   higher priority. Nothing is saved.
    /// - [`Error::Storage`] if loading or saving fails.
    #[instrument(skip_all, fields(title = %new.title, room = %new.room, user = actor.name()))]
    pub fn register(&self, new: NewRequest, actor: &Actor) -> Result<Registered, Error> {
        let mut requests = self.load()?;

        let existing = requests
            .iter()
            .position(|r| r.is_identified_by(new.title.as_str(), new.room));

        let previous = match existing {
            Some(index) if new.priority > requests[index].priority() => {
                Some(requests.remove(index))
            }
            Some(index) => {
                let existing = &requests[index];
                tracing::warn!(
                    existing_priority = existing.priority().get(),
                    requested_priority = new.priority.get(),
                    "Rejected duplicate request"
                );
                return Err(Error::DuplicateConflict {
                    title: existing.title().to_string(),
                    room: existing.room(),
                    existing_priority: existing.priority().get(),
                });
            }
            None => None,
        };

        let request = Request::new(new, actor.name(), (self.clock)());
        requests.push(request.clone());
        self.save(&requests)?;

        Ok(match previous {
            Some(previous) => {
                tracing::info!(
                    previous_owner = previous.owner(),
                    previous_priority = previous.priority().get(),
                    "Replaced lower priority request"
                );
                Registered::Replaced { request, previous }
            }
            None => {
                tracing::info!("Registered request");
                Registered::Created(request)
            }
        })
    }

    /// Deletes the request identified by `title` (ignoring case) and `room`.
    ///
    /// Admins may delete any request; other users only their own. Existence
    /// is checked first, so a missing request is always reported as
    /// [`Error::NotFound`].
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if no such request exists.
    /// - [`Error::Unauthorized`] if `actor` may not delete it.
    /// - [`Error::Storage`] if loading or saving fails.
    #[instrument(skip(self, actor), fields(user = actor.name(), admin = actor.is_admin()))]
    pub fn delete(&self, title: &str, room: Room, actor: &Actor) -> Result<Request, Error> {
        let mut requests = self.load()?;

        let Some(index) = requests
            .iter()
            .position(|r| r.is_identified_by(title, room))
        else {
            tracing::warn!("Request to delete not found");
            return Err(Error::NotFound {
                title: title.trim().to_string(),
                room,
            });
        };

        if !requests[index].can_be_deleted_by(actor) {
            tracing::warn!(
                owner = requests[index].owner(),
                "Unauthorized delete attempt"
            );
            return Err(Error::Unauthorized {
                title: requests[index].title().to_string(),
                room,
            });
        }

        let removed = requests.remove(index);
        self.save(&requests)?;

        tracing::info!("Deleted request");
        Ok(removed)
    }

    /// Returns the requests `actor` may see: everything for an admin, their
    /// own requests otherwise.
    ///
    /// A storage failure is logged and yields an empty list.
    #[instrument(skip_all, fields(user = actor.name(), admin = actor.is_admin()))]
    pub fn visible(&self, actor: &Actor) -> Vec<Request> {
        let Ok(mut requests) = self.load() else {
            return Vec::new();
        };
        if !actor.is_admin() {
            requests.retain(|r| r.owner() == actor.name());
        }
        requests
    }

    fn load(&self) -> Result<Vec<Request>, StoreError> {
        self.store.load().inspect_err(|e| {
            tracing::error!(error = %e, "Failed to load requests");
        })
    }

    fn save(&self, requests: &[Request]) -> Result<(), StoreError> {
        self.store.save(requests).inspect_err(|e| {
            tracing::error!(error = %e, "Failed to save requests");
        })
    }
}

/// Filters and orders an already visible list. See [`Filter::apply`].
#[must_use]
pub fn filter(requests: impl IntoIterator<Item = Request>, criteria: &Filter) -> Vec<Request> {
    criteria.apply(requests)
}
