//! One contact form per visitor.
//!
//! Visitors are recognized by a random id in a cookie. Sessions that have not
//! been seen for `ttl`, or are evicted to make room, are dropped together with
//! their form, which also stops any pending banner timer.

use std::{
    collections::{BTreeSet, HashMap},
    fmt,
    str::FromStr,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use landing_core_contact_contracts::ContactService;
use landing_core_contact_impl::form::{ContactFormConfig, ContactFormController};
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "landing_session";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.simple().fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

pub type SessionForm<Contact> = Arc<ContactFormController<Contact>>;

/// Forms of all visitors who have written to their form.
///
/// Reading never starts a session, so crawlers and plain page views leave no
/// trace. The map holds at most `capacity` sessions; when full, the least
/// recently seen one is evicted.
#[derive(Debug)]
pub struct FormSessions<Contact> {
    contact: Contact,
    config: ContactFormConfig,
    ttl: Duration,
    capacity: usize,
    sessions: Mutex<Sessions<Contact>>,
}

#[derive(Debug)]
struct Sessions<Contact> {
    forms: HashMap<SessionId, Session<Contact>>,
    /// `(last_seen, id)` of every session, least recently seen first.
    by_age: BTreeSet<(Instant, SessionId)>,
}

#[derive(Debug)]
struct Session<Contact> {
    form: SessionForm<Contact>,
    last_seen: Instant,
}

impl<Contact> FormSessions<Contact>
where
    Contact: ContactService + Clone,
{
    pub fn new(
        contact: Contact,
        config: ContactFormConfig,
        ttl: Duration,
        capacity: usize,
    ) -> Self {
        Self {
            contact,
            config,
            ttl,
            capacity: capacity.max(1),
            sessions: Mutex::new(Sessions {
                forms: HashMap::new(),
                by_age: BTreeSet::new(),
            }),
        }
    }

    /// Returns the form of the session in the cookie jar, if there is a live
    /// one.
    pub fn find(&self, jar: &CookieJar) -> Option<SessionForm<Contact>> {
        self.get(session_id(jar)?)
    }

    /// Returns the form of the session in the cookie jar, starting a new
    /// session if there is none or it has expired. The returned jar carries
    /// the session cookie.
    pub fn from_cookies(&self, jar: CookieJar) -> (CookieJar, SessionForm<Contact>) {
        let (id, form) = self.get_or_create(session_id(&jar));
        let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax);
        (jar.add(cookie), form)
    }

    pub fn get(&self, id: SessionId) -> Option<SessionForm<Contact>> {
        let now = Instant::now();
        let mut sessions = self.lock();
        sessions.expire(now, self.ttl);
        sessions.touch(id, now)
    }

    pub fn get_or_create(&self, id: Option<SessionId>) -> (SessionId, SessionForm<Contact>) {
        let now = Instant::now();
        let mut sessions = self.lock();
        sessions.expire(now, self.ttl);

        if let Some(id) = id {
            if let Some(form) = sessions.touch(id, now) {
                return (id, form);
            }
        }

        while sessions.forms.len() >= self.capacity {
            let Some(evicted) = sessions.evict_oldest() else {
                break;
            };
            debug!(%evicted, "session store full, evicted oldest session");
        }

        let id = SessionId::new();
        let form = Arc::new(ContactFormController::new(
            self.contact.clone(),
            self.config,
        ));
        sessions.insert(id, Arc::clone(&form), now);
        debug!(%id, "started session");
        (id, form)
    }

    pub fn len(&self) -> usize {
        self.lock().forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Sessions<Contact>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<Contact> Sessions<Contact> {
    fn touch(&mut self, id: SessionId, now: Instant) -> Option<SessionForm<Contact>> {
        let session = self.forms.get_mut(&id)?;
        self.by_age.remove(&(session.last_seen, id));
        session.last_seen = now;
        self.by_age.insert((now, id));
        Some(Arc::clone(&session.form))
    }

    fn insert(&mut self, id: SessionId, form: SessionForm<Contact>, now: Instant) {
        self.by_age.insert((now, id));
        self.forms.insert(
            id,
            Session {
                form,
                last_seen: now,
            },
        );
    }

    fn evict_oldest(&mut self) -> Option<SessionId> {
        let (_, id) = self.by_age.pop_first()?;
        self.forms.remove(&id);
        Some(id)
    }

    /// Drops sessions not seen for `ttl`. Only visits expired entries.
    fn expire(&mut self, now: Instant, ttl: Duration) {
        let mut expired = 0;
        while let Some(&(last_seen, _)) = self.by_age.first() {
            if now.duration_since(last_seen) < ttl {
                break;
            }
            self.evict_oldest();
            expired += 1;
        }
        if expired > 0 {
            debug!(expired, "dropped expired sessions");
        }
    }
}

fn session_id(jar: &CookieJar) -> Option<SessionId> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| cookie.value().parse().ok())
}
