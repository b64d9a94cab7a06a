//! Session persistence port and its in-memory adapter.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use isle_core::{SessionId, World};

use crate::error::RepoError;

/// Stores and retrieves session worlds.
#[cfg_attr(test, mockall::automock)]
pub trait SessionRepository: Send + Sync {
    /// Store a new session and return its id.
    fn create_session(&self, world: &World) -> Result<SessionId, RepoError>;

    /// Load a session by id.
    fn find_by_id(&self, id: &SessionId) -> Result<Option<World>, RepoError>;

    /// Overwrite an existing session.
    fn save(&self, world: &World) -> Result<(), RepoError>;

    /// Every stored session, ordered by id.
    fn list_all(&self) -> Result<Vec<World>, RepoError>;
}

#[derive(Debug, Clone)]
struct SessionRecord {
    world: World,
    created_at: DateTime<Utc>,
    saved_at: DateTime<Utc>,
}

/// Keeps sessions in process memory.
#[derive(Debug, Default)]
pub struct InMemorySessionRepository {
    sessions: Mutex<BTreeMap<SessionId, SessionRecord>>,
}

impl InMemorySessionRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// When the session was created.
    pub fn created_at(&self, id: &SessionId) -> Result<Option<DateTime<Utc>>, RepoError> {
        Ok(self.lock()?.get(id).map(|r| r.created_at))
    }

    /// When the session was last saved.
    pub fn saved_at(&self, id: &SessionId) -> Result<Option<DateTime<Utc>>, RepoError> {
        Ok(self.lock()?.get(id).map(|r| r.saved_at))
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<SessionId, SessionRecord>>, RepoError> {
        self.sessions
            .lock()
            .map_err(|e| RepoError::Storage(e.to_string()))
    }
}

impl SessionRepository for InMemorySessionRepository {
    fn create_session(&self, world: &World) -> Result<SessionId, RepoError> {
        let id = world.session().id;
        let mut sessions = self.lock()?;
        if sessions.contains_key(&id) {
            return Err(RepoError::AlreadyExists(id));
        }
        let now = Utc::now();
        sessions.insert(
            id,
            SessionRecord {
                world: world.clone(),
                created_at: now,
                saved_at: now,
            },
        );
        Ok(id)
    }

    fn find_by_id(&self, id: &SessionId) -> Result<Option<World>, RepoError> {
        Ok(self.lock()?.get(id).map(|r| r.world.clone()))
    }

    fn save(&self, world: &World) -> Result<(), RepoError> {
        let id = world.session().id;
        let mut sessions = self.lock()?;
        let record = sessions.get_mut(&id).ok_or(RepoError::NotFound(id))?;
        record.world = world.clone();
        record.saved_at = Utc::now();
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<World>, RepoError> {
        Ok(self.lock()?.values().map(|r| r.world.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isle_core::Session;

    fn world(n: u128) -> World {
        World::new(Session::new(SessionId::from_uuid(uuid::Uuid::from_u128(n)), 10))
    }

    #[test]
    fn create_then_find() {
        let repo = InMemorySessionRepository::new();
        let w = world(1);
        let id = repo.create_session(&w).unwrap();
        assert_eq!(repo.find_by_id(&id).unwrap(), Some(w));
        assert!(repo.created_at(&id).unwrap().is_some());
    }

    #[test]
    fn duplicate_create_rejected() {
        let repo = InMemorySessionRepository::new();
        repo.create_session(&world(1)).unwrap();
        assert!(matches!(
            repo.create_session(&world(1)),
            Err(RepoError::AlreadyExists(_))
        ));
    }

    #[test]
    fn save_requires_existing_session() {
        let repo = InMemorySessionRepository::new();
        assert!(matches!(repo.save(&world(2)), Err(RepoError::NotFound(_))));
    }

    #[test]
    fn save_overwrites_and_stamps() {
        let repo = InMemorySessionRepository::new();
        let mut w = world(3);
        let id = repo.create_session(&w).unwrap();
        let created = repo.created_at(&id).unwrap().unwrap();
        w.session_mut().advance_turn();
        repo.save(&w).unwrap();
        assert_eq!(repo.find_by_id(&id).unwrap().unwrap().session().turn(), 1);
        assert!(repo.saved_at(&id).unwrap().unwrap() >= created);
    }

    #[test]
    fn list_all_in_id_order() {
        let repo = InMemorySessionRepository::new();
        repo.create_session(&world(9)).unwrap();
        repo.create_session(&world(4)).unwrap();
        let ids: Vec<SessionId> = repo
            .list_all()
            .unwrap()
            .iter()
            .map(|w| w.session().id)
            .collect();
        assert_eq!(
            ids,
            vec![
                SessionId::from_uuid(uuid::Uuid::from_u128(4)),
                SessionId::from_uuid(uuid::Uuid::from_u128(9))
            ]
        );
    }
}
