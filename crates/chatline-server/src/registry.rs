//! Session registry.
//!
//! Tracks every open connection from accept until close. A session is in the
//! registry as soon as its socket is accepted; it gains a name once its first
//! frame arrives. Broadcasts go to every registered session, named or not.

use std::{collections::BTreeMap, net::SocketAddr};

/// Information about a registered session.
#[derive(Debug, Clone, Default)]
pub struct SessionInfo {
    /// Remote address, when the runtime knows it.
    pub peer: Option<SocketAddr>,
    /// Display name from the session's registration frame.
    pub name: Option<String>,
}

impl SessionInfo {
    /// Session that has connected but not yet registered a name.
    pub fn connected(peer: Option<SocketAddr>) -> Self {
        Self { peer, name: None }
    }
}

/// Registry for tracking sessions.
///
/// Ordered by session id so broadcast fan-out is deterministic.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: BTreeMap<u64, SessionInfo>,
}

impl SessionRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session. Returns `false` if the id is already taken.
    pub fn register_session(&mut self, session_id: u64, info: SessionInfo) -> bool {
        if self.sessions.contains_key(&session_id) {
            return false;
        }
        self.sessions.insert(session_id, info);
        true
    }

    /// Unregister a session, returning its info if it existed.
    pub fn unregister_session(&mut self, session_id: u64) -> Option<SessionInfo> {
        self.sessions.remove(&session_id)
    }

    /// Session metadata. `None` if session doesn't exist.
    pub fn session(&self, session_id: u64) -> Option<&SessionInfo> {
        self.sessions.get(&session_id)
    }

    /// Record the display name of a session.
    ///
    /// Returns `false` if the session doesn't exist.
    pub fn set_name(&mut self, session_id: u64, name: String) -> bool {
        match self.sessions.get_mut(&session_id) {
            Some(info) => {
                info.name = Some(name);
                true
            },
            None => false,
        }
    }

    /// Check if a session is registered.
    pub fn has_session(&self, session_id: u64) -> bool {
        self.sessions.contains_key(&session_id)
    }

    /// All registered session ids, ascending.
    pub fn session_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.sessions.keys().copied()
    }

    /// Number of registered sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no session is registered.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
