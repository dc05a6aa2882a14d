//! In-memory identity client for tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use crate::client::IdentityClient;
use crate::error::{ClientError, Result};
use crate::types::{
    ResourceKind, Sid, SidCreate, SidFilter, SidId, SidUpdate, Sip, SipCreate, SipFilter, SipId,
    SipUpdate,
};

#[derive(Debug, Default)]
struct FakeState {
    sids: BTreeMap<SidId, Sid>,
    sips: BTreeMap<SipId, Sip>,
    next_id: u64,
    calls: Vec<String>,
}

impl FakeState {
    fn next_id(&mut self, kind: ResourceKind) -> String {
        self.next_id += 1;
        format!("{kind}-{:04}", self.next_id)
    }
}

/// A fake identity service holding sids and sips in memory.
///
/// Every trait call is recorded so tests can assert which operations ran.
#[derive(Debug, Clone, Default)]
pub struct FakeIdentityClient {
    state: Arc<Mutex<FakeState>>,
}

impl FakeIdentityClient {
    /// Creates an empty fake service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a sid.
    #[must_use]
    pub fn with_sid(self, sid: Sid) -> Self {
        self.lock().sids.insert(sid.id.clone(), sid);
        self
    }

    /// Seeds a sip.
    #[must_use]
    pub fn with_sip(self, sip: Sip) -> Self {
        self.lock().sips.insert(sip.id.clone(), sip);
        self
    }

    /// Names of the operations invoked so far, e.g. `get_sid:abc`.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// Current copy of a stored sid.
    pub fn sid(&self, id: &str) -> Option<Sid> {
        self.lock().sids.get(&SidId::from(id)).cloned()
    }

    /// Current copy of a stored sip.
    pub fn sip(&self, id: &str) -> Option<Sip> {
        self.lock().sips.get(&SipId::from(id)).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, call: String) -> MutexGuard<'_, FakeState> {
        let mut state = self.lock();
        state.calls.push(call);
        state
    }
}

fn not_found(kind: ResourceKind, id: &str) -> ClientError {
    ClientError::NotFound {
        kind,
        name_or_id: id.to_string(),
    }
}

fn conflict(kind: ResourceKind, name: &str) -> ClientError {
    ClientError::Api {
        status: 409,
        message: format!("Duplicate entry: {kind} '{name}' already exists"),
    }
}

impl IdentityClient for FakeIdentityClient {
    async fn list_sids(&self, filter: &SidFilter) -> Result<Vec<Sid>> {
        let state = self.record("list_sids".to_string());
        Ok(state
            .sids
            .values()
            .filter(|s| filter.name.as_ref().is_none_or(|n| &s.name == n))
            .cloned()
            .collect())
    }

    async fn get_sid(&self, id: &SidId) -> Result<Sid> {
        let state = self.record(format!("get_sid:{id}"));
        state
            .sids
            .get(id)
            .cloned()
            .ok_or_else(|| not_found(ResourceKind::Sid, id.as_str()))
    }

    async fn create_sid(&self, request: &SidCreate) -> Result<Sid> {
        let mut state = self.record(format!("create_sid:{}", request.name));
        if state.sids.values().any(|s| s.name == request.name) {
            return Err(conflict(ResourceKind::Sid, &request.name));
        }

        let sid = Sid {
            id: SidId::new(state.next_id(ResourceKind::Sid)),
            name: request.name.clone(),
            description: request.description.clone(),
            enabled: request.enabled,
            members: request.members.clone(),
            extra: BTreeMap::new(),
        };
        state.sids.insert(sid.id.clone(), sid.clone());
        Ok(sid)
    }

    async fn update_sid(&self, id: &SidId, request: &SidUpdate) -> Result<Sid> {
        let mut state = self.record(format!("update_sid:{id}"));
        let sid = state
            .sids
            .get_mut(id)
            .ok_or_else(|| not_found(ResourceKind::Sid, id.as_str()))?;

        if let Some(name) = &request.name {
            sid.name.clone_from(name);
        }
        if let Some(description) = &request.description {
            sid.description = Some(description.clone());
        }
        if let Some(enabled) = request.enabled {
            sid.enabled = enabled;
        }
        if let Some(members) = &request.members {
            sid.members = Some(members.clone());
        }
        Ok(sid.clone())
    }

    async fn delete_sid(&self, id: &SidId) -> Result<()> {
        let mut state = self.record(format!("delete_sid:{id}"));
        state
            .sids
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found(ResourceKind::Sid, id.as_str()))
    }

    async fn list_sips(&self, filter: &SipFilter) -> Result<Vec<Sip>> {
        let state = self.record("list_sips".to_string());
        Ok(state
            .sips
            .values()
            .filter(|s| filter.name.as_ref().is_none_or(|n| &s.name == n))
            .filter(|s| {
                filter
                    .sid_id
                    .as_ref()
                    .is_none_or(|sid| s.sid_id.as_ref() == Some(sid))
            })
            .cloned()
            .collect())
    }

    async fn get_sip(&self, id: &SipId) -> Result<Sip> {
        let state = self.record(format!("get_sip:{id}"));
        state
            .sips
            .get(id)
            .cloned()
            .ok_or_else(|| not_found(ResourceKind::Sip, id.as_str()))
    }

    async fn create_sip(&self, request: &SipCreate) -> Result<Sip> {
        let mut state = self.record(format!("create_sip:{}", request.name));
        if let Some(sid_id) = &request.sid_id {
            if !state.sids.contains_key(sid_id) {
                return Err(not_found(ResourceKind::Sid, sid_id.as_str()));
            }
        }
        if state
            .sips
            .values()
            .any(|s| s.name == request.name && s.sid_id == request.sid_id)
        {
            return Err(conflict(ResourceKind::Sip, &request.name));
        }

        let sip = Sip {
            id: SipId::new(state.next_id(ResourceKind::Sip)),
            name: request.name.clone(),
            description: request.description.clone(),
            enabled: request.enabled,
            sid_id: request.sid_id.clone(),
            extra: request
                .properties
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        };
        state.sips.insert(sip.id.clone(), sip.clone());
        Ok(sip)
    }

    async fn update_sip(&self, id: &SipId, request: &SipUpdate) -> Result<Sip> {
        let mut state = self.record(format!("update_sip:{id}"));
        let sip = state
            .sips
            .get_mut(id)
            .ok_or_else(|| not_found(ResourceKind::Sip, id.as_str()))?;

        if let Some(name) = &request.name {
            sip.name.clone_from(name);
        }
        if let Some(description) = &request.description {
            sip.description = Some(description.clone());
        }
        if let Some(enabled) = request.enabled {
            sip.enabled = enabled;
        }
        if let Some(sid_id) = &request.sid_id {
            sip.sid_id = Some(sid_id.clone());
        }
        for (key, value) in &request.properties {
            sip.extra.insert(key.clone(), Value::String(value.clone()));
        }
        Ok(sip.clone())
    }

    async fn delete_sip(&self, id: &SipId) -> Result<()> {
        let mut state = self.record(format!("delete_sip:{id}"));
        state
            .sips
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found(ResourceKind::Sip, id.as_str()))
    }
}
