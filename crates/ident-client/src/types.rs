//! Resource types exchanged with the identity service.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fields owned by the typed resource structs; extra properties may not reuse them.
pub const RESERVED_SIP_FIELDS: &[&str] = &["id", "name", "description", "enabled", "sid_id", "links"];

/// The resource families this client manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Domain-like grouping resource.
    Sid,
    /// Project-like resource scoped to a sid.
    Sip,
}

impl ResourceKind {
    /// Path segment of the collection, e.g. `sids`.
    #[must_use]
    pub const fn collection(self) -> &'static str {
        match self {
            Self::Sid => "sids",
            Self::Sip => "sips",
        }
    }

    /// Key wrapping a single resource in request and response bodies.
    #[must_use]
    pub const fn member(self) -> &'static str {
        match self {
            Self::Sid => "sid",
            Self::Sip => "sip",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.member())
    }
}

macro_rules! resource_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a service-assigned identifier.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

resource_id!(
    /// Identifier of a sid.
    SidId
);
resource_id!(
    /// Identifier of a sip.
    SipId
);

const fn default_enabled() -> bool {
    true
}

/// A sid as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sid {
    /// Service-assigned identifier.
    pub id: SidId,
    /// Sid name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the sid is enabled.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Referenced domain identifiers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<String>>,
    /// Any further attributes the service returned.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A sip as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sip {
    /// Service-assigned identifier.
    pub id: SipId,
    /// Sip name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the sip is enabled.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Owning sid.
    #[serde(default)]
    pub sid_id: Option<SidId>,
    /// Any further attributes the service returned.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Common view over sids and sips.
pub trait Resource: Serialize {
    /// Which family the resource belongs to.
    const KIND: ResourceKind;

    /// The resource name.
    fn name(&self) -> &str;

    /// The resource id as a string.
    fn id_str(&self) -> &str;

    /// All attributes keyed by field name, sorted, without `links`.
    fn to_record(&self) -> BTreeMap<String, Value> {
        let mut record: BTreeMap<String, Value> = match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map.into_iter().collect(),
            _ => BTreeMap::new(),
        };
        record.remove("links");
        record
    }
}

impl Resource for Sid {
    const KIND: ResourceKind = ResourceKind::Sid;

    fn name(&self) -> &str {
        &self.name
    }

    fn id_str(&self) -> &str {
        self.id.as_str()
    }
}

impl Resource for Sip {
    const KIND: ResourceKind = ResourceKind::Sip;

    fn name(&self) -> &str {
        &self.name
    }

    fn id_str(&self) -> &str {
        self.id.as_str()
    }
}

/// Attributes for a new sid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidCreate {
    /// Sid name.
    pub name: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Enabled flag.
    pub enabled: bool,
    /// Referenced domain identifiers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<String>>,
}

impl SidCreate {
    /// A new enabled sid with only a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            enabled: true,
            members: None,
        }
    }
}

/// Changes to apply to a sid. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SidUpdate {
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New enabled flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Replacement member list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<String>>,
}

impl SidUpdate {
    /// True when no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.enabled.is_none()
            && self.members.is_none()
    }
}

/// Attributes for a new sip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SipCreate {
    /// Sip name.
    pub name: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Enabled flag.
    pub enabled: bool,
    /// Owning sid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid_id: Option<SidId>,
    /// Extra properties sent alongside the typed fields.
    #[serde(flatten)]
    pub properties: BTreeMap<String, String>,
}

impl SipCreate {
    /// A new enabled, unscoped sip with only a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            enabled: true,
            sid_id: None,
            properties: BTreeMap::new(),
        }
    }
}

/// Changes to apply to a sip. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SipUpdate {
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New enabled flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// New owning sid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid_id: Option<SidId>,
    /// Extra properties to add or overwrite.
    #[serde(flatten)]
    pub properties: BTreeMap<String, String>,
}

impl SipUpdate {
    /// True when no field would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.enabled.is_none()
            && self.sid_id.is_none()
            && self.properties.is_empty()
    }
}

/// Server-side filter for listing sids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SidFilter {
    /// Exact name.
    pub name: Option<String>,
}

impl SidFilter {
    /// Filter on an exact name.
    #[must_use]
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        self.name.iter().map(|n| ("name", n.clone())).collect()
    }
}

/// Server-side filter for listing sips.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SipFilter {
    /// Exact name.
    pub name: Option<String>,
    /// Owning sid.
    pub sid_id: Option<SidId>,
}

impl SipFilter {
    /// Filter on an exact name.
    #[must_use]
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            sid_id: None,
        }
    }

    /// Filter on the owning sid.
    #[must_use]
    pub fn by_sid(sid_id: SidId) -> Self {
        Self {
            name: None,
            sid_id: Some(sid_id),
        }
    }

    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(name) = &self.name {
            query.push(("name", name.clone()));
        }
        if let Some(sid_id) = &self.sid_id {
            query.push(("sid_id", sid_id.to_string()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sid_deserializes_with_extras() {
        let sid: Sid = serde_json::from_value(json!({
            "id": "a1b2",
            "name": "blue",
            "description": null,
            "enabled": false,
            "members": ["d1", "d2"],
            "links": {"self": "http://x/v3/sids/a1b2"},
            "tier": "gold"
        }))
        .expect("valid sid");

        assert_eq!(sid.id, SidId::new("a1b2"));
        assert!(!sid.enabled);
        assert_eq!(sid.members.as_deref(), Some(&["d1".to_string(), "d2".to_string()][..]));
        assert_eq!(sid.extra.get("tier"), Some(&json!("gold")));
    }

    #[test]
    fn sid_enabled_defaults_true() {
        let sid: Sid = serde_json::from_value(json!({"id": "x", "name": "n"})).expect("valid sid");
        assert!(sid.enabled);
        assert_eq!(sid.description, None);
    }

    #[test]
    fn record_is_sorted_and_drops_links() {
        let sip: Sip = serde_json::from_value(json!({
            "id": "p1",
            "name": "web",
            "description": "front",
            "enabled": true,
            "sid_id": "s1",
            "links": {"self": "http://x"},
            "colour": "red"
        }))
        .expect("valid sip");

        let record = sip.to_record();
        let keys: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(keys, ["colour", "description", "enabled", "id", "name", "sid_id"]);
        assert_eq!(record["sid_id"], json!("s1"));
    }

    #[test]
    fn record_keeps_null_description() {
        let sid: Sid = serde_json::from_value(json!({"id": "x", "name": "n"})).expect("valid sid");
        let record = sid.to_record();
        assert_eq!(record["description"], Value::Null);
        assert!(!record.contains_key("members"));
    }

    #[test]
    fn sid_update_skips_unset_fields() {
        let update = SidUpdate {
            enabled: Some(false),
            ..SidUpdate::default()
        };
        assert!(!update.is_empty());
        assert_eq!(serde_json::to_value(&update).expect("serialize"), json!({"enabled": false}));
        assert!(SidUpdate::default().is_empty());
    }

    #[test]
    fn sip_create_flattens_properties() {
        let mut create = SipCreate::new("web");
        create.sid_id = Some(SidId::new("s1"));
        create.properties.insert("colour".into(), "red".into());

        let body = serde_json::to_value(&create).expect("serialize");
        assert_eq!(
            body,
            json!({"name": "web", "enabled": true, "sid_id": "s1", "colour": "red"})
        );
    }

    #[test]
    fn sip_filter_query() {
        let filter = SipFilter {
            name: Some("web".into()),
            sid_id: Some(SidId::new("s1")),
        };
        assert_eq!(
            filter.query(),
            vec![("name", "web".to_string()), ("sid_id", "s1".to_string())]
        );
        assert!(SipFilter::default().query().is_empty());
    }

    #[test]
    fn kind_names() {
        assert_eq!(ResourceKind::Sid.collection(), "sids");
        assert_eq!(ResourceKind::Sip.member(), "sip");
        assert_eq!(ResourceKind::Sip.to_string(), "sip");
    }
}
