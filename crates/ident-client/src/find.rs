//! Name-or-id resolution.
//!
//! Commands accept either an id or a name. Lookup tries the id first and
//! falls back to an exact-name search, which must be unambiguous.

use tracing::debug;

use crate::client::IdentityClient;
use crate::error::{ClientError, Result};
use crate::types::{Resource, Sid, SidFilter, SidId, Sip, SipFilter, SipId};

/// Resolve a sid by id or name.
///
/// # Errors
///
/// Returns [`ClientError::NotFound`] when nothing matches,
/// [`ClientError::NoUniqueMatch`] when the name is ambiguous, or any
/// other error the service reports.
pub async fn find_sid<C: IdentityClient>(client: &C, name_or_id: &str) -> Result<Sid> {
    match client.get_sid(&SidId::from(name_or_id)).await {
        Err(err) if err.is_not_found() => {}
        other => return other,
    }

    debug!(name = name_or_id, "sid id lookup missed, searching by name");
    let candidates = client.list_sids(&SidFilter::by_name(name_or_id)).await?;
    pick_by_name(name_or_id, candidates)
}

/// Resolve a sip by id or name.
///
/// # Errors
///
/// Same as [`find_sid`].
pub async fn find_sip<C: IdentityClient>(client: &C, name_or_id: &str) -> Result<Sip> {
    match client.get_sip(&SipId::from(name_or_id)).await {
        Err(err) if err.is_not_found() => {}
        other => return other,
    }

    debug!(name = name_or_id, "sip id lookup missed, searching by name");
    let candidates = client.list_sips(&SipFilter::by_name(name_or_id)).await?;
    pick_by_name(name_or_id, candidates)
}

/// Keep exact name matches; the service may ignore the filter.
fn pick_by_name<T: Resource>(name: &str, candidates: Vec<T>) -> Result<T> {
    let mut matches: Vec<T> = candidates.into_iter().filter(|r| r.name() == name).collect();

    match matches.len() {
        0 => Err(ClientError::NotFound {
            kind: T::KIND,
            name_or_id: name.to_string(),
        }),
        1 => Ok(matches.remove(0)),
        count => Err(ClientError::NoUniqueMatch {
            kind: T::KIND,
            name: name.to_string(),
            count,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeIdentityClient;
    use crate::types::{SidCreate, SipCreate};

    #[tokio::test]
    async fn finds_sid_by_id_without_listing() {
        let client = FakeIdentityClient::new();
        let sid = client.create_sid(&SidCreate::new("blue")).await.expect("create");

        let found = find_sid(&client, sid.id.as_str()).await.expect("find");
        assert_eq!(found.id, sid.id);
        assert!(!client.calls().contains(&"list_sids".to_string()));
    }

    #[tokio::test]
    async fn finds_sid_by_name() {
        let client = FakeIdentityClient::new();
        let sid = client.create_sid(&SidCreate::new("blue")).await.expect("create");

        let found = find_sid(&client, "blue").await.expect("find");
        assert_eq!(found.id, sid.id);
    }

    #[tokio::test]
    async fn missing_sid_reports_not_found() {
        let client = FakeIdentityClient::new();
        let err = find_sid(&client, "ghost").await.unwrap_err();
        assert_eq!(err.to_string(), "No sid with a name or ID of 'ghost' exists.");
    }

    #[tokio::test]
    async fn ambiguous_sip_name_is_rejected() {
        let client = FakeIdentityClient::new();
        let a = client.create_sid(&SidCreate::new("a")).await.expect("sid a");
        let b = client.create_sid(&SidCreate::new("b")).await.expect("sid b");
        for sid in [&a, &b] {
            let mut request = SipCreate::new("web");
            request.sid_id = Some(sid.id.clone());
            client.create_sip(&request).await.expect("create sip");
        }

        let err = find_sip(&client, "web").await.unwrap_err();
        assert!(matches!(err, ClientError::NoUniqueMatch { count: 2, .. }));
        assert_eq!(err.to_string(), "More than one sip exists with the name 'web'.");
    }

    #[test]
    fn pick_ignores_inexact_names() {
        let sids: Vec<Sid> = ["blue", "Blue", "blue2"]
            .iter()
            .enumerate()
            .map(|(i, name)| Sid {
                id: SidId::new(format!("s{i}")),
                name: (*name).to_string(),
                description: None,
                enabled: true,
                members: None,
                extra: Default::default(),
            })
            .collect();

        let picked = pick_by_name("blue", sids).expect("one exact match");
        assert_eq!(picked.id, SidId::new("s0"));
    }
}
