use std::str::FromStr;
use url::Url;

use crate::{
    definitions::{Query, QueryResponse},
    errors::{Result, WikiError},
    reqwest_client::Transport,
};

// {base}/api.php?action=query&format=json&titles=Center%20for%20...
// {base}/api.php?action=query&format=json&prop=revisions&pageids=42
// {base}/api.php?action=query&format=json&revids=100&prop=revisions&rvslots=*&rvprop=content

/// Build the basic api url every lookup starts from.
fn build_wiki_url(base: &str) -> Result<Url> {
    let base = base.trim().trim_end_matches('/');
    if base.is_empty() {
        return Err(WikiError::invalid_arg("wiki base url is empty"));
    }
    let mut url = Url::from_str(&format!("{}/api.php", base))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(WikiError::InvalidUrl {
            msg: format!("{:?} is not an http(s) wiki root", base),
            source: None,
        });
    }
    url.query_pairs_mut()
        .append_pair("action", "query")
        .append_pair("format", "json")
        .finish();
    Ok(url)
}

/// Send the request and decode the `query` block of the answer.
fn run_query<T: Transport + ?Sized>(transport: &T, url: &Url) -> Result<Query> {
    let response = transport.get(url)?;
    if !response.is_success() {
        log::warn!("Query {} failed with status {}", url, response.status);
        return Err(WikiError::Remote {
            status: response.status,
        });
    }
    serde_json::from_str::<QueryResponse>(&response.body)?.into_query()
}

/// Get the id of the page with the given title.
///
/// # Arguments
/// - transport -> How to reach the wiki.
/// - base -> Wiki root, e.g. `https://wiki.mako.cc`.
/// - title -> Human readable page title.
///
/// # Returns
/// - Ok(i64) -> The page id.
/// - Err(WikiError) -> Transport, Remote, Decode or NotFound.
pub fn resolve_page_id<T: Transport + ?Sized>(
    transport: &T,
    base: &str,
    title: &str,
) -> Result<i64> {
    if title.trim().is_empty() {
        return Err(WikiError::invalid_arg("page title is empty"));
    }
    let mut url = build_wiki_url(base)?;
    url.query_pairs_mut().append_pair("titles", title).finish();

    let query = run_query(transport, &url)?;
    let not_found = || WikiError::NotFound {
        title: title.to_string(),
    };
    let page = query.single_page()?.ok_or_else(not_found)?;
    if page.is_missing() {
        return Err(not_found());
    }
    let id = page.id.ok_or_else(not_found)?;
    log::info!("Page {:?} has id {}", page.title, id);
    Ok(id)
}

/// Get the id of the latest revision of a page.
///
/// The server lists revisions newest first, so the first entry is taken as is.
pub fn resolve_latest_revision<T: Transport + ?Sized>(
    transport: &T,
    base: &str,
    page_id: i64,
) -> Result<i64> {
    let mut url = build_wiki_url(base)?;
    url.query_pairs_mut()
        .append_pair("prop", "revisions")
        .append_pair("pageids", &page_id.to_string())
        .finish();

    let query = run_query(transport, &url)?;
    let page = query.single_page()?.ok_or_else(|| WikiError::NotFound {
        title: format!("#{}", page_id),
    })?;
    if page.is_missing() {
        return Err(WikiError::NotFound {
            title: format!("#{}", page_id),
        });
    }
    let revision = page
        .latest_revision()
        .ok_or(WikiError::NoRevisions { page_id })?;
    let id = revision
        .id
        .ok_or_else(|| WikiError::decode("revision entry has no revid"))?;

    log::info!(
        "Latest revision of page {} is {} (by {}, {}, parent {:?})",
        page_id,
        id,
        revision.author.as_deref().unwrap_or("unknown"),
        revision
            .timestamp
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "no timestamp".to_string()),
        revision.parent_id,
    );
    if let Some(comment) = revision.comment.as_deref().filter(|c| !c.is_empty()) {
        log::debug!("Revision {} comment: {}", id, comment);
    }
    Ok(id)
}

/// Get the raw markup stored in the `main` slot of a revision.
pub fn fetch_content<T: Transport + ?Sized>(
    transport: &T,
    base: &str,
    revision_id: i64,
) -> Result<String> {
    let mut url = build_wiki_url(base)?;
    url.query_pairs_mut()
        .append_pair("revids", &revision_id.to_string())
        .append_pair("prop", "revisions")
        .append_pair("rvslots", "*")
        .append_pair("rvprop", "content")
        .finish();

    let query = run_query(transport, &url)?;
    let missing = WikiError::RevisionMissing { revision_id };
    if query.badrevids.contains_key(&revision_id) {
        return Err(missing);
    }
    let revision = query
        .single_page()?
        .and_then(|page| page.latest_revision())
        .ok_or(missing)?;

    if revision.slots.is_empty() {
        log::warn!("Revision {} has no slots at all", revision_id);
    }
    let content = revision
        .main_slot()
        .ok_or(WikiError::SlotMissing { revision_id })?;
    log::debug!(
        "Revision {} main slot: {} bytes of {} ({})",
        revision_id,
        content.text.len(),
        content.model,
        content.format
    );
    Ok(content.text.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reqwest_client::mock::MockTransport;

    const BASE: &str = "https://wiki.example.org";

    #[test]
    fn wiki_url_has_query_and_format() {
        let url = build_wiki_url("https://wiki.mako.cc/").unwrap();
        assert_eq!(
            url.as_str(),
            "https://wiki.mako.cc/api.php?action=query&format=json"
        );

        let url = build_wiki_url("https://example.org/w").unwrap();
        assert_eq!(url.path(), "/w/api.php");
    }

    #[test]
    fn wiki_url_rejects_garbage() {
        assert!(matches!(
            build_wiki_url("  "),
            Err(WikiError::InvalidArgument { .. })
        ));
        assert!(matches!(
            build_wiki_url("not a url"),
            Err(WikiError::InvalidUrl { .. })
        ));
        assert!(matches!(
            build_wiki_url("ftp://wiki.example.org"),
            Err(WikiError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn page_id_from_lookup() {
        let mock = MockTransport::new().route(
            "titles",
            "Center for Extraordinary Postquarantine Dining",
            200,
            r#"{"query":{"pages":{"42":{"pageid":42,"ns":0,"title":"Center for Extraordinary Postquarantine Dining"}}}}"#,
        );
        let id =
            resolve_page_id(&mock, BASE, "Center for Extraordinary Postquarantine Dining").unwrap();
        assert_eq!(id, 42);

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].as_str().contains("titles=Center+for+Extraordinary"));
    }

    #[test]
    fn page_lookup_errors() {
        let mock = MockTransport::new()
            .route("titles", "Empty", 200, r#"{"query":{"pages":{}}}"#)
            .route(
                "titles",
                "Missing",
                200,
                r#"{"query":{"pages":{"-1":{"ns":0,"title":"Missing","missing":""}}}}"#,
            )
            .route("titles", "Broken", 200, "<html>oops</html>")
            .route("titles", "Down", 503, "")
            .fail("titles", "Unreachable", "connection refused");

        assert!(matches!(
            resolve_page_id(&mock, BASE, "Empty"),
            Err(WikiError::NotFound { .. })
        ));
        assert!(matches!(
            resolve_page_id(&mock, BASE, "Missing"),
            Err(WikiError::NotFound { .. })
        ));
        assert!(matches!(
            resolve_page_id(&mock, BASE, "Broken"),
            Err(WikiError::Decode { .. })
        ));
        assert!(matches!(
            resolve_page_id(&mock, BASE, "Down"),
            Err(WikiError::Remote { status: 503 })
        ));
        assert!(matches!(
            resolve_page_id(&mock, BASE, "Unreachable"),
            Err(WikiError::Transport { .. })
        ));
    }

    #[test]
    fn empty_title_is_rejected_without_a_request() {
        let mock = MockTransport::new();
        assert!(matches!(
            resolve_page_id(&mock, BASE, " "),
            Err(WikiError::InvalidArgument { .. })
        ));
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn latest_revision_takes_first_entry() {
        let mock = MockTransport::new().route(
            "pageids",
            "42",
            200,
            r#"{"query":{"pages":{"42":{"pageid":42,"title":"T","revisions":[
                {"revid":100,"parentid":98,"user":"a","timestamp":"2020-04-02T00:00:00Z","comment":""},
                {"revid":98,"parentid":0,"user":"b","timestamp":"2020-04-01T00:00:00Z","comment":""}
            ]}}}}"#,
        );
        assert_eq!(resolve_latest_revision(&mock, BASE, 42).unwrap(), 100);
        assert!(mock.calls()[0].as_str().contains("prop=revisions"));
    }

    #[test]
    fn page_without_revisions() {
        let mock = MockTransport::new().route(
            "pageids",
            "7",
            200,
            r#"{"query":{"pages":{"7":{"pageid":7,"title":"T","revisions":[]}}}}"#,
        );
        assert!(matches!(
            resolve_latest_revision(&mock, BASE, 7),
            Err(WikiError::NoRevisions { page_id: 7 })
        ));
    }

    #[test]
    fn content_from_main_slot() {
        let mock = MockTransport::new().route(
            "revids",
            "100",
            200,
            r#"{"query":{"pages":{"42":{"pageid":42,"title":"T","revisions":[
                {"slots":{"main":{"contentmodel":"wikitext","contentformat":"text/x-wiki","*":"== Groceries ==\n* milk"}}}
            ]}}}}"#,
        );
        let text = fetch_content(&mock, BASE, 100).unwrap();
        assert_eq!(text, "== Groceries ==\n* milk");

        let url = &mock.calls()[0];
        assert!(url.query_pairs().any(|(k, v)| k == "rvslots" && v == "*"));
        assert!(url.query_pairs().any(|(k, v)| k == "rvprop" && v == "content"));
    }

    #[test]
    fn content_errors() {
        let mock = MockTransport::new()
            .route(
                "revids",
                "1",
                200,
                r#"{"query":{"pages":{"42":{"pageid":42,"title":"T","revisions":[
                    {"slots":{"aux":{"contentmodel":"json","contentformat":"application/json","*":"{}"}}}
                ]}}}}"#,
            )
            .route(
                "revids",
                "2",
                200,
                r#"{"query":{"badrevids":{"2":{"revid":2,"missing":""}}}}"#,
            )
            .route(
                "revids",
                "3",
                200,
                r#"{"query":{"pages":{"42":{"pageid":42,"title":"T"}}}}"#,
            );

        assert!(matches!(
            fetch_content(&mock, BASE, 1),
            Err(WikiError::SlotMissing { revision_id: 1 })
        ));
        assert!(matches!(
            fetch_content(&mock, BASE, 2),
            Err(WikiError::RevisionMissing { revision_id: 2 })
        ));
        assert!(matches!(
            fetch_content(&mock, BASE, 3),
            Err(WikiError::RevisionMissing { revision_id: 3 })
        ));
    }
}
