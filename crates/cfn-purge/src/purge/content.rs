//! Repository content enumeration and bulk deletion

use cfn_purge_common::{
    ContentIdentifier, PurgeFailure, RemoteError, RepositoryHandle, RepositoryOperations,
    drain_pages,
};
use tracing::debug;

/// List every content identifier in the repository, in page order.
pub async fn enumerate<R: RepositoryOperations>(
    registry: &R,
    repository: &RepositoryHandle,
) -> Result<Vec<ContentIdentifier>, RemoteError> {
    let images = drain_pages(move |token| registry.list_images(repository, token)).await?;
    debug!(repository = %repository, count = images.len(), "Enumerated repository content");
    Ok(images)
}

/// Delete the identifiers from the repository and return the ones that
/// could not be deleted. An empty list is a no-op: the remote API rejects
/// empty requests, so no call is made.
pub async fn purge<R: RepositoryOperations>(
    registry: &R,
    repository: &RepositoryHandle,
    identifiers: &[ContentIdentifier],
) -> Result<Vec<PurgeFailure>, RemoteError> {
    if identifiers.is_empty() {
        return Ok(Vec::new());
    }
    registry.batch_delete_images(repository, identifiers).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfn_purge_test_utils::{Call, CallKind, CallLog, ScriptedRegistry, digests};

    #[tokio::test]
    async fn test_enumerate_concatenates_pages() {
        let log = CallLog::new();
        let registry = ScriptedRegistry::new(&log)
            .with_page("web", None, digests(&["d1", "d2"]), Some("t1"))
            .with_page("web", Some("t1"), digests(&["d3"]), Some("t2"))
            .with_page("web", Some("t2"), digests(&[]), None);

        let images = enumerate(&registry, &RepositoryHandle::new("web")).await.unwrap();
        assert_eq!(images, digests(&["d1", "d2", "d3"]));
        assert_eq!(log.count(CallKind::ListImages), 3);
    }

    #[tokio::test]
    async fn test_enumerate_empty_repository() {
        let log = CallLog::new();
        let registry = ScriptedRegistry::new(&log).with_page("web", None, vec![], None);

        let images = enumerate(&registry, &RepositoryHandle::new("web")).await.unwrap();
        assert!(images.is_empty());
    }

    #[tokio::test]
    async fn test_enumerate_propagates_error() {
        let log = CallLog::new();
        let registry = ScriptedRegistry::new(&log)
            .with_page("web", None, digests(&["d1"]), Some("t1"))
            .with_list_error(
                "web",
                Some("t1"),
                RemoteError::new("DescribeImages", Some("AccessDeniedException"), "denied"),
            );

        let err = enumerate(&registry, &RepositoryHandle::new("web")).await.unwrap_err();
        assert!(err.is_access_denied());
    }

    #[tokio::test]
    async fn test_purge_skips_empty_list() {
        let log = CallLog::new();
        let registry = ScriptedRegistry::new(&log);

        let failures = purge(&registry, &RepositoryHandle::new("web"), &[]).await.unwrap();
        assert!(failures.is_empty());
        assert_eq!(log.count(CallKind::BatchDeleteImages), 0);
    }

    #[tokio::test]
    async fn test_purge_returns_reported_failures() {
        let log = CallLog::new();
        let failure = PurgeFailure::new("d2", "ImageReferencedByManifestList", "in use");
        let registry =
            ScriptedRegistry::new(&log).with_delete_failures("web", vec![failure.clone()]);

        let failures = purge(&registry, &RepositoryHandle::new("web"), &digests(&["d1", "d2"]))
            .await
            .unwrap();
        assert_eq!(failures, vec![failure]);
        assert_eq!(
            log.calls(),
            vec![Call::BatchDeleteImages {
                repository: "web".to_string(),
                image_ids: vec!["d1".to_string(), "d2".to_string()],
            }]
        );
    }
}
