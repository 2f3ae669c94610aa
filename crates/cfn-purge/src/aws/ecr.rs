//! ECR image listing and deletion

use super::context::AwsContext;
use super::error::remote_error;
use super::next_page_token;
use aws_sdk_ecr::Client;
use aws_sdk_ecr::types::{ImageFailure, ImageIdentifier};
use cfn_purge_common::defaults::{BATCH_DELETE_IMAGE_LIMIT, DESCRIBE_IMAGES_PAGE_SIZE};
use cfn_purge_common::{
    ContentIdentifier, Page, PurgeFailure, RemoteError, RepositoryHandle, RepositoryOperations,
};
use tracing::debug;

/// ECR client for emptying repositories
pub struct EcrClient {
    client: Client,
}

impl EcrClient {
    /// Create an ECR client from a pre-loaded AWS context
    pub fn from_context(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.ecr_client(),
        }
    }

    /// List one page of image digests in a repository
    pub async fn list_images(
        &self,
        repository: &RepositoryHandle,
        next_token: Option<String>,
    ) -> Result<Page<ContentIdentifier>, RemoteError> {
        let response = self
            .client
            .describe_images()
            .repository_name(repository.as_str())
            .max_results(DESCRIBE_IMAGES_PAGE_SIZE)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| remote_error("DescribeImages", e))?;

        let images: Vec<_> = response
            .image_details()
            .iter()
            .filter_map(|detail| detail.image_digest())
            .map(ContentIdentifier::new)
            .collect();

        debug!(repository = %repository, count = images.len(), "Listed images page");
        Ok(Page::new(images, next_page_token(response.next_token())))
    }

    /// Delete images by digest, returning the per-image failures.
    ///
    /// `BatchDeleteImage` accepts a bounded number of ids per request, so
    /// larger lists are sent as consecutive requests. A transport error on
    /// any request aborts the remaining ones.
    pub async fn batch_delete_images(
        &self,
        repository: &RepositoryHandle,
        image_ids: &[ContentIdentifier],
    ) -> Result<Vec<PurgeFailure>, RemoteError> {
        delete_in_chunks(image_ids, BATCH_DELETE_IMAGE_LIMIT, |chunk| {
            self.delete_chunk(repository, chunk)
        })
        .await
    }

    async fn delete_chunk(
        &self,
        repository: &RepositoryHandle,
        chunk: &[ContentIdentifier],
    ) -> Result<Vec<PurgeFailure>, RemoteError> {
        let ids = chunk
            .iter()
            .map(|id| ImageIdentifier::builder().image_digest(id.as_str()).build())
            .collect();

        let response = self
            .client
            .batch_delete_image()
            .repository_name(repository.as_str())
            .set_image_ids(Some(ids))
            .send()
            .await
            .map_err(|e| remote_error("BatchDeleteImage", e))?;

        debug!(
            repository = %repository,
            deleted = response.image_ids().len(),
            failed = response.failures().len(),
            "Batch delete response"
        );
        Ok(response.failures().iter().map(to_purge_failure).collect())
    }
}

/// Feed `image_ids` to `delete` in sequential chunks of at most `limit`
/// ids and concatenate the reported failures. The first error stops the
/// remaining chunks.
async fn delete_in_chunks<'a, F, Fut>(
    image_ids: &'a [ContentIdentifier],
    limit: usize,
    mut delete: F,
) -> Result<Vec<PurgeFailure>, RemoteError>
where
    F: FnMut(&'a [ContentIdentifier]) -> Fut,
    Fut: Future<Output = Result<Vec<PurgeFailure>, RemoteError>>,
{
    let mut failures = Vec::new();
    for chunk in image_ids.chunks(limit) {
        failures.extend(delete(chunk).await?);
    }
    Ok(failures)
}

fn to_purge_failure(failure: &ImageFailure) -> PurgeFailure {
    let identifier = failure
        .image_id()
        .and_then(|id| id.image_digest().or(id.image_tag()))
        .unwrap_or("unknown");

    PurgeFailure::new(
        identifier,
        failure
            .failure_code()
            .map(|code| code.as_str())
            .unwrap_or("Unknown"),
        failure.failure_reason().unwrap_or_default(),
    )
}

impl RepositoryOperations for EcrClient {
    async fn list_images(
        &self,
        repository: &RepositoryHandle,
        next_token: Option<String>,
    ) -> Result<Page<ContentIdentifier>, RemoteError> {
        EcrClient::list_images(self, repository, next_token).await
    }

    async fn batch_delete_images(
        &self,
        repository: &RepositoryHandle,
        image_ids: &[ContentIdentifier],
    ) -> Result<Vec<PurgeFailure>, RemoteError> {
        EcrClient::batch_delete_images(self, repository, image_ids).await
    }
}
