//! CloudFormation stack listing and deletion

use super::context::AwsContext;
use super::error::remote_error;
use super::next_page_token;
use aws_sdk_cloudformation::Client;
use cfn_purge_common::{Page, RemoteError, StackOperations, StackResourceSummary};
use tracing::{debug, info};

/// CloudFormation client for the stack being purged
pub struct CloudFormationClient {
    client: Client,
}

impl CloudFormationClient {
    /// Create a CloudFormation client from a pre-loaded AWS context
    pub fn from_context(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.cloudformation_client(),
        }
    }

    /// List one page of the stack's member resources.
    ///
    /// Members without a physical id (not created yet, or already gone)
    /// cannot hold content and are left out, as are members the service
    /// reports without a type.
    pub async fn list_stack_resources(
        &self,
        stack_name: &str,
        next_token: Option<String>,
    ) -> Result<Page<StackResourceSummary>, RemoteError> {
        let response = self
            .client
            .list_stack_resources()
            .stack_name(stack_name)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| remote_error("ListStackResources", e))?;

        let resources: Vec<_> = response
            .stack_resource_summaries()
            .iter()
            .filter_map(to_summary)
            .collect();

        debug!(stack = %stack_name, count = resources.len(), "Listed stack resources page");
        Ok(Page::new(resources, next_page_token(response.next_token())))
    }

    /// Request deletion of the stack. Deletion itself proceeds asynchronously.
    pub async fn delete_stack(&self, stack_name: &str) -> Result<(), RemoteError> {
        info!(stack = %stack_name, "Deleting stack");

        self.client
            .delete_stack()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(|e| remote_error("DeleteStack", e))?;

        Ok(())
    }
}

fn to_summary(
    summary: &aws_sdk_cloudformation::types::StackResourceSummary,
) -> Option<StackResourceSummary> {
    match (summary.physical_resource_id(), summary.resource_type()) {
        (Some(physical_id), Some(resource_type)) => {
            Some(StackResourceSummary::new(physical_id, resource_type))
        }
        _ => {
            debug!(
                logical_id = ?summary.logical_resource_id(),
                "Skipping stack resource without a physical id or type"
            );
            None
        }
    }
}

impl StackOperations for CloudFormationClient {
    async fn list_stack_resources(
        &self,
        stack_name: &str,
        next_token: Option<String>,
    ) -> Result<Page<StackResourceSummary>, RemoteError> {
        CloudFormationClient::list_stack_resources(self, stack_name, next_token).await
    }

    async fn delete_stack(&self, stack_name: &str) -> Result<(), RemoteError> {
        CloudFormationClient::delete_stack(self, stack_name).await
    }
}
