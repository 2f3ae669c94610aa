//! Selection of content-bearing stack members

use cfn_purge_common::{RepositoryHandle, StackResourceSummary};

/// Keep the resources whose type is exactly `target_type`, in input order.
pub fn classify(resources: &[StackResourceSummary], target_type: &str) -> Vec<RepositoryHandle> {
    resources
        .iter()
        .filter(|r| r.resource_type == target_type)
        .map(|r| RepositoryHandle::new(&r.physical_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfn_purge_common::defaults::DEFAULT_REPOSITORY_TYPE;
    use cfn_purge_test_utils::{ecr_repository, resource};

    #[test]
    fn test_keeps_matches_in_order() {
        let resources = vec![
            resource("cluster", "AWS::ECS::Cluster"),
            ecr_repository("web"),
            resource("queue", "AWS::SQS::Queue"),
            ecr_repository("api"),
        ];

        let repos = classify(&resources, DEFAULT_REPOSITORY_TYPE);
        assert_eq!(repos, vec![RepositoryHandle::new("web"), RepositoryHandle::new("api")]);
    }

    #[test]
    fn test_no_matches_is_empty() {
        let resources = vec![resource("cluster", "AWS::ECS::Cluster")];
        assert!(classify(&resources, DEFAULT_REPOSITORY_TYPE).is_empty());
        assert!(classify(&[], DEFAULT_REPOSITORY_TYPE).is_empty());
    }

    #[test]
    fn test_type_must_match_exactly() {
        let resources = vec![
            resource("rule", "AWS::ECR::PullThroughCacheRule"),
            resource("lower", "aws::ecr::repository"),
            resource("public", "AWS::ECR::PublicRepository"),
        ];
        assert!(classify(&resources, DEFAULT_REPOSITORY_TYPE).is_empty());

        let public = classify(&resources, "AWS::ECR::PublicRepository");
        assert_eq!(public, vec![RepositoryHandle::new("public")]);
    }
}
