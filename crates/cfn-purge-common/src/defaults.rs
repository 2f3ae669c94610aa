//! Default configuration values shared between the CLI and AWS clients

/// CloudFormation resource type of an ECR repository
pub const DEFAULT_REPOSITORY_TYPE: &str = "AWS::ECR::Repository";

/// Region used when neither `--region` nor `AWS_REGION` is set
pub const DEFAULT_REGION: &str = "us-east-1";

/// Page size requested from `DescribeImages` (the service maximum)
pub const DESCRIBE_IMAGES_PAGE_SIZE: i32 = 1000;

/// Maximum number of image ids accepted by one `BatchDeleteImage` request
pub const BATCH_DELETE_IMAGE_LIMIT: usize = 100;
