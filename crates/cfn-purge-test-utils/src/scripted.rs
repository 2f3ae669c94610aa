//! Scripted CloudFormation and ECR doubles
//!
//! Pages are scripted per `(name, token)` pair, so a test describes exactly
//! which token leads to which page. Every call is appended to a shared
//! [`CallLog`], which lets tests assert both call counts and the relative
//! order of stack and repository calls.

use cfn_purge_common::defaults::DEFAULT_REPOSITORY_TYPE;
use cfn_purge_common::{
    ContentIdentifier, Page, PurgeFailure, RemoteError, RepositoryHandle, RepositoryOperations,
    StackOperations, StackResourceSummary,
};
use std::collections::HashMap;
use std::future::{Future, ready};
use std::sync::{Arc, Mutex};

/// A recorded remote call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListStackResources {
        stack_name: String,
        next_token: Option<String>,
    },
    DeleteStack {
        stack_name: String,
    },
    ListImages {
        repository: String,
        next_token: Option<String>,
    },
    BatchDeleteImages {
        repository: String,
        image_ids: Vec<String>,
    },
}

/// Call discriminant for counting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    ListStackResources,
    DeleteStack,
    ListImages,
    BatchDeleteImages,
}

impl Call {
    pub fn kind(&self) -> CallKind {
        match self {
            Call::ListStackResources { .. } => CallKind::ListStackResources,
            Call::DeleteStack { .. } => CallKind::DeleteStack,
            Call::ListImages { .. } => CallKind::ListImages,
            Call::BatchDeleteImages { .. } => CallKind::BatchDeleteImages,
        }
    }
}

/// Ordered log of calls, shared between doubles
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    /// All calls in the order they were made
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls of the given kind
    pub fn count(&self, kind: CallKind) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.kind() == kind)
            .count()
    }

    /// Position of the first call of the given kind
    pub fn position(&self, kind: CallKind) -> Option<usize> {
        self.calls.lock().unwrap().iter().position(|c| c.kind() == kind)
    }

    /// Position of the last call of the given kind
    pub fn last_position(&self, kind: CallKind) -> Option<usize> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rposition(|c| c.kind() == kind)
    }
}

type PageKey = (String, Option<String>);

/// Scripted CloudFormation stack service
#[derive(Debug, Clone)]
pub struct ScriptedStack {
    log: CallLog,
    pages: HashMap<PageKey, Result<Page<StackResourceSummary>, RemoteError>>,
    delete_errors: HashMap<String, RemoteError>,
}

impl ScriptedStack {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            pages: HashMap::new(),
            delete_errors: HashMap::new(),
        }
    }

    /// Script the page returned for `(stack_name, token)`
    pub fn with_page(
        mut self,
        stack_name: &str,
        token: Option<&str>,
        resources: Vec<StackResourceSummary>,
        next_token: Option<&str>,
    ) -> Self {
        self.pages.insert(
            (stack_name.to_string(), token.map(str::to_string)),
            Ok(Page::new(resources, next_token.map(str::to_string))),
        );
        self
    }

    /// Script a failure for the listing request `(stack_name, token)`
    pub fn with_list_error(mut self, stack_name: &str, token: Option<&str>, err: RemoteError) -> Self {
        self.pages.insert(
            (stack_name.to_string(), token.map(str::to_string)),
            Err(err),
        );
        self
    }

    /// Make `DeleteStack` fail for this stack
    pub fn with_delete_error(mut self, stack_name: &str, err: RemoteError) -> Self {
        self.delete_errors.insert(stack_name.to_string(), err);
        self
    }
}

impl StackOperations for ScriptedStack {
    fn list_stack_resources(
        &self,
        stack_name: &str,
        next_token: Option<String>,
    ) -> impl Future<Output = Result<Page<StackResourceSummary>, RemoteError>> + Send {
        self.log.record(Call::ListStackResources {
            stack_name: stack_name.to_string(),
            next_token: next_token.clone(),
        });

        let result = self
            .pages
            .get(&(stack_name.to_string(), next_token))
            .cloned()
            .unwrap_or_else(|| {
                Err(RemoteError::new(
                    "ListStackResources",
                    Some("ValidationError"),
                    format!("Stack with id {stack_name} does not exist"),
                ))
            });
        ready(result)
    }

    fn delete_stack(&self, stack_name: &str) -> impl Future<Output = Result<(), RemoteError>> + Send {
        self.log.record(Call::DeleteStack {
            stack_name: stack_name.to_string(),
        });

        let result = match self.delete_errors.get(stack_name) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        };
        ready(result)
    }
}

/// Scripted ECR repository service
#[derive(Debug, Clone)]
pub struct ScriptedRegistry {
    log: CallLog,
    pages: HashMap<PageKey, Result<Page<ContentIdentifier>, RemoteError>>,
    delete_results: HashMap<String, Result<Vec<PurgeFailure>, RemoteError>>,
}

impl ScriptedRegistry {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            pages: HashMap::new(),
            delete_results: HashMap::new(),
        }
    }

    /// Script the image page returned for `(repository, token)`
    pub fn with_page(
        mut self,
        repository: &str,
        token: Option<&str>,
        images: Vec<ContentIdentifier>,
        next_token: Option<&str>,
    ) -> Self {
        self.pages.insert(
            (repository.to_string(), token.map(str::to_string)),
            Ok(Page::new(images, next_token.map(str::to_string))),
        );
        self
    }

    /// Script a failure for the listing request `(repository, token)`
    pub fn with_list_error(mut self, repository: &str, token: Option<&str>, err: RemoteError) -> Self {
        self.pages.insert(
            (repository.to_string(), token.map(str::to_string)),
            Err(err),
        );
        self
    }

    /// Make `BatchDeleteImage` report these per-image failures
    pub fn with_delete_failures(mut self, repository: &str, failures: Vec<PurgeFailure>) -> Self {
        self.delete_results
            .insert(repository.to_string(), Ok(failures));
        self
    }

    /// Make `BatchDeleteImage` fail outright for this repository
    pub fn with_delete_error(mut self, repository: &str, err: RemoteError) -> Self {
        self.delete_results.insert(repository.to_string(), Err(err));
        self
    }
}

impl RepositoryOperations for ScriptedRegistry {
    fn list_images(
        &self,
        repository: &RepositoryHandle,
        next_token: Option<String>,
    ) -> impl Future<Output = Result<Page<ContentIdentifier>, RemoteError>> + Send {
        self.log.record(Call::ListImages {
            repository: repository.to_string(),
            next_token: next_token.clone(),
        });

        let result = self
            .pages
            .get(&(repository.to_string(), next_token))
            .cloned()
            .unwrap_or_else(|| {
                Err(RemoteError::new(
                    "DescribeImages",
                    Some("RepositoryNotFoundException"),
                    format!("The repository with name '{repository}' does not exist"),
                ))
            });
        ready(result)
    }

    fn batch_delete_images(
        &self,
        repository: &RepositoryHandle,
        image_ids: &[ContentIdentifier],
    ) -> impl Future<Output = Result<Vec<PurgeFailure>, RemoteError>> + Send {
        self.log.record(Call::BatchDeleteImages {
            repository: repository.to_string(),
            image_ids: image_ids.iter().map(|id| id.to_string()).collect(),
        });

        let result = if image_ids.is_empty() {
            // Mirrors the real API, which rejects an empty imageIds list
            Err(RemoteError::new(
                "BatchDeleteImage",
                Some("InvalidParameterException"),
                "imageIds must contain at least 1 item",
            ))
        } else {
            self.delete_results
                .get(repository.as_str())
                .cloned()
                .unwrap_or_else(|| Ok(Vec::new()))
        };
        ready(result)
    }
}

/// Build a stack member summary
pub fn resource(physical_id: &str, resource_type: &str) -> StackResourceSummary {
    StackResourceSummary::new(physical_id, resource_type)
}

/// Build an ECR repository stack member
pub fn ecr_repository(physical_id: &str) -> StackResourceSummary {
    resource(physical_id, DEFAULT_REPOSITORY_TYPE)
}

/// Build a list of content identifiers
pub fn digests(ids: &[&str]) -> Vec<ContentIdentifier> {
    ids.iter().map(|id| ContentIdentifier::new(*id)).collect()
}
