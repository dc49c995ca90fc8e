use std::sync::Arc;

use crate::{config::Config, repositories::foo::FooRepository};

/// Business operations of the foo domain.
pub trait FooService: Send + Sync {}

pub struct FooServiceImpl {
    #[allow(dead_code)]
    config: Arc<Config>,
    #[allow(dead_code)]
    foo_repo: Arc<dyn FooRepository>,
}

impl FooServiceImpl {
    pub fn new(config: Arc<Config>, foo_repo: Arc<dyn FooRepository>) -> Self {
        Self { config, foo_repo }
    }
}

impl FooService for FooServiceImpl {}
