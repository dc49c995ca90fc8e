use std::sync::Arc;

use crate::services::foo::FooService;

/// HTTP operations of the foo domain. None are routed yet.
pub trait FooHandler: Send + Sync {}

pub struct FooHandlerImpl {
    #[allow(dead_code)]
    service: Arc<dyn FooService>,
}

impl FooHandlerImpl {
    pub fn new(service: Arc<dyn FooService>) -> Self {
        Self { service }
    }
}

impl FooHandler for FooHandlerImpl {}
