use std::sync::Arc;

pub mod common;
pub mod foo;

use common::CommonHandler;
use foo::FooHandler;

/// Every domain handler, grouped so the router has one dependency.
/// Built once by the composition root and never mutated afterwards.
#[derive(Clone)]
pub struct Handlers {
    pub common: Arc<dyn CommonHandler>,
    pub foo: Arc<dyn FooHandler>,
}

impl Handlers {
    pub fn new(common: Arc<dyn CommonHandler>, foo: Arc<dyn FooHandler>) -> Self {
        Self { common, foo }
    }
}
