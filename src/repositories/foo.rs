use crate::database::DB;

/// Data access for the foo domain. Services reach storage only through it.
pub trait FooRepository: Send + Sync {}

pub struct DbFooRepository {
    #[allow(dead_code)]
    db: DB,
}

impl DbFooRepository {
    pub fn new(db: DB) -> Self {
        Self { db }
    }
}

impl FooRepository for DbFooRepository {}
