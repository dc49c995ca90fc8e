pub mod foo;
