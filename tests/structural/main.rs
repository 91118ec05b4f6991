//! Structural schema tests
//!
//! Every test here runs against a real PostgreSQL container provisioned by
//! the harness: provision -> stability gate -> migrate to head -> introspect.
//! Tests that overlap in time share one database through `SharedTestDb`.
//!
//! Requires Docker. Set `SKIP_DOCKER_TESTS=1` to skip the whole suite; the
//! suite also skips itself when no Docker daemon is reachable.

mod harness;

mod attribute_tables;
mod category;
mod join_tables;
mod lifecycle;
mod product;
mod product_image;
mod product_line;
mod seasonal_events;
mod store;
