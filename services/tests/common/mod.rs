//! Shared test utilities for integration tests.

use axum_test::TestServer;
use debug_api_services::{
    config::Config,
    routes,
    things::{MemoryThingStorage, NewThing, Thing, ThingStorage},
};

/// Test server over an empty in-memory store, returned with a handle to the store.
pub async fn create_test_server(config: Config) -> (TestServer, MemoryThingStorage) {
    let storage = MemoryThingStorage::new();
    let app = routes(storage.clone(), config).await;
    (TestServer::new(app).unwrap(), storage)
}

/// Adds a thing straight through the storage.
pub async fn seed_thing(storage: &MemoryThingStorage, thing: NewThing) -> Thing {
    storage.add_thing(thing).await.unwrap()
}
