// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.
//!
//! Every other persistence test also exercises connection setup and
//! migrations through `Persistence::new_in_memory()`.

use crate::Persistence;
use crate::error::PersistenceError;

use super::{create_test_new_product, create_test_new_test};

#[test]
fn test_persistence_initialization() {
    let result: Result<Persistence, PersistenceError> = Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_foreign_key_enforcement_is_verified() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1: Persistence = Persistence::new_in_memory().unwrap();
    let mut db2: Persistence = Persistence::new_in_memory().unwrap();

    let product = db1
        .create_product(&create_test_new_product("Blue Glide", "", false))
        .unwrap();

    assert!(db1.get_product(product.product_id).unwrap().is_some());
    assert!(
        db2.get_product(product.product_id).unwrap().is_none(),
        "db2 must not see products created in db1"
    );
}

#[test]
fn test_migrations_applied_on_initialization() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    assert!(persistence.get_test(1).unwrap().is_none());
    assert!(persistence.list_rankings_for_product(1).unwrap().is_empty());
    assert!(persistence.get_conditions(1).unwrap().is_none());
}

#[test]
fn test_file_database_round_trips_records() {
    let path = std::env::temp_dir().join(format!(
        "snowflow_file_test_{}.db",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    let test_id: i64 = {
        let mut persistence: Persistence = Persistence::new_with_file(&path).unwrap();
        persistence
            .create_test(&create_test_new_test(1, false))
            .unwrap()
            .test_id
    };

    let mut reopened: Persistence = Persistence::new_with_file(&path).unwrap();
    let test = reopened.get_test(test_id).unwrap().unwrap();
    assert_eq!(test.location, "Lillehammer");

    drop(reopened);
    let _ = std::fs::remove_file(&path);
}
