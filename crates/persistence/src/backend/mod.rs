// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Database backend-specific code.
//!
//! ## Backend Support
//!
//! - `sqlite`: `SQLite` backend (default for development and testing)
//! - `mysql`: MySQL/MariaDB backend (validated via opt-in tests)
//!
//! Backend modules hold connection setup, migrations, and the few
//! helpers Diesel DSL cannot express. Record queries and mutations live in
//! `queries/` and `mutations/` and are generated per backend by
//! `backend_fn!`.
//!
//! ## Record stores
//!
//! Multi-statement operations (patch plans, merges, creation) run inside
//! one transaction and are written once, generic over [`RecordStore`].
//! Each connection type implements the trait by forwarding to its
//! monomorphic `_sqlite` or `_mysql` functions.

pub mod mysql;
pub mod sqlite;

use diesel::{Connection, MysqlConnection, SqliteConnection};

use snowflow::RankingTarget;
use snowflow_domain::{
    AirConditions, AirConditionsPatch, NaturalKey, Product, ProductPatch, Ranking, RankingPatch,
    SnowConditions, SnowConditionsPatch, Test, TestFieldsPatch, TrackConditions,
    TrackConditionsPatch, Version,
};

use crate::data_models::{
    NewAirConditions, NewProduct, NewSnowConditions, NewTest, NewTrackConditions,
};
use crate::error::PersistenceError;
use crate::{mutations, queries};

/// Trait for backend-specific operations.
///
/// Covers what cannot be expressed in backend-agnostic Diesel DSL: the id
/// of the last insert and the foreign key check.
pub trait PersistenceBackend: Connection {
    /// Retrieves the last inserted row ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError>;

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError>;
}

impl PersistenceBackend for SqliteConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        sqlite::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_foreign_key_enforcement(self)
    }
}

impl PersistenceBackend for MysqlConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        mysql::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        mysql::verify_foreign_key_enforcement(self)
    }
}

/// Row-level reads and writes used by transactional orchestration.
///
/// Update methods return the number of rows written. A compare-and-swap
/// update that returns zero lost the race.
pub trait RecordStore: PersistenceBackend {
    /// Loads a test by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn find_test(&mut self, test_id: i64) -> Result<Option<Test>, PersistenceError>;

    /// Loads a product by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn find_product(&mut self, product_id: i64) -> Result<Option<Product>, PersistenceError>;

    /// Loads the ranking of `product_id` in `test_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn find_ranking(
        &mut self,
        test_id: i64,
        product_id: i64,
    ) -> Result<Option<Ranking>, PersistenceError>;

    /// Loads an air conditions row.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn find_air_conditions(&mut self, id: i64) -> Result<Option<AirConditions>, PersistenceError>;

    /// Loads a snow conditions row.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn find_snow_conditions(&mut self, id: i64)
    -> Result<Option<SnowConditions>, PersistenceError>;

    /// Loads a track conditions row.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn find_track_conditions(
        &mut self,
        id: i64,
    ) -> Result<Option<TrackConditions>, PersistenceError>;

    /// Finds a public product other than `exclude_id` holding `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn find_public_match(
        &mut self,
        key: &NaturalKey,
        exclude_id: i64,
    ) -> Result<Option<i64>, PersistenceError>;

    /// Finds a private product of `team`, other than `exclude_id`, holding
    /// `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn find_team_match(
        &mut self,
        key: &NaturalKey,
        team: i64,
        exclude_id: i64,
    ) -> Result<Option<i64>, PersistenceError>;

    /// Counts the tests that rank both products.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn count_shared_rankings(
        &mut self,
        product_id: i64,
        other_id: i64,
    ) -> Result<i64, PersistenceError>;

    /// Writes an air conditions patch.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    fn update_air_conditions(
        &mut self,
        id: i64,
        patch: &AirConditionsPatch,
    ) -> Result<usize, PersistenceError>;

    /// Writes a snow conditions patch.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    fn update_snow_conditions(
        &mut self,
        id: i64,
        patch: &SnowConditionsPatch,
    ) -> Result<usize, PersistenceError>;

    /// Writes a track conditions patch.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    fn update_track_conditions(
        &mut self,
        id: i64,
        patch: &TrackConditionsPatch,
    ) -> Result<usize, PersistenceError>;

    /// Writes a ranking patch if the ranking is still at
    /// `target.expected_version`.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    fn update_ranking(
        &mut self,
        test_id: i64,
        target: RankingTarget,
        patch: &RankingPatch,
        new_version: Version,
    ) -> Result<usize, PersistenceError>;

    /// Writes a test patch if the test is still at `expected_version`.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    fn update_test(
        &mut self,
        test_id: i64,
        expected_version: Version,
        patch: &TestFieldsPatch,
        new_version: Version,
    ) -> Result<usize, PersistenceError>;

    /// Writes a product patch if the product is still at
    /// `expected_version`.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    fn update_product(
        &mut self,
        product_id: i64,
        expected_version: Version,
        patch: &ProductPatch,
        new_version: Version,
    ) -> Result<usize, PersistenceError>;

    /// Moves every ranking of `from` onto `to`.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    fn repoint_rankings(&mut self, from: i64, to: i64) -> Result<usize, PersistenceError>;

    /// Deletes a product if it is still at `expected_version`.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    fn delete_product(
        &mut self,
        product_id: i64,
        expected_version: Version,
    ) -> Result<usize, PersistenceError>;

    /// Inserts an air conditions row and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    fn insert_air_conditions(&mut self, air: &NewAirConditions) -> Result<i64, PersistenceError>;

    /// Inserts a snow conditions row and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    fn insert_snow_conditions(
        &mut self,
        snow: &NewSnowConditions,
    ) -> Result<i64, PersistenceError>;

    /// Inserts a track conditions row and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    fn insert_track_conditions(
        &mut self,
        track: &NewTrackConditions,
    ) -> Result<i64, PersistenceError>;

    /// Inserts a test referencing the given (air, snow, track) rows and
    /// returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    fn insert_test(
        &mut self,
        test: &NewTest,
        conditions_ids: (i64, i64, i64),
        version: Version,
    ) -> Result<i64, PersistenceError>;

    /// Inserts a product and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    fn insert_product(
        &mut self,
        product: &NewProduct,
        version: Version,
    ) -> Result<i64, PersistenceError>;

    /// Inserts a ranking.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, including a duplicate pair.
    fn insert_ranking(&mut self, ranking: &Ranking) -> Result<(), PersistenceError>;
}

/// Implements [`RecordStore`] for a connection type by forwarding to the
/// functions `backend_fn!` generated with the given suffix.
macro_rules! impl_record_store {
    ($conn:ty, $suffix:ident) => {
        pastey::paste! {
            impl RecordStore for $conn {
                fn find_test(&mut self, test_id: i64) -> Result<Option<Test>, PersistenceError> {
                    queries::[<get_test_ $suffix>](self, test_id)
                }

                fn find_product(
                    &mut self,
                    product_id: i64,
                ) -> Result<Option<Product>, PersistenceError> {
                    queries::[<get_product_ $suffix>](self, product_id)
                }

                fn find_ranking(
                    &mut self,
                    test_id: i64,
                    product_id: i64,
                ) -> Result<Option<Ranking>, PersistenceError> {
                    queries::[<get_ranking_ $suffix>](self, test_id, product_id)
                }

                fn find_air_conditions(
                    &mut self,
                    id: i64,
                ) -> Result<Option<AirConditions>, PersistenceError> {
                    queries::[<get_air_conditions_ $suffix>](self, id)
                }

                fn find_snow_conditions(
                    &mut self,
                    id: i64,
                ) -> Result<Option<SnowConditions>, PersistenceError> {
                    queries::[<get_snow_conditions_ $suffix>](self, id)
                }

                fn find_track_conditions(
                    &mut self,
                    id: i64,
                ) -> Result<Option<TrackConditions>, PersistenceError> {
                    queries::[<get_track_conditions_ $suffix>](self, id)
                }

                fn find_public_match(
                    &mut self,
                    key: &NaturalKey,
                    exclude_id: i64,
                ) -> Result<Option<i64>, PersistenceError> {
                    queries::[<find_public_match_ $suffix>](self, key, exclude_id)
                }

                fn find_team_match(
                    &mut self,
                    key: &NaturalKey,
                    team: i64,
                    exclude_id: i64,
                ) -> Result<Option<i64>, PersistenceError> {
                    queries::[<find_team_match_ $suffix>](self, key, team, exclude_id)
                }

                fn count_shared_rankings(
                    &mut self,
                    product_id: i64,
                    other_id: i64,
                ) -> Result<i64, PersistenceError> {
                    queries::[<count_shared_rankings_ $suffix>](self, product_id, other_id)
                }

                fn update_air_conditions(
                    &mut self,
                    id: i64,
                    patch: &AirConditionsPatch,
                ) -> Result<usize, PersistenceError> {
                    mutations::[<update_air_conditions_ $suffix>](self, id, patch)
                }

                fn update_snow_conditions(
                    &mut self,
                    id: i64,
                    patch: &SnowConditionsPatch,
                ) -> Result<usize, PersistenceError> {
                    mutations::[<update_snow_conditions_ $suffix>](self, id, patch)
                }

                fn update_track_conditions(
                    &mut self,
                    id: i64,
                    patch: &TrackConditionsPatch,
                ) -> Result<usize, PersistenceError> {
                    mutations::[<update_track_conditions_ $suffix>](self, id, patch)
                }

                fn update_ranking(
                    &mut self,
                    test_id: i64,
                    target: RankingTarget,
                    patch: &RankingPatch,
                    new_version: Version,
                ) -> Result<usize, PersistenceError> {
                    mutations::[<update_ranking_ $suffix>](self, test_id, target, patch, new_version)
                }

                fn update_test(
                    &mut self,
                    test_id: i64,
                    expected_version: Version,
                    patch: &TestFieldsPatch,
                    new_version: Version,
                ) -> Result<usize, PersistenceError> {
                    mutations::[<update_test_ $suffix>](
                        self,
                        test_id,
                        expected_version,
                        patch,
                        new_version,
                    )
                }

                fn update_product(
                    &mut self,
                    product_id: i64,
                    expected_version: Version,
                    patch: &ProductPatch,
                    new_version: Version,
                ) -> Result<usize, PersistenceError> {
                    mutations::[<update_product_ $suffix>](
                        self,
                        product_id,
                        expected_version,
                        patch,
                        new_version,
                    )
                }

                fn repoint_rankings(&mut self, from: i64, to: i64) -> Result<usize, PersistenceError> {
                    mutations::[<repoint_rankings_ $suffix>](self, from, to)
                }

                fn delete_product(
                    &mut self,
                    product_id: i64,
                    expected_version: Version,
                ) -> Result<usize, PersistenceError> {
                    mutations::[<delete_product_ $suffix>](self, product_id, expected_version)
                }

                fn insert_air_conditions(
                    &mut self,
                    air: &NewAirConditions,
                ) -> Result<i64, PersistenceError> {
                    mutations::[<insert_air_conditions_ $suffix>](self, air)
                }

                fn insert_snow_conditions(
                    &mut self,
                    snow: &NewSnowConditions,
                ) -> Result<i64, PersistenceError> {
                    mutations::[<insert_snow_conditions_ $suffix>](self, snow)
                }

                fn insert_track_conditions(
                    &mut self,
                    track: &NewTrackConditions,
                ) -> Result<i64, PersistenceError> {
                    mutations::[<insert_track_conditions_ $suffix>](self, track)
                }

                fn insert_test(
                    &mut self,
                    test: &NewTest,
                    conditions_ids: (i64, i64, i64),
                    version: Version,
                ) -> Result<i64, PersistenceError> {
                    let (air_id, snow_id, track_id): (i64, i64, i64) = conditions_ids;
                    mutations::[<insert_test_ $suffix>](self, test, air_id, snow_id, track_id, version)
                }

                fn insert_product(
                    &mut self,
                    product: &NewProduct,
                    version: Version,
                ) -> Result<i64, PersistenceError> {
                    mutations::[<insert_product_ $suffix>](self, product, version)
                }

                fn insert_ranking(&mut self, ranking: &Ranking) -> Result<(), PersistenceError> {
                    mutations::[<insert_ranking_ $suffix>](
                        self,
                        ranking.test_id,
                        ranking.product_id,
                        ranking.rank,
                        ranking.distance_behind,
                        ranking.is_rank_public,
                        ranking.version,
                    )
                }
            }
        }
    };
}

impl_record_store!(SqliteConnection, sqlite);
impl_record_store!(MysqlConnection, mysql);
