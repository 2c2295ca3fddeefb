// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use snowflow_domain::{TestFieldsPatch, Version};

use crate::backend::PersistenceBackend;
use crate::data_models::{
    NewTest, NewTestRow, TestChangeset, encode_bool, encode_date, encode_version,
};
use crate::diesel_schema::tests;
use crate::error::PersistenceError;

backend_fn! {
/// Writes the set fields of `patch` to a test and stamps `new_version`.
///
/// The row is only written while its version still equals
/// `expected_version`. Returns the number of rows written.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_test(
    conn: &mut _,
    test_id: i64,
    expected_version: Version,
    patch: &TestFieldsPatch,
    new_version: Version,
) -> Result<usize, PersistenceError> {
    let changeset: TestChangeset<'_> = TestChangeset::new(patch, new_version)?;
    let expected: String = encode_version(expected_version)?;

    let affected: usize = diesel::update(
        tests::table
            .filter(tests::test_id.eq(test_id))
            .filter(tests::version.eq(&expected)),
    )
    .set(changeset)
    .execute(conn)?;

    debug!(test_id, %expected_version, %new_version, affected, "Updated test");
    Ok(affected)
}
}

backend_fn! {
/// Inserts a test row owning the given conditions rows and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_test(
    conn: &mut _,
    test: &NewTest,
    air_conditions_id: i64,
    snow_conditions_id: i64,
    track_conditions_id: i64,
    version: Version,
) -> Result<i64, PersistenceError> {
    let row: NewTestRow<'_> = NewTestRow {
        test_date: encode_date(test.test_date)?,
        location: &test.location,
        comment: test.comment.as_deref(),
        is_public: encode_bool(test.is_public),
        testing_team: test.testing_team,
        version: encode_version(version)?,
        snow_conditions_id,
        track_conditions_id,
        air_conditions_id,
    };

    diesel::insert_into(tests::table).values(row).execute(conn)?;
    conn.get_last_insert_rowid()
}
}
