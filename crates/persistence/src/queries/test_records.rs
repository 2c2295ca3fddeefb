// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};

use snowflow_domain::{AirConditions, SnowConditions, Test, TrackConditions};

use crate::data_models::{AirConditionsRow, SnowConditionsRow, TestRow, TrackConditionsRow};
use crate::diesel_schema::{air_conditions, snow_conditions, tests, track_conditions};
use crate::error::PersistenceError;

backend_fn! {
/// Retrieves a test by id.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row cannot be decoded.
pub fn get_test(conn: &mut _, test_id: i64) -> Result<Option<Test>, PersistenceError> {
    let row: Option<TestRow> = tests::table
        .filter(tests::test_id.eq(test_id))
        .select(TestRow::as_select())
        .first(conn)
        .optional()?;

    row.map(TestRow::into_domain).transpose()
}
}

backend_fn! {
/// Retrieves an air conditions row by id.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row cannot be decoded.
pub fn get_air_conditions(
    conn: &mut _,
    air_conditions_id: i64,
) -> Result<Option<AirConditions>, PersistenceError> {
    let row: Option<AirConditionsRow> = air_conditions::table
        .filter(air_conditions::air_conditions_id.eq(air_conditions_id))
        .select(AirConditionsRow::as_select())
        .first(conn)
        .optional()?;

    row.map(AirConditionsRow::into_domain).transpose()
}
}

backend_fn! {
/// Retrieves a snow conditions row by id.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row cannot be decoded.
pub fn get_snow_conditions(
    conn: &mut _,
    snow_conditions_id: i64,
) -> Result<Option<SnowConditions>, PersistenceError> {
    let row: Option<SnowConditionsRow> = snow_conditions::table
        .filter(snow_conditions::snow_conditions_id.eq(snow_conditions_id))
        .select(SnowConditionsRow::as_select())
        .first(conn)
        .optional()?;

    row.map(SnowConditionsRow::into_domain).transpose()
}
}

backend_fn! {
/// Retrieves a track conditions row by id.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row cannot be decoded.
pub fn get_track_conditions(
    conn: &mut _,
    track_conditions_id: i64,
) -> Result<Option<TrackConditions>, PersistenceError> {
    let row: Option<TrackConditionsRow> = track_conditions::table
        .filter(track_conditions::track_conditions_id.eq(track_conditions_id))
        .select(TrackConditionsRow::as_select())
        .first(conn)
        .optional()?;

    row.map(TrackConditionsRow::into_domain).transpose()
}
}
