// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Conditions mutations.
//!
//! Conditions rows carry no version. Updates address the row by id and
//! report the number of rows matched; zero means the row is gone.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use snowflow_domain::{AirConditionsPatch, SnowConditionsPatch, TrackConditionsPatch};

use crate::backend::PersistenceBackend;
use crate::data_models::{
    AirConditionsChangeset, NewAirConditions, NewAirConditionsRow, NewSnowConditions,
    NewSnowConditionsRow, NewTrackConditions, NewTrackConditionsRow, SnowConditionsChangeset,
    TrackConditionsChangeset,
};
use crate::diesel_schema::{air_conditions, snow_conditions, track_conditions};
use crate::error::PersistenceError;

backend_fn! {
/// Writes the set fields of `patch` to an air conditions row.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_air_conditions(
    conn: &mut _,
    air_conditions_id: i64,
    patch: &AirConditionsPatch,
) -> Result<usize, PersistenceError> {
    let changeset: AirConditionsChangeset = AirConditionsChangeset::from(patch);
    let affected: usize = diesel::update(
        air_conditions::table.filter(air_conditions::air_conditions_id.eq(air_conditions_id)),
    )
    .set(changeset)
    .execute(conn)?;

    debug!(air_conditions_id, affected, "Updated air conditions");
    Ok(affected)
}
}

backend_fn! {
/// Writes the set fields of `patch` to a snow conditions row.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_snow_conditions(
    conn: &mut _,
    snow_conditions_id: i64,
    patch: &SnowConditionsPatch,
) -> Result<usize, PersistenceError> {
    let changeset: SnowConditionsChangeset = SnowConditionsChangeset::from(patch);
    let affected: usize = diesel::update(
        snow_conditions::table.filter(snow_conditions::snow_conditions_id.eq(snow_conditions_id)),
    )
    .set(changeset)
    .execute(conn)?;

    debug!(snow_conditions_id, affected, "Updated snow conditions");
    Ok(affected)
}
}

backend_fn! {
/// Writes the set fields of `patch` to a track conditions row.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_track_conditions(
    conn: &mut _,
    track_conditions_id: i64,
    patch: &TrackConditionsPatch,
) -> Result<usize, PersistenceError> {
    let changeset: TrackConditionsChangeset = TrackConditionsChangeset::from(patch);
    let affected: usize = diesel::update(
        track_conditions::table
            .filter(track_conditions::track_conditions_id.eq(track_conditions_id)),
    )
    .set(changeset)
    .execute(conn)?;

    debug!(track_conditions_id, affected, "Updated track conditions");
    Ok(affected)
}
}

backend_fn! {
/// Inserts an air conditions row and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_air_conditions(conn: &mut _, air: &NewAirConditions) -> Result<i64, PersistenceError> {
    diesel::insert_into(air_conditions::table)
        .values(NewAirConditionsRow::from(air))
        .execute(conn)?;
    conn.get_last_insert_rowid()
}
}

backend_fn! {
/// Inserts a snow conditions row and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_snow_conditions(
    conn: &mut _,
    snow: &NewSnowConditions,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(snow_conditions::table)
        .values(NewSnowConditionsRow::from(snow))
        .execute(conn)?;
    conn.get_last_insert_rowid()
}
}

backend_fn! {
/// Inserts a track conditions row and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_track_conditions(
    conn: &mut _,
    track: &NewTrackConditions,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(track_conditions::table)
        .values(NewTrackConditionsRow::from(track))
        .execute(conn)?;
    conn.get_last_insert_rowid()
}
}
