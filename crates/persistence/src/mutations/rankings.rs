// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use snowflow::RankingTarget;
use snowflow_domain::{RankingPatch, Version};

use crate::data_models::{NewRankingRow, RankingChangeset, encode_bool, encode_version};
use crate::diesel_schema::test_ranks;
use crate::error::PersistenceError;

backend_fn! {
/// Writes the set fields of `patch` to one ranking and stamps `new_version`.
///
/// The row is only written while its version still equals the version
/// recorded in `target`. Returns the number of rows written.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_ranking(
    conn: &mut _,
    test_id: i64,
    target: RankingTarget,
    patch: &RankingPatch,
    new_version: Version,
) -> Result<usize, PersistenceError> {
    let changeset: RankingChangeset = RankingChangeset::new(patch, new_version)?;
    let expected: String = encode_version(target.expected_version)?;

    let affected: usize = diesel::update(
        test_ranks::table
            .filter(test_ranks::test_id.eq(test_id))
            .filter(test_ranks::product_id.eq(target.product_id))
            .filter(test_ranks::version.eq(&expected)),
    )
    .set(changeset)
    .execute(conn)?;

    debug!(
        test_id,
        product_id = target.product_id,
        %new_version,
        affected,
        "Updated ranking"
    );
    Ok(affected)
}
}

backend_fn! {
/// Inserts a ranking.
///
/// # Errors
///
/// Returns an error if the insert fails, including when the pair is
/// already ranked.
pub fn insert_ranking(
    conn: &mut _,
    test_id: i64,
    product_id: i64,
    rank: i32,
    distance_behind: i32,
    is_rank_public: bool,
    version: Version,
) -> Result<(), PersistenceError> {
    let row: NewRankingRow = NewRankingRow {
        test_id,
        product_id,
        rank,
        distance_behind,
        is_rank_public: encode_bool(is_rank_public),
        version: encode_version(version)?,
    };

    diesel::insert_into(test_ranks::table).values(row).execute(conn)?;
    Ok(())
}
}

backend_fn! {
/// Moves every ranking of `from_product_id` to `to_product_id`.
///
/// Returns the number of rankings moved.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn repoint_rankings(
    conn: &mut _,
    from_product_id: i64,
    to_product_id: i64,
) -> Result<usize, PersistenceError> {
    let moved: usize =
        diesel::update(test_ranks::table.filter(test_ranks::product_id.eq(from_product_id)))
            .set(test_ranks::product_id.eq(to_product_id))
            .execute(conn)?;

    debug!(from_product_id, to_product_id, moved, "Re-pointed rankings");
    Ok(moved)
}
}
