// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};

use snowflow_domain::Ranking;

use crate::data_models::RankingRow;
use crate::diesel_schema::test_ranks;
use crate::error::PersistenceError;

backend_fn! {
/// Retrieves the ranking of `product_id` in `test_id`.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row cannot be decoded.
pub fn get_ranking(
    conn: &mut _,
    test_id: i64,
    product_id: i64,
) -> Result<Option<Ranking>, PersistenceError> {
    let row: Option<RankingRow> = test_ranks::table
        .filter(test_ranks::test_id.eq(test_id))
        .filter(test_ranks::product_id.eq(product_id))
        .select(RankingRow::as_select())
        .first(conn)
        .optional()?;

    row.map(RankingRow::into_domain).transpose()
}
}

backend_fn! {
/// Lists the rankings of a test, best rank first.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row cannot be decoded.
pub fn list_rankings_for_test(conn: &mut _, test_id: i64) -> Result<Vec<Ranking>, PersistenceError> {
    let rows: Vec<RankingRow> = test_ranks::table
        .filter(test_ranks::test_id.eq(test_id))
        .order((test_ranks::rank.asc(), test_ranks::product_id.asc()))
        .select(RankingRow::as_select())
        .load(conn)?;

    rows.into_iter().map(RankingRow::into_domain).collect()
}
}

backend_fn! {
/// Lists every ranking that references a product, ordered by test.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row cannot be decoded.
pub fn list_rankings_for_product(
    conn: &mut _,
    product_id: i64,
) -> Result<Vec<Ranking>, PersistenceError> {
    let rows: Vec<RankingRow> = test_ranks::table
        .filter(test_ranks::product_id.eq(product_id))
        .order(test_ranks::test_id.asc())
        .select(RankingRow::as_select())
        .load(conn)?;

    rows.into_iter().map(RankingRow::into_domain).collect()
}
}

backend_fn! {
/// Counts the tests in which both products are ranked.
///
/// Re-pointing the rankings of `product_id` to `other_id` would violate
/// the `(test_id, product_id)` key for each such test.
///
/// # Errors
///
/// Returns an error if a query fails.
pub fn count_shared_rankings(
    conn: &mut _,
    product_id: i64,
    other_id: i64,
) -> Result<i64, PersistenceError> {
    let other_tests: Vec<i64> = test_ranks::table
        .select(test_ranks::test_id)
        .filter(test_ranks::product_id.eq(other_id))
        .load(conn)?;

    if other_tests.is_empty() {
        return Ok(0);
    }

    Ok(test_ranks::table
        .filter(test_ranks::product_id.eq(product_id))
        .filter(test_ranks::test_id.eq_any(other_tests))
        .count()
        .get_result(conn)?)
}
}
