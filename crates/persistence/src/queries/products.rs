// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Product queries.
//!
//! A natural key is either a non-blank EAN code or, for products without
//! one, the name. Name keys only match products whose EAN code is blank,
//! so a product with an EAN never collides with one keyed by name.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use snowflow_domain::{NaturalKey, Product};

use crate::data_models::ProductRow;
use crate::diesel_schema::products;
use crate::error::PersistenceError;

backend_fn! {
/// Retrieves a product by id.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row cannot be decoded.
pub fn get_product(conn: &mut _, product_id: i64) -> Result<Option<Product>, PersistenceError> {
    let row: Option<ProductRow> = products::table
        .filter(products::product_id.eq(product_id))
        .select(ProductRow::as_select())
        .first(conn)
        .optional()?;

    row.map(ProductRow::into_domain).transpose()
}
}

backend_fn! {
/// Finds a public product other than `exclude_id` with the given key.
///
/// Pass `0` as `exclude_id` when no product should be excluded.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_public_match(
    conn: &mut _,
    key: &NaturalKey,
    exclude_id: i64,
) -> Result<Option<i64>, PersistenceError> {
    let found: Option<i64> = match key {
        NaturalKey::EanCode(ean) => products::table
            .select(products::product_id)
            .filter(products::is_public.eq(1))
            .filter(products::ean_code.eq(ean))
            .filter(products::product_id.ne(exclude_id))
            .order(products::product_id.asc())
            .first::<i64>(conn)
            .optional()?,
        NaturalKey::Name(name) => products::table
            .select(products::product_id)
            .filter(products::is_public.eq(1))
            .filter(products::ean_code.eq(""))
            .filter(products::name.eq(name))
            .filter(products::product_id.ne(exclude_id))
            .order(products::product_id.asc())
            .first::<i64>(conn)
            .optional()?,
    };

    debug!(%key, exclude_id, ?found, "Public natural-key lookup");
    Ok(found)
}
}

backend_fn! {
/// Finds a private product of `team` other than `exclude_id` with the
/// given key.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_team_match(
    conn: &mut _,
    key: &NaturalKey,
    team: i64,
    exclude_id: i64,
) -> Result<Option<i64>, PersistenceError> {
    let found: Option<i64> = match key {
        NaturalKey::EanCode(ean) => products::table
            .select(products::product_id)
            .filter(products::is_public.eq(0))
            .filter(products::testing_team.eq(team))
            .filter(products::ean_code.eq(ean))
            .filter(products::product_id.ne(exclude_id))
            .order(products::product_id.asc())
            .first::<i64>(conn)
            .optional()?,
        NaturalKey::Name(name) => products::table
            .select(products::product_id)
            .filter(products::is_public.eq(0))
            .filter(products::testing_team.eq(team))
            .filter(products::ean_code.eq(""))
            .filter(products::name.eq(name))
            .filter(products::product_id.ne(exclude_id))
            .order(products::product_id.asc())
            .first::<i64>(conn)
            .optional()?,
    };

    debug!(%key, team, exclude_id, ?found, "Team natural-key lookup");
    Ok(found)
}
}
