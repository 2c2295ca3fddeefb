// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use snowflow_domain::{ProductPatch, Version};

use crate::backend::PersistenceBackend;
use crate::data_models::{NewProduct, NewProductRow, ProductChangeset, encode_version};
use crate::diesel_schema::products;
use crate::error::PersistenceError;

backend_fn! {
/// Writes the set fields of `patch` to a product and stamps `new_version`.
///
/// The row is only written while its version still equals
/// `expected_version`. Returns the number of rows written.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_product(
    conn: &mut _,
    product_id: i64,
    expected_version: Version,
    patch: &ProductPatch,
    new_version: Version,
) -> Result<usize, PersistenceError> {
    let changeset: ProductChangeset<'_> = ProductChangeset::new(patch, new_version)?;
    let expected: String = encode_version(expected_version)?;

    let affected: usize = diesel::update(
        products::table
            .filter(products::product_id.eq(product_id))
            .filter(products::version.eq(&expected)),
    )
    .set(changeset)
    .execute(conn)?;

    debug!(product_id, %new_version, affected, "Updated product");
    Ok(affected)
}
}

backend_fn! {
/// Inserts a product and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_product(
    conn: &mut _,
    product: &NewProduct,
    version: Version,
) -> Result<i64, PersistenceError> {
    let row: NewProductRow<'_> = NewProductRow::new(product, version)?;
    diesel::insert_into(products::table).values(row).execute(conn)?;
    conn.get_last_insert_rowid()
}
}

backend_fn! {
/// Deletes a product if its version still equals `expected_version`.
///
/// Returns the number of rows deleted.
///
/// # Errors
///
/// Returns an error if the delete fails, including when rankings still
/// reference the product.
pub fn delete_product(
    conn: &mut _,
    product_id: i64,
    expected_version: Version,
) -> Result<usize, PersistenceError> {
    let expected: String = encode_version(expected_version)?;
    let deleted: usize = diesel::delete(
        products::table
            .filter(products::product_id.eq(product_id))
            .filter(products::version.eq(&expected)),
    )
    .execute(conn)?;

    debug!(product_id, deleted, "Deleted product");
    Ok(deleted)
}
}
