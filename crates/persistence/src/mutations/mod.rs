// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! - `conditions`, `test_records`, `rankings`, `products`: single-statement
//!   writes, generated per backend by `backend_fn!`
//! - `transactions`: multi-statement operations, generic over
//!   `RecordStore`, each run in one transaction

pub mod conditions;
pub mod products;
pub mod rankings;
pub mod test_records;
pub mod transactions;

pub use conditions::{
    insert_air_conditions_mysql, insert_air_conditions_sqlite, insert_snow_conditions_mysql,
    insert_snow_conditions_sqlite, insert_track_conditions_mysql, insert_track_conditions_sqlite,
    update_air_conditions_mysql, update_air_conditions_sqlite, update_snow_conditions_mysql,
    update_snow_conditions_sqlite, update_track_conditions_mysql, update_track_conditions_sqlite,
};
pub use products::{
    delete_product_mysql, delete_product_sqlite, insert_product_mysql, insert_product_sqlite,
    update_product_mysql, update_product_sqlite,
};
pub use rankings::{
    insert_ranking_mysql, insert_ranking_sqlite, repoint_rankings_mysql, repoint_rankings_sqlite,
    update_ranking_mysql, update_ranking_sqlite,
};
pub use test_records::{insert_test_mysql, insert_test_sqlite, update_test_mysql, update_test_sqlite};
pub use transactions::{
    NewRanking, ProductPatchOutcome, add_ranking, apply_product_plan, apply_test_plan,
    create_product, create_test, load_conditions,
};
