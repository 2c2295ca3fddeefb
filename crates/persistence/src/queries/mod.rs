// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! - `products`: product lookup and natural-key collision lookups
//! - `test_records`: tests and their conditions rows
//! - `rankings`: test rankings
//!
//! Every function is generated in `_sqlite` and `_mysql` forms by
//! `backend_fn!`. Lookups that may legitimately miss return `Option`.

pub mod products;
pub mod rankings;
pub mod test_records;

pub use products::{
    find_public_match_mysql, find_public_match_sqlite, find_team_match_mysql,
    find_team_match_sqlite, get_product_mysql, get_product_sqlite,
};
pub use rankings::{
    count_shared_rankings_mysql, count_shared_rankings_sqlite, get_ranking_mysql,
    get_ranking_sqlite, list_rankings_for_product_mysql, list_rankings_for_product_sqlite,
    list_rankings_for_test_mysql, list_rankings_for_test_sqlite,
};
pub use test_records::{
    get_air_conditions_mysql, get_air_conditions_sqlite, get_snow_conditions_mysql,
    get_snow_conditions_sqlite, get_test_mysql, get_test_sqlite, get_track_conditions_mysql,
    get_track_conditions_sqlite,
};
