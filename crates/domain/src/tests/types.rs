// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Cloud, DomainError, NaturalKey, ProductType, SnowType, TeamRole, TrackType, Wind,
};
use std::str::FromStr;

#[test]
fn test_codes_parse_from_their_stored_form() {
    assert_eq!(SnowType::from_str("FS").unwrap(), SnowType::Fs);
    assert_eq!(Wind::from_str("ST").unwrap(), Wind::Strong);
    assert_eq!(Cloud::from_str("3").unwrap(), Cloud::Level3);
    assert_eq!(TrackType::from_str("D2").unwrap(), TrackType::D2);
    assert_eq!(ProductType::from_str("gel").unwrap(), ProductType::Gel);
}

#[test]
fn test_every_code_survives_display_and_parse() {
    for snow_type in SnowType::ALL {
        assert_eq!(&SnowType::from_str(snow_type.as_str()).unwrap(), snow_type);
    }
    for wind in Wind::ALL {
        assert_eq!(&Wind::from_str(&wind.to_string()).unwrap(), wind);
    }
}

#[test]
fn test_unknown_code_names_the_kind() {
    match SnowType::from_str("A9").unwrap_err() {
        DomainError::InvalidCode { kind, value } => {
            assert_eq!(kind, "snow_type");
            assert_eq!(value, "A9");
        }
        other => panic!("Expected InvalidCode, got: {other:?}"),
    }
}

#[test]
fn test_codes_are_case_sensitive() {
    assert!(SnowType::from_str("fs").is_err());
}

#[test]
fn test_codes_serialize_as_strings() {
    let json: String = serde_json::to_string(&Cloud::Level2).unwrap();
    assert_eq!(json, "\"2\"");
    let wind: Wind = serde_json::from_str("\"M\"").unwrap();
    assert_eq!(wind, Wind::Moderate);
}

#[test]
fn test_team_role_codes() {
    assert_eq!(TeamRole::from_code(1).unwrap(), TeamRole::Official);
    assert_eq!(TeamRole::from_code(2).unwrap(), TeamRole::Researcher);
    assert_eq!(
        TeamRole::from_code(7).unwrap_err(),
        DomainError::InvalidTeamRole(7)
    );
}

#[test]
fn test_natural_key_prefers_ean_code() {
    assert_eq!(
        NaturalKey::derive("123", "Blue Glide"),
        NaturalKey::EanCode(String::from("123"))
    );
}

#[test]
fn test_natural_key_falls_back_to_name_when_ean_blank() {
    assert_eq!(
        NaturalKey::derive("  ", "Blue Glide"),
        NaturalKey::Name(String::from("Blue Glide"))
    );
}

#[test]
fn test_natural_key_ignores_padding_around_ean() {
    assert_eq!(
        NaturalKey::derive(" 123 ", "Blue Glide"),
        NaturalKey::EanCode(String::from("123"))
    );
}
