//! Integration tests: the shipped catalog files load and validate.

use std::path::PathBuf;

use realms::catalog::Catalogs;
use realms::error::CatalogError;
use realms::player::ClassKind;

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

#[test]
fn test_shipped_catalogs_load_and_validate() {
    let catalogs = Catalogs::load(&data_dir()).expect("shipped data must be valid");
    assert!(!catalogs.monsters.is_empty());
    assert!(!catalogs.potions.is_empty());
    assert!(!catalogs.opening_lines.is_empty());
    for class in ClassKind::ALL {
        assert!(
            !catalogs.skills_for(class).is_empty(),
            "{} has no skills",
            class.name()
        );
    }
}

#[test]
fn test_shipped_skills_have_sane_ranges() {
    let catalogs = Catalogs::load(&data_dir()).expect("shipped data must be valid");
    for class in ClassKind::ALL {
        for skill in catalogs.skills_for(class) {
            assert!((0.0..=1.0).contains(&skill.accuracy), "{}", skill.name);
            assert!(skill.bonus_damage >= 0);
            assert!(skill.mp_cost >= 0);
        }
    }
    // Only Mage skills carry MP costs; the gate only applies to them.
    assert!(catalogs
        .skills_for(ClassKind::Mage)
        .iter()
        .all(|skill| skill.mp_cost > 0));
}

#[test]
fn test_missing_directory_is_a_configuration_error() {
    let error = Catalogs::load(&data_dir().join("nope")).unwrap_err();
    assert!(matches!(error, CatalogError::Read { .. }));
}

#[test]
fn test_slime_template_exists_for_encounter_weighting() {
    let catalogs = Catalogs::load(&data_dir()).expect("shipped data must be valid");
    assert!(catalogs
        .monsters
        .iter()
        .any(|monster| monster.name.to_lowercase().contains("slime")));
}
