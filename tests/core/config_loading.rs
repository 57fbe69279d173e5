//! Directory configuration from TOML files

use crate::common::*;
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn directory_from_config_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("typedarray.toml");
    std::fs::write(&path, "marker = \"ContainerOf\"\ntype_tag_field = \"kind\"\n").unwrap();

    let config = TypedArrayConfig::from_file(&path).unwrap();
    let dir = TypeDirectory::with_config(config).unwrap();
    dir.register::<Widget>("Widget").unwrap();
    let dir = Arc::new(dir);

    let array = TypedArray::<ContainerOfWidget>::new(&dir).unwrap();
    assert_eq!(array.target().name(), "Widget");
    assert_eq!(dir.config().type_tag_field, "kind");
}

#[test]
fn default_toml_round_trips_through_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("typedarray.toml");
    std::fs::write(&path, TypedArrayConfig::default_toml()).unwrap();
    assert_eq!(
        TypedArrayConfig::from_file(&path).unwrap(),
        TypedArrayConfig::default()
    );
}

#[test]
fn invalid_config_file_is_configuration_error() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("typedarray.toml");
    std::fs::write(&path, "type_tag_field = \"\"\n").unwrap();
    let err = TypedArrayConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(err.is_configuration_error());
}

#[test]
fn uncached_directory_still_resolves() {
    let dir = TypeDirectory::with_config(TypedArrayConfig {
        cache_resolutions: false,
        ..TypedArrayConfig::default()
    })
    .unwrap();
    dir.register::<Widget>("Widget").unwrap();
    let dir = Arc::new(dir);
    for _ in 0..3 {
        TypedArray::<ArrayOfWidget>::new(&dir).unwrap();
    }
    assert_eq!(dir.cached_resolutions(), 0);
}
