use std::io::Write;
use std::path::Path;

use boltz_host::{resolve_library_path, AcceleratedSampler};

#[test]
fn unset_variable_is_a_backend_error() {
    let var = "BOLTZ_TEST_SAMPLER_UNSET_VARIABLE";
    std::env::remove_var(var);
    let err = resolve_library_path(None, var).expect_err("nothing configured");
    assert_eq!(err.info().code, "boltz_host.library_unset");
    assert_eq!(err.info().context.get("env_var").map(String::as_str), Some(var));
    assert!(err.info().hint.is_some());
}

#[test]
fn variable_pointing_nowhere_is_a_backend_error() {
    let var = "BOLTZ_TEST_SAMPLER_MISSING_FILE";
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("libabsent.so");
    std::env::set_var(var, &missing);
    let err = AcceleratedSampler::locate(None, var).expect_err("file is absent");
    std::env::remove_var(var);
    assert_eq!(err.info().code, "boltz_host.library_missing");
}

#[test]
fn explicit_path_takes_precedence() {
    let var = "BOLTZ_TEST_SAMPLER_IGNORED";
    std::env::set_var(var, "/definitely/not/here.so");
    let file = tempfile::NamedTempFile::new().unwrap();
    let resolved = resolve_library_path(Some(file.path()), var).unwrap();
    std::env::remove_var(var);
    assert_eq!(resolved, file.path());

    let err = resolve_library_path(Some(Path::new("/definitely/not/here.so")), var).unwrap_err();
    assert_eq!(err.info().code, "boltz_host.library_missing");
}

#[test]
fn non_library_files_fail_to_load() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"not a shared object").unwrap();
    let err = AcceleratedSampler::open(file.path()).expect_err("garbage is not loadable");
    assert_eq!(err.info().code, "boltz_host.library_load");
    assert!(err.info().context.contains_key("path"));
}
