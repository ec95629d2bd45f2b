// Routing tests: parsed arguments through configuration to files on disk

use std::fs;

use clap::Parser;
use crudkit_cli::{Cli, CliError, CommandRouter, ConfigLoader};
use crudkit_generation::GenerationError;
use tempfile::TempDir;

fn loader(temp: &TempDir, prefix: &str) -> ConfigLoader {
    ConfigLoader::new()
        .with_user_path(None)
        .with_project_path(temp.path().join("crudkit.toml"))
        .with_env_prefix(prefix)
}

fn generate(temp: &TempDir, extra: &[&str]) -> Cli {
    let output = temp.path().join("app");
    let mut args = vec![
        "crudkit".to_string(),
        "generate".to_string(),
        "Post".to_string(),
        "--field".to_string(),
        "title:string".to_string(),
        "--field".to_string(),
        "published:boolean".to_string(),
        "--output".to_string(),
        output.to_string_lossy().into_owned(),
        "--quiet".to_string(),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn test_generate_writes_into_output_dir() {
    let temp = TempDir::new().unwrap();
    CommandRouter::execute(&generate(&temp, &[]), loader(&temp, "CRUDKIT_ROUTE_WRITE")).unwrap();

    let form = fs::read_to_string(temp.path().join("app/views/posts/create.blade.php")).unwrap();
    assert!(form.contains("name=\"title\""));
    let routes = fs::read_to_string(temp.path().join("app/routes/web.php")).unwrap();
    assert!(routes.contains("Route::resource('posts', PostController::class);"));
}

#[test]
fn test_second_run_is_blocked_until_forced() {
    let temp = TempDir::new().unwrap();
    CommandRouter::execute(&generate(&temp, &[]), loader(&temp, "CRUDKIT_ROUTE_BLOCK")).unwrap();

    let err = CommandRouter::execute(&generate(&temp, &[]), loader(&temp, "CRUDKIT_ROUTE_BLOCK"))
        .unwrap_err();
    assert!(matches!(
        err,
        CliError::Generation(GenerationError::DestinationBlocked { ref paths }) if paths.len() == 8
    ));
    assert!(err
        .user_message()
        .contains("views/posts/create.blade.php already exists"));

    CommandRouter::execute(
        &generate(&temp, &["--force"]),
        loader(&temp, "CRUDKIT_ROUTE_BLOCK"),
    )
    .unwrap();
}

#[test]
fn test_dry_run_leaves_disk_untouched() {
    let temp = TempDir::new().unwrap();
    CommandRouter::execute(
        &generate(&temp, &["--dry-run", "--json"]),
        loader(&temp, "CRUDKIT_ROUTE_DRY"),
    )
    .unwrap();
    assert!(!temp.path().join("app").exists());
}

#[test]
fn test_project_file_selects_theme() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("crudkit.toml"), "theme = \"vue\"\n").unwrap();
    CommandRouter::execute(&generate(&temp, &[]), loader(&temp, "CRUDKIT_ROUTE_THEME")).unwrap();

    assert!(temp
        .path()
        .join("app/js/components/posts/PostIndex.vue")
        .is_file());
    assert!(!temp.path().join("app/views").exists());
    let router = fs::read_to_string(temp.path().join("app/js/router.js")).unwrap();
    assert_eq!(router.matches("// crudkit:routes").count(), 1);
}

#[test]
fn test_invalid_config_fails_before_generating() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("crudkit.toml"), "log_level = \"chatty\"\n").unwrap();
    let err = CommandRouter::execute(&generate(&temp, &[]), loader(&temp, "CRUDKIT_ROUTE_BAD"))
        .unwrap_err();

    assert!(matches!(err, CliError::Config(_)));
    assert!(!temp.path().join("app").exists());
}
