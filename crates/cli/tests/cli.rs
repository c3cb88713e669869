use assert_cmd::Command;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("bookshelf-cli").unwrap();
    cmd.env(
        "BOOKSHELF_CONFIG_DIR",
        std::env::temp_dir().join("bookshelf-cli-no-config"),
    )
    .env_remove("BOOKSHELF_ENV")
    .env_remove("BOOKSHELF_DATABASE__STORE");
    cmd
}

#[test]
fn config_prints_layered_settings() {
    let output = cli()
        .arg("config")
        .env("BOOKSHELF_ENV", "staging")
        .env("BOOKSHELF_SERVER__PORT", "9191")
        .output()
        .unwrap();

    assert!(output.status.success());
    let settings: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(settings["environment"], "staging");
    assert_eq!(settings["server"]["port"], 9191);
    assert_eq!(settings["database"]["store"], "postgres");
}

#[test]
fn unknown_environment_fails() {
    cli()
        .arg("config")
        .env("BOOKSHELF_ENV", "qa")
        .assert()
        .failure();
}

#[test]
fn init_schema_refuses_memory_store() {
    let output = cli()
        .arg("init-schema")
        .env("BOOKSHELF_DATABASE__STORE", "memory")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("init-schema requires"));
}
