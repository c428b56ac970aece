use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn tasklist_cmd(store: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tasklist").expect("binary should build");
    cmd.arg("--store-path").arg(store.path()).write_stdin("");
    cmd
}

#[test]
fn test_add_blank_exits_with_error() -> Result<(), Box<dyn std::error::Error>> {
    let store = TempDir::new()?;

    tasklist_cmd(&store)
        .args(["add", "   "])
        .assert()
        .failure()
        .stderr(contains("Please enter a task!"));

    Ok(())
}

#[test]
fn test_add_then_list() -> Result<(), Box<dyn std::error::Error>> {
    let store = TempDir::new()?;

    tasklist_cmd(&store)
        .args(["add", "Buy", "milk"])
        .assert()
        .success()
        .stderr(contains("Task added successfully!"));

    tasklist_cmd(&store)
        .args(["list", "--filter", "pending"])
        .assert()
        .success()
        .stdout(contains("Buy milk"));

    Ok(())
}

#[test]
fn test_edit_blank_exits_with_error() -> Result<(), Box<dyn std::error::Error>> {
    let store = TempDir::new()?;

    // First run seeds sample task 1
    tasklist_cmd(&store)
        .args(["edit", "1", " "])
        .assert()
        .failure()
        .stderr(contains("Task cannot be empty!"));

    tasklist_cmd(&store)
        .args(["list"])
        .assert()
        .success()
        .stdout(contains("Welcome to your Todo App!"));

    Ok(())
}
