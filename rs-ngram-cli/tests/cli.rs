use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn temp_workspace() -> TempDir {
	let workspace = tempfile::tempdir().expect("create tempdir");
	fs::write(workspace.path().join("cats.txt"), "The cat sat. The cat ran.").expect("write corpus");
	fs::write(workspace.path().join("more.txt"), "The cat slept. A dog ran.").expect("write corpus");
	workspace
}

fn ngram(workspace: &Path) -> Command {
	let mut cmd = Command::cargo_bin("ngram").expect("binary exists");
	cmd.current_dir(workspace).env_remove("NGRAM_MODELS_DIR").args(["--quiet", "--path", "models"]);
	cmd
}

fn stdout_of(cmd: &mut Command) -> String {
	let output = cmd.assert().success().get_output().stdout.clone();
	String::from_utf8(output).expect("stdout is UTF-8")
}

#[test]
fn train_list_generate() {
	let workspace = temp_workspace();
	ngram(workspace.path())
		.args(["train", "--name", "cats", "--source", "cats.txt", "--n", "3"])
		.assert()
		.success();
	assert!(workspace.path().join("models").join("cats.bin").exists());

	assert_eq!(stdout_of(ngram(workspace.path()).arg("list")), "cats\n");

	let generate = |seed: &str| {
		stdout_of(ngram(workspace.path()).args([
			"generate", "--name", "cats", "--length", "2", "--start", "The Cat", "--seed", seed,
		]))
	};
	let text = generate("17");
	let tokens: Vec<&str> = text.split_whitespace().collect();
	assert_eq!(tokens.len(), 4, "output was {text:?}");
	assert_eq!(&tokens[..2], ["the", "cat"]);
	assert!(matches!(tokens[2], "sat" | "ran"), "output was {text:?}");
	assert_eq!(tokens[3], ".");
	assert_eq!(generate("17"), text);
}

#[test]
fn training_an_existing_model_fails() {
	let workspace = temp_workspace();
	let train = || {
		let mut cmd = ngram(workspace.path());
		cmd.args(["train", "--name", "cats", "--source", "cats.txt", "--n", "2"]);
		cmd
	};
	train().assert().success();
	train().assert().failure().code(4);
}

#[test]
fn missing_source_and_bad_order() {
	let workspace = temp_workspace();
	ngram(workspace.path())
		.args(["train", "--name", "cats", "--source", "nope.txt", "--n", "2"])
		.assert()
		.failure()
		.code(6);
	ngram(workspace.path())
		.args(["train", "--name", "cats", "--source", "cats.txt", "--n", "1"])
		.assert()
		.failure()
		.code(2);
	assert_eq!(stdout_of(ngram(workspace.path()).arg("list")), "");
}

#[test]
fn tune_and_info() {
	let workspace = temp_workspace();
	ngram(workspace.path())
		.args(["tune", "--name", "cats", "--source", "more.txt"])
		.assert()
		.failure()
		.code(3);

	ngram(workspace.path())
		.args(["train", "--name", "cats", "--source", "cats.txt", "--n", "2"])
		.assert()
		.success();
	ngram(workspace.path())
		.args(["tune", "--name", "cats", "--source", "more.txt", "--n", "3"])
		.assert()
		.failure()
		.code(2);
	ngram(workspace.path())
		.args(["tune", "--name", "cats", "--source", "more.txt"])
		.assert()
		.success();

	let info = stdout_of(ngram(workspace.path()).args(["info", "--name", "cats"]));
	assert!(info.contains("Order (n):     2"), "info was {info:?}");
	assert!(info.contains("Tunes:         1"), "info was {info:?}");
	assert!(info.contains("Corpus tokens: 16"), "info was {info:?}");
}

#[test]
fn generate_needs_enough_start_tokens() {
	let workspace = temp_workspace();
	ngram(workspace.path())
		.args(["train", "--name", "cats", "--source", "cats.txt", "--n", "3"])
		.assert()
		.success();
	ngram(workspace.path())
		.args(["generate", "--name", "cats", "--length", "3", "--start", "cat"])
		.assert()
		.failure()
		.code(2);
	ngram(workspace.path())
		.args(["generate", "--name", "dogs", "--length", "3", "--start", "the cat"])
		.assert()
		.failure()
		.code(3);
}

#[test]
fn delete_removes_model() {
	let workspace = temp_workspace();
	ngram(workspace.path())
		.args(["delete", "--name", "cats"])
		.assert()
		.failure()
		.code(3);

	ngram(workspace.path())
		.args(["train", "--name", "cats", "--source", "cats.txt", "--n", "2"])
		.assert()
		.success();
	ngram(workspace.path()).args(["delete", "--name", "cats"]).assert().success();
	assert_eq!(stdout_of(ngram(workspace.path()).arg("list")), "");
	ngram(workspace.path())
		.args(["info", "--name", "cats"])
		.assert()
		.failure()
		.code(3);
}
