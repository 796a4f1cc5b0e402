use assert_cmd::Command;
use git2::{Oid, Repository, Signature, Time};
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CONFIG: &str = r#"{
    "projectName": "Campaign Manager Service",
    "projectRepoUrl": "https://git.example.com/team/service",
    "diffUrlTemplate": "https://git.example.com/team/service/-/compare/{{ StartCommitID }}...{{ EndCommitID }}",
    "commitUrlTemplate": "https://git.example.com/team/service/-/commit/{{ CommitID }}",
    "commitHashDigits": 8
}"#;

struct Fixture {
    dir: TempDir,
    commits: Vec<Oid>,
}

impl Fixture {
    /// Linear history on main: start -> x -> y -> end, authored in turns
    fn linear() -> Self {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let authors = ["alice", "bob", "alice", "carol"];
        let messages = ["start", "Add parser", "Fix a | b", "Release notes"];

        let mut commits: Vec<Oid> = Vec::new();
        for (i, (author, message)) in authors.iter().zip(messages).enumerate() {
            let sig = Signature::new(author, "dev@example.com", &Time::new(1_000 + i as i64 * 60, 0)).unwrap();
            let tree_id = repo.treebuilder(None).unwrap().write().unwrap();
            let tree = repo.find_tree(tree_id).unwrap();
            let parents = commits
                .last()
                .map(|oid| vec![repo.find_commit(*oid).unwrap()])
                .unwrap_or_default();
            let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
            let oid = repo
                .commit(Some("refs/heads/main"), &sig, &sig, message, &tree, &parent_refs)
                .unwrap();
            commits.push(oid);
        }
        repo.set_head("refs/heads/main").unwrap();
        repo.reference("refs/heads/release", commits[0], true, "release point").unwrap();

        std::fs::write(dir.path().join("changelog.json"), CONFIG).unwrap();
        Fixture { dir, commits }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn config(&self) -> PathBuf {
        self.path().join("changelog.json")
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("changelog").unwrap();
        cmd.arg("--repo").arg(self.path()).arg("--config").arg(self.config());
        cmd
    }
}

#[test]
fn test_report_to_stdout() {
    let fixture = Fixture::linear();
    let end = fixture.commits[3].to_string();
    let start = fixture.commits[0].to_string();

    fixture
        .command()
        .args(["--start", "release", "--end", "HEAD"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "[Campaign Manager Service](https://git.example.com/team/service) Deployment<br>",
        ))
        .stdout(predicate::str::contains(format!("[Diff: {}...{}]", start, end)))
        .stdout(predicate::str::contains("Authors: alice, bob, carol"))
        .stdout(predicate::str::contains(format!(
            "|[{}](https://git.example.com/team/service/-/commit/{})|carol|Release notes|",
            &end[..8],
            end
        )))
        .stdout(predicate::str::contains("|alice|Fix a \\| b|"))
        .stdout(predicate::str::contains(format!("|[{}](", &start[..8])).not());
}

#[test]
fn test_full_hashes_with_digits_override() {
    let fixture = Fixture::linear();
    let end = fixture.commits[3].to_string();

    fixture
        .command()
        .args(["--start", &fixture.commits[2].to_string(), "--digits", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("|[{}](", end)));
}

#[test]
fn test_report_to_file() {
    let fixture = Fixture::linear();
    let out = fixture.path().join("CHANGELOG.md");

    fixture
        .command()
        .args(["--start", "release", "--out"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.contains("| Commit | Author | Message |"));
    assert_eq!(text.lines().filter(|line| line.starts_with("|[")).count(), 3);
}

#[test]
fn test_bad_template_writes_nothing() {
    let fixture = Fixture::linear();
    let config = CONFIG.replace("{{ EndCommitID }}", "{{ HeadCommitID }}");
    std::fs::write(fixture.config(), config).unwrap();
    let out = fixture.path().join("CHANGELOG.md");

    fixture
        .command()
        .args(["--start", "release", "--out"])
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("diff_url"));

    assert!(!out.exists());
}

#[test]
fn test_unreachable_start_fails() {
    let fixture = Fixture::linear();
    let start = fixture.commits[3].to_string();

    fixture
        .command()
        .args(["--start", &start, "--end", "release"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not reachable"));
}

#[test]
fn test_unknown_reference_fails() {
    let fixture = Fixture::linear();

    fixture
        .command()
        .args(["--start", "refs/heads/nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("start-commit=refs/heads/nope"));
}

#[test]
fn test_missing_config_fails() {
    let fixture = Fixture::linear();
    std::fs::remove_file(fixture.config()).unwrap();

    fixture
        .command()
        .args(["--start", "release"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration error"));
}
