use std::env;
use std::process::Command;

fn main() {
    // Use environment variable if set, otherwise ask git
    let commit = env::var("VERSIONMOD_GIT_COMMIT").ok().or_else(git_commit);
    if let Some(commit) = commit {
        println!("cargo:rustc-env=VERSIONMOD_GIT_COMMIT={commit}");
    }

    if let Ok(time) = env::var("VERSIONMOD_BUILD_TIME") {
        println!("cargo:rustc-env=VERSIONMOD_BUILD_TIME={time}");
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-env-changed=VERSIONMOD_GIT_COMMIT");
    println!("cargo:rerun-if-env-changed=VERSIONMOD_BUILD_TIME");
}

fn git_commit() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let commit = String::from_utf8(output.stdout).ok()?.trim().to_string();
    if commit.is_empty() { None } else { Some(commit) }
}
