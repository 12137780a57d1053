//! Le build script.

use std::error::Error;
use std::process::Command;
use std::str;


fn main() {
    // Expose the Git SHA to the crate code so it can be included in --version.
    match git_head_sha() {
        Ok(rev) => println!("cargo:rustc-env=MEMER_REVISION={}", rev),
        Err(e) => println!("cargo:warning=Failed to obtain current Git SHA: {}", e),
    };
}

fn git_head_sha() -> Result<String, Box<dyn Error>> {
    let mut cmd = Command::new("git");
    cmd.args(&["rev-parse", "--short", "HEAD"]);

    let output = cmd.output()?;
    if !output.status.success() {
        return Err("git rev-parse exited with an error".into());
    }
    let sha = str::from_utf8(&output.stdout[..])?.trim().to_owned();
    Ok(sha)
}
