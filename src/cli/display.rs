//! Module for showing the saved meme in the system's image viewer.

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};


/// Open given file with the platform's default application.
///
/// Doesn't wait for the viewer to be closed.
pub fn open(path: &Path) -> io::Result<()> {
    let mut cmd = opener();
    cmd.arg(path)
        .stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());
    trace!("Running {:?}", cmd);
    cmd.spawn()?;
    Ok(())
}

#[cfg(target_os = "macos")]
fn opener() -> Command {
    Command::new("open")
}

#[cfg(target_os = "windows")]
fn opener() -> Command {
    let mut cmd = Command::new("cmd");
    // The empty argument is the window title `start` would otherwise take the path for.
    cmd.args(&["/C", "start", ""]);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener() -> Command {
    Command::new("xdg-open")
}
