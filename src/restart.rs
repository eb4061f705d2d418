use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

/// Command that relaunches `exe` with `args` (argv without argv0).
pub fn relaunch_command(exe: PathBuf, args: impl IntoIterator<Item = OsString>) -> Command {
    let mut cmd = Command::new(exe);
    cmd.args(args);
    cmd
}

/// Start a new instance of the running executable with the original
/// arguments. The caller is responsible for closing this instance.
pub fn restart_process() -> Result<()> {
    let exe = std::env::current_exe().context("resolve current executable")?;
    tracing::info!(exe = %exe.display(), "restarting");
    relaunch_command(exe.clone(), std::env::args_os().skip(1))
        .spawn()
        .with_context(|| format!("spawn {}", exe.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relaunch_passes_original_arguments() {
        let cmd = relaunch_command(
            PathBuf::from("/opt/overlay/class_schedule"),
            vec![OsString::from("--foo"), OsString::from("bar")],
        );
        assert_eq!(cmd.get_program(), "/opt/overlay/class_schedule");
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, ["--foo", "bar"]);
    }
}
