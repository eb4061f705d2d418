use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

const DESKTOP_FILE_NAME: &str = "class_schedule_app.desktop";
const LAUNCH_AGENT_LABEL: &str = "com.classschedule.overlay";

/// How the executable is registered to run at login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutostartMethod {
    /// Value under `HKCU\Software\Microsoft\Windows\CurrentVersion\Run`.
    WindowsRegistry,
    /// XDG autostart desktop entry written into `dir`.
    LinuxDesktopEntry { dir: PathBuf },
    /// Launch agent property list written into `dir`.
    MacLaunchAgent { dir: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutostartOutcome {
    AlreadyRegistered,
    Registered,
}

impl AutostartMethod {
    pub fn for_current_platform() -> Result<Self> {
        if cfg!(target_os = "windows") {
            Ok(AutostartMethod::WindowsRegistry)
        } else if cfg!(target_os = "macos") {
            let home = dirs_next::home_dir().ok_or_else(|| anyhow!("home directory not found"))?;
            Ok(AutostartMethod::MacLaunchAgent {
                dir: home.join("Library").join("LaunchAgents"),
            })
        } else {
            let config = dirs_next::config_dir()
                .ok_or_else(|| anyhow!("config directory not found"))?;
            Ok(AutostartMethod::LinuxDesktopEntry {
                dir: config.join("autostart"),
            })
        }
    }

    /// File written by file-based methods.
    pub fn entry_path(&self) -> Option<PathBuf> {
        match self {
            AutostartMethod::WindowsRegistry => None,
            AutostartMethod::LinuxDesktopEntry { dir } => Some(dir.join(DESKTOP_FILE_NAME)),
            AutostartMethod::MacLaunchAgent { dir } => {
                Some(dir.join(format!("{LAUNCH_AGENT_LABEL}.plist")))
            }
        }
    }

    pub fn is_registered(&self) -> Result<bool> {
        match self {
            AutostartMethod::WindowsRegistry => registry::is_registered(),
            _ => Ok(self.entry_path().is_some_and(|p| p.exists())),
        }
    }

    pub fn register(&self, exe: &Path) -> Result<()> {
        match self {
            AutostartMethod::WindowsRegistry => registry::register(exe),
            AutostartMethod::LinuxDesktopEntry { dir } => {
                write_entry(dir, DESKTOP_FILE_NAME, &desktop_entry(exe))
            }
            AutostartMethod::MacLaunchAgent { dir } => write_entry(
                dir,
                &format!("{LAUNCH_AGENT_LABEL}.plist"),
                &launch_agent_plist(exe),
            ),
        }
    }

    /// Register `exe` unless an entry already exists.
    pub fn ensure_registered(&self, exe: &Path) -> Result<AutostartOutcome> {
        if self.is_registered()? {
            return Ok(AutostartOutcome::AlreadyRegistered);
        }
        self.register(exe)?;
        Ok(AutostartOutcome::Registered)
    }
}

fn write_entry(dir: &Path, file_name: &str, contents: &str) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create autostart folder {}", dir.display()))?;
    let path = dir.join(file_name);
    std::fs::write(&path, contents)
        .with_context(|| format!("write autostart entry {}", path.display()))
}

pub fn desktop_entry(exe: &Path) -> String {
    format!(
        "[Desktop Entry]\n\
         Type=Application\n\
         Exec={}\n\
         Hidden=false\n\
         NoDisplay=false\n\
         X-GNOME-Autostart-enabled=true\n\
         Name=Class Schedule\n\
         Comment=Class schedule overlay\n",
        exe.display()
    )
}

pub fn launch_agent_plist(exe: &Path) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>Label</key>
    <string>{LAUNCH_AGENT_LABEL}</string>
    <key>ProgramArguments</key>
    <array>
        <string>{}</string>
    </array>
    <key>RunAtLoad</key>
    <true/>
</dict>
</plist>
"#,
        xml_escape(&exe.display().to_string())
    )
}

fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(target_os = "windows")]
mod registry {
    use anyhow::{Context, Result};
    use std::path::Path;
    use windows::core::w;
    use windows::Win32::System::Registry::{
        RegCloseKey, RegOpenKeyExW, RegQueryValueExW, RegSetValueExW, HKEY, HKEY_CURRENT_USER,
        KEY_READ, KEY_WRITE, REG_SAM_FLAGS, REG_SZ,
    };

    fn open_run_key(access: REG_SAM_FLAGS) -> Result<HKEY> {
        let mut hkey = HKEY::default();
        unsafe {
            RegOpenKeyExW(
                HKEY_CURRENT_USER,
                w!("Software\\Microsoft\\Windows\\CurrentVersion\\Run"),
                0,
                access,
                &mut hkey,
            )
            .ok()
            .context("open Run registry key")?;
        }
        Ok(hkey)
    }

    pub fn is_registered() -> Result<bool> {
        let hkey = open_run_key(KEY_READ)?;
        let mut size = 0u32;
        let found = unsafe {
            let result = RegQueryValueExW(
                hkey,
                w!("ClassSchedule"),
                None,
                None,
                None,
                Some(&mut size as *mut u32),
            );
            let _ = RegCloseKey(hkey);
            result.is_ok()
        };
        Ok(found)
    }

    pub fn register(exe: &Path) -> Result<()> {
        let hkey = open_run_key(KEY_WRITE)?;
        let value: Vec<u16> = exe
            .display()
            .to_string()
            .encode_utf16()
            .chain(std::iter::once(0))
            .collect();
        let bytes: Vec<u8> = value.iter().flat_map(|c| c.to_le_bytes()).collect();
        unsafe {
            let result = RegSetValueExW(hkey, w!("ClassSchedule"), 0, REG_SZ, Some(&bytes));
            let _ = RegCloseKey(hkey);
            result.ok().context("write Run registry value")?;
        }
        Ok(())
    }
}

#[cfg(not(target_os = "windows"))]
mod registry {
    use anyhow::{bail, Result};
    use std::path::Path;

    pub fn is_registered() -> Result<bool> {
        bail!("registry autostart is only available on Windows")
    }

    pub fn register(_exe: &Path) -> Result<()> {
        bail!("registry autostart is only available on Windows")
    }
}
