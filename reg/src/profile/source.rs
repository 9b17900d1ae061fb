use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use crate::error::RegError;

/// Environment variable naming the directory searched for profiles that are
/// not found as given.
pub const PLUGINS_ENV: &str = "REGBANK_PLUGINS";

/// Turns a profile name into profile text.
///
/// The name is first tried as a path, then relative to the plugin directory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProfileSource {
    plugin_root: Option<PathBuf>,
}

impl ProfileSource {
    /// Uses the directory in [`PLUGINS_ENV`], if set.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            plugin_root: env::var_os(PLUGINS_ENV).map(PathBuf::from),
        }
    }

    #[must_use]
    pub fn with_plugin_root(root: impl Into<PathBuf>) -> Self {
        Self {
            plugin_root: Some(root.into()),
        }
    }

    #[must_use]
    pub fn plugin_root(&self) -> Option<&Path> {
        self.plugin_root.as_deref()
    }

    /// Reads the text of `profile`.
    ///
    /// # Errors
    ///
    /// [`RegError::ProfileNotFound`] when neither location has it,
    /// [`RegError::Io`] when a candidate exists but cannot be read.
    pub fn read(&self, profile: &str) -> Result<String, RegError> {
        if let Some(text) = read_if_exists(Path::new(profile))? {
            return Ok(text);
        }

        if let Some(root) = &self.plugin_root {
            let path = root.join(profile);
            if let Some(text) = read_if_exists(&path)? {
                tracing::debug!("profile '{profile}' found in {}", root.display());
                return Ok(text);
            }
        }

        Err(RegError::ProfileNotFound {
            profile: profile.to_string(),
        })
    }
}

fn read_if_exists(path: &Path) -> Result<Option<String>, RegError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(RegError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("regbank-{name}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn direct_path() {
        let dir = scratch_dir("direct");
        let path = dir.join("x86.regs");
        fs::write(&path, "gpr eax 4 0\n").unwrap();

        let text = ProfileSource::default()
            .read(path.to_str().unwrap())
            .unwrap();
        assert_eq!(text, "gpr eax 4 0\n");

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn plugin_directory() {
        let dir = scratch_dir("plugins");
        fs::write(dir.join("arm.regs"), "gpr r0 4 0\n").unwrap();

        let source = ProfileSource::with_plugin_root(&dir);
        assert_eq!(source.plugin_root(), Some(dir.as_path()));
        assert_eq!(source.read("arm.regs").unwrap(), "gpr r0 4 0\n");

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn not_found() {
        let dir = scratch_dir("missing");
        let source = ProfileSource::with_plugin_root(&dir);

        match source.read("no-such-profile.regs") {
            Err(RegError::ProfileNotFound { profile }) => {
                assert_eq!(profile, "no-such-profile.regs");
            }
            other => panic!("expected ProfileNotFound, got {other:?}"),
        }

        fs::remove_dir_all(dir).unwrap();
    }
}
