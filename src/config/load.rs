use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::warn;

use super::types::PackConfig;

/// A project file together with the directory its relative paths start from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: PackConfig,
    pub config_dir: PathBuf,
}

impl LoadedConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        let config: PackConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;

        let config_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self { config, config_dir })
    }

    /// Input paths in the order their frames will be indexed.
    ///
    /// Entries keep their order in the project file. A glob entry stands for
    /// its matches sorted by path, so `frames/*.png` numbers `01.png` before
    /// `02.png` however the file system lists them. Everything is joined onto
    /// the config directory.
    pub fn resolve_inputs(&self) -> Result<Vec<PathBuf>> {
        let mut inputs = Vec::new();

        for entry in &self.config.input {
            if is_glob_pattern(entry) {
                let matches = self.expand_glob(entry)?;
                if matches.is_empty() {
                    warn!("Input pattern '{}' matched nothing", entry);
                }
                inputs.extend(matches);
            } else {
                inputs.push(self.config_dir.join(entry));
            }
        }

        Ok(inputs)
    }

    fn expand_glob(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let full_pattern = self.config_dir.join(pattern);
        let mut matches = glob::glob(&full_pattern.to_string_lossy())
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .map(|entry| entry.with_context(|| format!("failed to read glob entry: {}", pattern)))
            .collect::<Result<Vec<_>>>()?;
        matches.sort();
        Ok(matches)
    }

    pub fn resolve_output_dir(&self) -> PathBuf {
        self.config_dir.join(&self.config.output_dir)
    }
}

fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_in(config_dir: PathBuf, input: &[&str]) -> LoadedConfig {
        LoadedConfig {
            config: PackConfig {
                input: input.iter().map(|s| s.to_string()).collect(),
                output_dir: "out".to_string(),
                ..PackConfig::default()
            },
            config_dir,
        }
    }

    #[test]
    fn test_is_glob_pattern() {
        assert!(is_glob_pattern("*.png"));
        assert!(is_glob_pattern("frames/**/*.png"));
        assert!(is_glob_pattern("wave?.png"));
        assert!(is_glob_pattern("wave[0-9].png"));
        assert!(!is_glob_pattern("wave.png"));
        assert!(!is_glob_pattern("frames/idle"));
    }

    #[test]
    fn test_plain_inputs_resolve_against_config_dir() {
        let loaded = loaded_in(PathBuf::from("/project"), &["frames/idle", "wave.png"]);

        assert_eq!(
            loaded.resolve_inputs().unwrap(),
            vec![
                PathBuf::from("/project/frames/idle"),
                PathBuf::from("/project/wave.png")
            ]
        );
        assert_eq!(loaded.resolve_output_dir(), PathBuf::from("/project/out"));
    }

    #[test]
    fn test_glob_matches_are_sorted_in_place() {
        let dir = std::env::temp_dir().join(format!("emote-atlas-glob-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        for name in ["03.png", "01.png", "02.png", "notes.txt"] {
            std::fs::write(dir.join(name), b"").unwrap();
        }

        let loaded = loaded_in(dir.clone(), &["02.png", "*.png", "missing/*.png"]);
        let inputs = loaded.resolve_inputs().unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(
            inputs,
            vec![
                dir.join("02.png"),
                dir.join("01.png"),
                dir.join("02.png"),
                dir.join("03.png"),
            ]
        );
    }
}
