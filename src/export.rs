use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;
use uuid::Uuid;

use crate::env::EnvMap;
use crate::error::Error;
use crate::workflow;

/// Records exports in the environment map and propagates them to later
/// pipeline steps, through the runner's environment file when one is
/// configured and the legacy `set-env` workflow command otherwise.
pub struct Exporter {
    env: EnvMap,
    env_file: Option<(PathBuf, File)>,
}

impl Exporter {
    /// Wrap an environment map, opening the environment file in append
    /// mode if a path is given.
    pub fn new(env: EnvMap, env_file: Option<&Path>) -> Result<Self, Error> {
        let env_file = match env_file {
            Some(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|source| Error::EnvFile {
                        path: path.to_path_buf(),
                        source,
                    })?;
                Some((path.to_path_buf(), file))
            }
            None => None,
        };
        Ok(Self { env, env_file })
    }

    pub fn env(&self) -> &EnvMap {
        &self.env
    }

    /// Export one variable: propagate it, then record it in the map.
    pub fn export(&mut self, name: &str, value: &str) -> Result<(), Error> {
        match &mut self.env_file {
            Some((path, file)) => {
                let block = heredoc(name, value)?;
                file.write_all(block.as_bytes())
                    .map_err(|source| Error::EnvFile {
                        path: path.clone(),
                        source,
                    })?;
                debug!("Appended {} to {}", name, path.display());
            }
            None => workflow::set_env(name, value),
        }
        self.env.set(name, value);
        Ok(())
    }
}

/// Export the canonical `ENV`/`NODE_ENV` pair, then fan out every variable
/// named `<ENV_UPPERCASED>_<SUFFIX>` to `<SUFFIX>`.
pub fn propagate(exporter: &mut Exporter, branch: &str, environment: &str) -> Result<(), Error> {
    exporter.export("ENV", environment)?;
    exporter.export("NODE_ENV", environment)?;
    workflow::info(&format!(
        "Set ENV and NODE_ENV to {environment} for branch {branch}"
    ));

    let prefix = format!("{}_", environment.to_uppercase());
    // Snapshot the matches before exporting so fan-out exports are not
    // themselves re-scanned.
    let matches: Vec<(String, String, String)> = exporter
        .env()
        .iter()
        .filter_map(|(key, value)| {
            key.strip_prefix(&prefix)
                .map(|suffix| (key.to_string(), suffix.to_string(), value.to_string()))
        })
        .collect();
    debug!("{} variable(s) match prefix {}", matches.len(), prefix);

    for (key, suffix, value) in matches {
        exporter.export(&suffix, &value)?;
        workflow::info(&format!("Loaded {key} into {suffix}"));
        if value.is_empty() {
            workflow::warning(&format!("Value for {suffix} is empty"));
        }
    }

    Ok(())
}

/// Heredoc framing used by the environment file, one block per export. A
/// random delimiter keeps multi-line values unambiguous.
fn heredoc(name: &str, value: &str) -> Result<String, Error> {
    let delimiter = format!("ghadelimiter_{}", Uuid::new_v4());
    if name.contains(&delimiter) || value.contains(&delimiter) {
        return Err(Error::DelimiterCollision {
            name: name.to_string(),
        });
    }
    Ok(format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"))
}
