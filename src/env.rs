use std::env;

use log::debug;

/// Ordered snapshot of the process environment plus the exports made during
/// this run.
///
/// Pre-existing entries keep their native enumeration order. Exporting an
/// existing key overwrites its value in place; a new key is appended at the
/// end. The map is explicit rather than a view over global process state,
/// so export logic can be exercised in tests without touching the real
/// environment.
#[derive(Debug, Default)]
pub struct EnvMap {
    vars: Vec<(String, String)>,
}

impl EnvMap {
    /// Capture the current process environment. Entries that are not valid
    /// UTF-8 are skipped.
    pub fn from_process() -> Self {
        let mut vars = Vec::new();
        for (key, value) in env::vars_os() {
            match (key.to_str(), value.to_str()) {
                (Some(key), Some(value)) => vars.push((key.to_string(), value.to_string())),
                _ => debug!("Skipping non-UTF-8 environment entry {:?}", key),
            }
        }
        debug!("Captured {} environment variable(s)", vars.len());
        Self { vars }
    }

    /// Insert or overwrite `key`, preserving its position if already present.
    pub fn set(&mut self, key: &str, value: &str) {
        match self.vars.iter_mut().find(|(k, _)| k == key) {
            Some((_, stored)) => *stored = value.to_string(),
            None => self.vars.push((key.to_string(), value.to_string())),
        }
    }

    /// All entries in map order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get<'a>(env: &'a EnvMap, key: &str) -> Option<&'a str> {
        env.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    #[test]
    fn test_set_appends_new_key() {
        let mut env = EnvMap::from_iter([("A", "1")]);
        env.set("B", "2");

        assert_eq!(get(&env, "B"), Some("2"));
        let keys: Vec<&str> = env.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["A", "B"]);
    }

    #[test]
    fn test_set_overwrites_in_place() {
        let mut env = EnvMap::from_iter([("A", "1"), ("B", "2")]);
        env.set("A", "3");

        assert_eq!(get(&env, "A"), Some("3"));
        let keys: Vec<&str> = env.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["A", "B"]);
    }

    #[test]
    fn test_from_process_captures_known_variable() {
        // PATH is present in any sane test environment.
        let env = EnvMap::from_process();

        assert_eq!(
            get(&env, "PATH").is_some(),
            std::env::var("PATH").is_ok()
        );
    }
}
