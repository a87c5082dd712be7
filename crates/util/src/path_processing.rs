use std::path::PathBuf;

use dirs_next::home_dir;

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a tilde prefix are returned unchanged (after trimming).
pub fn expand_tilde(path: &str) -> PathBuf {
    let trimmed = path.trim();
    let home = || home_dir().unwrap_or_else(|| PathBuf::from("~"));
    if trimmed == "~" {
        return home();
    }
    match trimmed.strip_prefix("~/").or_else(|| trimmed.strip_prefix("~\\")) {
        Some(rest) => home().join(rest),
        None => PathBuf::from(trimmed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaves_plain_paths_alone() {
        assert_eq!(expand_tilde(" ./catalog.json "), PathBuf::from("./catalog.json"));
        assert_eq!(expand_tilde("/etc/scriptdeck"), PathBuf::from("/etc/scriptdeck"));
    }

    #[test]
    fn expands_home_prefix() {
        let Some(home) = home_dir() else {
            return;
        };
        assert_eq!(expand_tilde("~"), home);
        assert_eq!(expand_tilde("~/catalog.json"), home.join("catalog.json"));
    }
}
