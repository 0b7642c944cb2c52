use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

/// Replaces `${VAR}` with the variable's value. Unknown variables stay as written.
pub fn substitute_env_vars(content: &str) -> String {
    ENV_VAR
        .replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
}

/// Expands a leading `~` to `$HOME` and substitutes `${VAR}` references.
/// Paths that are not valid UTF-8 are returned unchanged.
pub fn expand_path(path: &Path) -> PathBuf {
    let Some(raw) = path.to_str() else {
        return path.to_path_buf();
    };
    let substituted = substitute_env_vars(raw);

    let home = std::env::var("HOME").ok();
    match (substituted.strip_prefix('~'), home) {
        (Some(""), Some(home)) => PathBuf::from(home),
        (Some(rest), Some(home)) if rest.starts_with('/') => {
            PathBuf::from(home).join(rest.trim_start_matches('/'))
        }
        _ => PathBuf::from(substituted),
    }
}
