use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde_json::json;
use tracing::debug;

use crate::error::CliError;

use super::{CommandResult, Context, View};

/// Removes the resolution cache and the catalog. Aliases and portfolios stay.
pub fn run(context: &Context) -> Result<CommandResult, CliError> {
    let mut removed = Vec::new();
    for path in [context.paths.cache_path(), context.paths.catalog_path()] {
        if remove_if_present(&path)? {
            removed.push(path.display().to_string());
        }
    }

    let message = if removed.is_empty() {
        "Nothing to clean."
    } else {
        "Cache and ticker database cleaned."
    };
    Ok(CommandResult::ok(
        json!({ "removed": removed }),
        View::line(message),
    ))
}

fn remove_if_present(path: &Path) -> Result<bool, CliError> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed");
            Ok(true)
        }
        Err(error) if error.kind() == ErrorKind::NotFound => Ok(false),
        Err(error) => Err(error.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::offline_context;

    #[test]
    fn removes_cache_and_catalog_but_keeps_user_files() {
        let temp = tempfile::tempdir().expect("temp dir");
        let context = offline_context(temp.path());
        let paths = &context.paths;
        for path in [
            paths.cache_path(),
            paths.catalog_path(),
            paths.aliases_path(),
            paths.portfolios_path(),
        ] {
            fs::write(path, "{}").expect("write");
        }

        let result = run(&context).expect("clean");

        assert_eq!(result.view, View::line("Cache and ticker database cleaned."));
        assert!(!paths.cache_path().exists());
        assert!(!paths.catalog_path().exists());
        assert!(paths.aliases_path().exists());
        assert!(paths.portfolios_path().exists());
    }

    #[test]
    fn empty_state_has_nothing_to_clean() {
        let temp = tempfile::tempdir().expect("temp dir");
        let context = offline_context(temp.path());

        let result = run(&context).expect("clean");

        assert_eq!(result.view, View::line("Nothing to clean."));
        assert_eq!(result.data["removed"], json!([]));
    }
}
