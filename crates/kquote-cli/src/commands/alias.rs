use kquote_core::{is_valid_code, AliasBook, CatalogStore, Resolution, Resolver};
use serde::Serialize;
use serde_json::json;

use crate::cli::{AliasArgs, AliasCommand};
use crate::error::CliError;

use super::{CommandResult, Context, View};

#[derive(Debug, Serialize)]
struct AliasSetData<'a> {
    nickname: &'a str,
    code: &'a str,
    resolution: &'a Resolution,
    replaced: Option<String>,
}

pub fn run(context: &Context, args: &AliasArgs) -> Result<CommandResult, CliError> {
    let mut aliases = AliasBook::load(context.paths.aliases_path())?;

    match &args.command {
        AliasCommand::Set { nickname, target } => set(context, &mut aliases, nickname, target),
        AliasCommand::Remove { nickname } => remove(&mut aliases, nickname),
        AliasCommand::List => list(&aliases),
    }
}

fn set(
    context: &Context,
    aliases: &mut AliasBook,
    nickname: &str,
    target: &str,
) -> Result<CommandResult, CliError> {
    let target = target.trim();
    let resolution = if is_valid_code(target) {
        Resolution::Direct {
            code: target.to_owned(),
        }
    } else {
        let catalog = CatalogStore::new(context.paths.catalog_path());
        let mut resolver = Resolver::new(&*aliases, &catalog);
        let resolution = resolver.resolve(target);
        if let (Resolution::Unresolved, Some(error)) = (&resolution, resolver.catalog_error()) {
            return Err(CliError::Command(format!(
                "Could not resolve '{target}': {error}"
            )));
        }
        resolution
    };

    let Some(code) = resolution.code().map(str::to_owned) else {
        return Err(CliError::Command(format!(
            "Could not resolve '{target}' to any stock."
        )));
    };

    let replaced = aliases.set(nickname, &code)?;
    aliases.save()?;

    let nickname = nickname.trim();
    let message = match &resolution {
        Resolution::Alias { .. } => format!(
            "Alias set: {nickname} -> {code} (resolved via existing alias '{target}')"
        ),
        Resolution::Searched { name, .. } => format!(
            "Alias set: {nickname} -> {code} (resolved via stock name '{name}' ({code}))"
        ),
        _ => format!("Alias set: {nickname} -> {code} (direct code)"),
    };

    let data = serde_json::to_value(AliasSetData {
        nickname,
        code: &code,
        resolution: &resolution,
        replaced,
    })?;
    Ok(CommandResult::ok(data, View::line(message)))
}

fn remove(aliases: &mut AliasBook, nickname: &str) -> Result<CommandResult, CliError> {
    let removed = aliases.remove(nickname);
    if !removed {
        return Ok(CommandResult::ok(
            json!({ "nickname": nickname, "removed": false }),
            View::line(format!("Alias '{nickname}' not found.")),
        ));
    }

    aliases.save()?;
    Ok(CommandResult::ok(
        json!({ "nickname": nickname, "removed": true }),
        View::line(format!("Alias '{nickname}' removed.")),
    ))
}

fn list(aliases: &AliasBook) -> Result<CommandResult, CliError> {
    let rows: Vec<(String, String)> = aliases
        .entries()
        .map(|(nickname, code)| (nickname.to_owned(), code.to_owned()))
        .collect();
    let data = serde_json::to_value(aliases.entries().collect::<std::collections::BTreeMap<_, _>>())?;

    Ok(CommandResult::ok(
        data,
        View::List {
            rows,
            empty: String::from("No aliases defined."),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::offline_context;

    fn args(command: AliasCommand) -> AliasArgs {
        AliasArgs { command }
    }

    fn set_args(nickname: &str, target: &str) -> AliasArgs {
        args(AliasCommand::Set {
            nickname: nickname.to_owned(),
            target: target.to_owned(),
        })
    }

    #[test]
    fn direct_code_is_stored_as_is() {
        let temp = tempfile::tempdir().expect("temp dir");
        let context = offline_context(temp.path());

        let result = run(&context, &set_args("sam", "005930")).expect("set");

        assert_eq!(
            result.view,
            View::line("Alias set: sam -> 005930 (direct code)")
        );
        let aliases = AliasBook::load(context.paths.aliases_path()).expect("reload");
        assert_eq!(aliases.resolve("sam"), Some("005930"));
    }

    #[test]
    fn name_target_is_resolved_through_search() {
        let temp = tempfile::tempdir().expect("temp dir");
        let context = offline_context(temp.path());

        let result = run(&context, &set_args("sam", "삼성전자")).expect("set");

        assert_eq!(
            result.view,
            View::line("Alias set: sam -> 005930 (resolved via stock name '삼성전자' (005930))")
        );
        assert_eq!(result.data["resolution"]["via"], "searched");
    }

    #[test]
    fn existing_alias_can_be_the_target() {
        let temp = tempfile::tempdir().expect("temp dir");
        let context = offline_context(temp.path());
        run(&context, &set_args("sam", "005930")).expect("first");

        let result = run(&context, &set_args("samsung", "sam")).expect("second");

        assert_eq!(
            result.view,
            View::line("Alias set: samsung -> 005930 (resolved via existing alias 'sam')")
        );
    }

    #[test]
    fn unresolvable_target_leaves_the_book_untouched() {
        let temp = tempfile::tempdir().expect("temp dir");
        let context = offline_context(temp.path());

        let error = run(&context, &set_args("x", "ZZZ")).expect_err("unresolvable");

        assert_eq!(error.exit_code(), 2);
        assert!(!context.paths.aliases_path().exists());
    }

    #[test]
    fn remove_reports_missing_nicknames() {
        let temp = tempfile::tempdir().expect("temp dir");
        let context = offline_context(temp.path());
        run(&context, &set_args("sam", "005930")).expect("set");

        let removed = run(
            &context,
            &args(AliasCommand::Remove {
                nickname: "sam".to_owned(),
            }),
        )
        .expect("remove");
        let missing = run(
            &context,
            &args(AliasCommand::Remove {
                nickname: "sam".to_owned(),
            }),
        )
        .expect("remove again");

        assert_eq!(removed.view, View::line("Alias 'sam' removed."));
        assert_eq!(missing.view, View::line("Alias 'sam' not found."));
    }

    #[test]
    fn list_is_sorted_by_nickname() {
        let temp = tempfile::tempdir().expect("temp dir");
        let context = offline_context(temp.path());
        run(&context, &set_args("zz", "000660")).expect("set");
        run(&context, &set_args("aa", "005930")).expect("set");

        let result = run(&context, &args(AliasCommand::List)).expect("list");

        match result.view {
            View::List { rows, .. } => assert_eq!(
                rows,
                vec![
                    ("aa".to_owned(), "005930".to_owned()),
                    ("zz".to_owned(), "000660".to_owned()),
                ]
            ),
            other => panic!("unexpected view: {other:?}"),
        }
        assert_eq!(result.data["aa"], "005930");
    }
}
