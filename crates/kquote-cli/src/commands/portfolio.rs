use std::collections::BTreeMap;

use kquote_core::PortfolioBook;
use serde_json::json;

use crate::cli::{PortfolioArgs, PortfolioCommand};
use crate::error::CliError;

use super::{CommandResult, Context, View};

pub fn run(context: &Context, args: &PortfolioArgs) -> Result<CommandResult, CliError> {
    let mut portfolios = PortfolioBook::load(context.paths.portfolios_path())?;

    match &args.command {
        PortfolioCommand::Set { name, items } => {
            let count = portfolios.set(name, items)?;
            portfolios.save()?;
            let name = name.trim();
            Ok(CommandResult::ok(
                json!({ "name": name, "items": portfolios.get(name).unwrap_or_default() }),
                View::line(format!("Portfolio '{name}' saved with {count} items.")),
            ))
        }
        PortfolioCommand::Remove { name } => {
            if !portfolios.remove(name) {
                return Ok(CommandResult::ok(
                    json!({ "name": name, "removed": false }),
                    View::line(format!("Portfolio '{name}' not found.")),
                ));
            }
            portfolios.save()?;
            Ok(CommandResult::ok(
                json!({ "name": name, "removed": true }),
                View::line(format!("Portfolio '{name}' removed.")),
            ))
        }
        PortfolioCommand::List => {
            let rows = portfolios
                .entries()
                .map(|(name, items)| (name.to_owned(), items.join(", ")))
                .collect();
            let data = serde_json::to_value(portfolios.entries().collect::<BTreeMap<_, _>>())?;
            Ok(CommandResult::ok(
                data,
                View::List {
                    rows,
                    empty: String::from("No portfolios defined."),
                },
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::offline_context;

    fn args(command: PortfolioCommand) -> PortfolioArgs {
        PortfolioArgs { command }
    }

    fn set(name: &str, items: &[&str]) -> PortfolioArgs {
        args(PortfolioCommand::Set {
            name: name.to_owned(),
            items: items.iter().map(|item| (*item).to_owned()).collect(),
        })
    }

    #[test]
    fn set_saves_and_reports_item_count() {
        let temp = tempfile::tempdir().expect("temp dir");
        let context = offline_context(temp.path());

        let result = run(&context, &set("tech", &["삼전", "  ", "카카오"])).expect("set");

        assert_eq!(
            result.view,
            View::line("Portfolio 'tech' saved with 2 items.")
        );
        let books = PortfolioBook::load(context.paths.portfolios_path()).expect("reload");
        assert_eq!(books.get("tech"), Some(&["삼전".to_owned(), "카카오".to_owned()][..]));
    }

    #[test]
    fn set_with_only_blank_items_is_rejected() {
        let temp = tempfile::tempdir().expect("temp dir");
        let context = offline_context(temp.path());

        let error = run(&context, &set("tech", &[" "])).expect_err("blank items");

        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn remove_and_list() {
        let temp = tempfile::tempdir().expect("temp dir");
        let context = offline_context(temp.path());
        run(&context, &set("tech", &["삼전"])).expect("set");
        run(&context, &set("bank", &["카카오뱅크", "KB금융"])).expect("set");

        let removed = run(
            &context,
            &args(PortfolioCommand::Remove {
                name: "tech".to_owned(),
            }),
        )
        .expect("remove");
        let listed = run(&context, &args(PortfolioCommand::List)).expect("list");

        assert_eq!(removed.view, View::line("Portfolio 'tech' removed."));
        assert_eq!(
            listed.view,
            View::List {
                rows: vec![("bank".to_owned(), "카카오뱅크, KB금융".to_owned())],
                empty: String::from("No portfolios defined."),
            }
        );
    }

    #[test]
    fn removing_unknown_portfolio_is_not_an_error() {
        let temp = tempfile::tempdir().expect("temp dir");
        let context = offline_context(temp.path());

        let result = run(
            &context,
            &args(PortfolioCommand::Remove {
                name: "ghost".to_owned(),
            }),
        )
        .expect("remove");

        assert_eq!(result.view, View::line("Portfolio 'ghost' not found."));
        assert_eq!(result.data["removed"], false);
    }
}
