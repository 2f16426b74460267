//! Interactive browsing of a paginated collection.

use std::future::Future;

use anyhow::Context;
use dialoguer::Select;
use medadmin_core::ApiError;

use crate::cli::output::{self, Row};
use crate::cli::prompts;
use crate::utils::{ListController, Mutation, PageSource};

const ACTIONS: [&str; 9] = [
    "Next page",
    "Previous page",
    "Go to page",
    "Change page size",
    "Search",
    "Clear filters",
    "Delete a row",
    "Refresh",
    "Quit",
];

/// Runs the browse loop until the user quits or the session ends.
pub async fn browse<T, S, D, Fut>(controller: &ListController<T, S>, delete: D) -> anyhow::Result<()>
where
    T: Row + Clone + Send,
    S: PageSource<T>,
    D: Fn(String) -> Fut,
    Fut: Future<Output = Result<(), ApiError>>,
{
    controller.reload().await;

    loop {
        controller.with_view(output::print_view);

        let session_ended = controller.with_view(|view| {
            view.last_error().is_some_and(ApiError::is_auth)
        });
        if session_ended {
            anyhow::bail!("Session ended. Please sign in again with `medadmin login`.");
        }

        let choice = Select::new()
            .with_prompt("Action")
            .items(&ACTIONS)
            .default(0)
            .interact()
            .context("Failed to read action")?;

        match choice {
            0 => {
                if controller.next_page().await.is_none() {
                    println!("Already on the last page.");
                }
            }
            1 => {
                if controller.prev_page().await.is_none() {
                    println!("Already on the first page.");
                }
            }
            2 => {
                let current = controller.with_view(|view| view.page());
                let page: u32 = prompts::number("Page", current)?;
                controller.go_to_page(page).await;
            }
            3 => {
                let current = controller.with_view(|view| view.page_size());
                let size: u32 = prompts::number("Rows per page", current)?;
                controller.set_page_size(size).await;
            }
            4 => {
                let current = controller
                    .with_view(|view| view.request().filters().get("search").map(str::to_string));
                let term = prompts::optional_text("Search", current.as_deref())?;
                controller
                    .set_filter("search", term.as_deref().unwrap_or(""))
                    .await;
            }
            5 => {
                controller.clear_filters().await;
            }
            6 => {
                delete_row(controller, &delete).await?;
            }
            7 => {
                controller.reload().await;
            }
            _ => break,
        }
    }

    Ok(())
}

async fn delete_row<T, S, D, Fut>(controller: &ListController<T, S>, delete: &D) -> anyhow::Result<()>
where
    T: Row + Clone + Send,
    S: PageSource<T>,
    D: Fn(String) -> Fut,
    Fut: Future<Output = Result<(), ApiError>>,
{
    let rows: Vec<(String, String)> = controller.with_view(|view| {
        view.items()
            .iter()
            .map(|item| (item.id(), item.row()))
            .collect()
    });
    if rows.is_empty() {
        println!("Nothing to delete on this page.");
        return Ok(());
    }

    let labels: Vec<&str> = rows.iter().map(|(_, row)| row.as_str()).collect();
    let index = Select::new()
        .with_prompt("Delete which row?")
        .items(&labels)
        .interact()
        .context("Failed to read row")?;

    if !prompts::confirm("Are you sure? This cannot be undone")? {
        return Ok(());
    }

    match delete(rows[index].0.clone()).await {
        Ok(()) => {
            output::success("Deleted");
            controller.after_mutation(Mutation::Deleted).await;
        }
        Err(e) => output::failure(&output::describe_error(&e)),
    }
    Ok(())
}
