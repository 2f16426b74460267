//! Interactive prompts.

use anyhow::Context;
use chrono::{DateTime, Utc};
use dialoguer::{Confirm, Input, Password, Select};
use medadmin_models::{Category, Role};

/// Returns `value` or asks for it.
pub fn text_or_prompt(value: Option<String>, prompt: &str) -> anyhow::Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Input::new()
            .with_prompt(prompt)
            .interact_text()
            .with_context(|| format!("Failed to read {}", prompt.to_lowercase())),
    }
}

/// Asks for a value that may be left empty. `initial` is offered as default.
pub fn optional_text(prompt: &str, initial: Option<&str>) -> anyhow::Result<Option<String>> {
    let mut input = Input::<String>::new().with_prompt(prompt).allow_empty(true);
    if let Some(initial) = initial {
        input = input.default(initial.to_string());
    }
    let value = input
        .interact_text()
        .with_context(|| format!("Failed to read {}", prompt.to_lowercase()))?;
    Ok(Some(value.trim().to_string()).filter(|v| !v.is_empty()))
}

pub fn password_or_prompt(value: Option<String>, confirm: bool) -> anyhow::Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }
    let mut prompt = Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords don't match");
    }
    prompt.interact().context("Failed to read password")
}

pub fn number<T>(prompt: &str, default: T) -> anyhow::Result<T>
where
    T: Clone + ToString + std::str::FromStr,
    <T as std::str::FromStr>::Err: ToString,
{
    Input::new()
        .with_prompt(prompt)
        .default(default)
        .interact_text()
        .with_context(|| format!("Failed to read {}", prompt.to_lowercase()))
}

pub fn confirm(prompt: &str) -> anyhow::Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .context("Failed to read confirmation")
}

pub fn role(default: Role) -> anyhow::Result<Role> {
    let labels: Vec<&str> = Role::ALL.iter().map(Role::label).collect();
    let default_index = Role::ALL.iter().position(|r| *r == default).unwrap_or(0);
    let index = Select::new()
        .with_prompt("Role")
        .items(&labels)
        .default(default_index)
        .interact()
        .context("Failed to read role")?;
    Ok(Role::ALL[index])
}

/// Picks a category; `None` when there are none to pick from.
pub fn category(categories: &[Category], current: Option<&str>) -> anyhow::Result<Option<String>> {
    if categories.is_empty() {
        return Ok(None);
    }
    let labels: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    let default_index = current
        .and_then(|id| categories.iter().position(|c| c.id.as_str() == id))
        .unwrap_or(0);
    let index = Select::new()
        .with_prompt("Category")
        .items(&labels)
        .default(default_index)
        .interact()
        .context("Failed to read category")?;
    Ok(Some(categories[index].id.to_string()))
}

/// Collects entries one at a time until an empty line.
pub fn list(prompt: &str) -> anyhow::Result<Vec<String>> {
    let mut items = Vec::new();
    while let Some(item) = optional_text(&format!("{} (empty to finish)", prompt), None)? {
        items.push(item);
    }
    Ok(items)
}

/// Collects RFC 3339 timestamps until an empty line. Invalid entries are re-asked.
pub fn slots() -> anyhow::Result<Vec<DateTime<Utc>>> {
    let mut slots = Vec::new();
    while let Some(raw) = optional_text("Available slot, RFC 3339 (empty to finish)", None)? {
        match parse_slot(&raw) {
            Ok(slot) => slots.push(slot),
            Err(e) => eprintln!("❌ {}", e),
        }
    }
    Ok(slots)
}

pub fn parse_slot(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("'{}' is not an RFC 3339 timestamp", raw.trim()))
}
