//! `kbot whoami`: log in and print the backend's profile for the user.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use kangbot_types::auth::UserProfile;

use crate::state::AppState;

pub async fn whoami(state: &mut AppState, user: &str, json: bool) -> Result<()> {
    state.chat.login(user).await?;
    let profile = state.chat.whoami().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        print_profile(&profile);
    }
    Ok(())
}

pub fn print_profile(profile: &UserProfile) {
    println!();
    println!("  Logged in as {}", style(profile.display_name()).cyan().bold());
    println!();
    println!("{}", profile_table(profile));
    println!();
}

fn profile_table(profile: &UserProfile) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let mut row = |key: &str, value: String| {
        table.add_row(vec![Cell::new(key).fg(Color::White), Cell::new(value).fg(Color::Cyan)]);
    };
    row("id", profile.id.clone());
    if let Some(name) = &profile.name {
        row("name", name.clone());
    }
    if let Some(email) = &profile.email {
        row("email", email.clone());
    }
    for (key, value) in &profile.extra {
        let value = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        row(key.as_str(), value);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_table_includes_extra_fields() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"id":7,"name":"Kim","department":"CS","year":3}"#).unwrap();
        let rendered = profile_table(&profile).to_string();
        assert!(rendered.contains("Kim"));
        assert!(rendered.contains("department"));
        assert!(rendered.contains("CS"));
        assert!(rendered.contains('3'));
        assert!(!rendered.contains("email"));
    }
}
