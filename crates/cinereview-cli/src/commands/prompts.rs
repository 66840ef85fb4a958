use crate::output::Output;
use async_trait::async_trait;
use cinereview_sources::ConfirmAction;
use color_eyre::Result;
use dialoguer::{Confirm, Input};

/// Prompt for a string value with optional default
pub fn prompt_string(prompt: &str, default: Option<&str>) -> Result<String> {
    let mut input_builder = Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true);

    if let Some(default_value) = default {
        input_builder = input_builder.default(default_value.to_string());
    }

    input_builder.interact_text().map_err(|e| color_eyre::eyre::eyre!("Failed to read input: {}", e))
}

/// Prompt for yes/no with optional default
pub fn prompt_yes_no(prompt: &str, default: Option<bool>) -> Result<bool> {
    let mut confirm_builder = Confirm::new().with_prompt(prompt);

    if let Some(default_value) = default {
        confirm_builder = confirm_builder.default(default_value);
    }

    confirm_builder
        .interact()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read confirmation: {}", e))
}

/// Prompt for a whole number, asking again until one is entered
pub fn prompt_number(prompt: &str, output: &Output) -> Result<i32> {
    loop {
        let input_str = Input::<String>::new()
            .with_prompt(prompt)
            .interact_text()
            .map_err(|e| color_eyre::eyre::eyre!("Failed to read input: {}", e))?;

        match input_str.trim().parse::<i32>() {
            Ok(num) => return Ok(num),
            Err(_) => output.error("Invalid input. Please enter a whole number."),
        }
    }
}

/// Terminal confirmation dialog
///
/// Any failure to read an answer counts as "no".
pub struct DialogConfirm;

#[async_trait]
impl ConfirmAction for DialogConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        let prompt = prompt.to_string();
        tokio::task::spawn_blocking(move || prompt_yes_no(&prompt, Some(false)).unwrap_or(false))
            .await
            .unwrap_or(false)
    }
}
