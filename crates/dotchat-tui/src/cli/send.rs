// ABOUTME: Non-interactive send command for scripting.
// ABOUTME: Dispatches one message through the agent and prints the reply.

use std::io::Write;

use anyhow::{Context, Result};
use dotchat_core::mock::MOCK_RESPONSE;
use dotchat_core::{AgentService, Config, Credentials};

/// Run the send command. With `mock` the canned response is printed and
/// no credentials are needed.
pub async fn run(config: &Config, message: &str, mock: bool) -> Result<()> {
    if message.trim().is_empty() {
        anyhow::bail!("Message is empty.");
    }

    let reply = if mock {
        MOCK_RESPONSE.to_string()
    } else {
        let credentials = Credentials::from_env()?;
        let agent = AgentService::from_config(config, &credentials)
            .context("Failed to initialize agent")?;

        let result = agent.dispatch(message).await;
        agent.disconnect().await;
        result?
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{reply}")?;
    stdout.flush()?;
    Ok(())
}
