// ABOUTME: Canned content for offline mode
// ABOUTME: The revealed mock response and a short seed conversation

use crate::types::{Message, Participant};

/// Response revealed fragment by fragment when no agent is configured
pub const MOCK_RESPONSE: &str = r#"Happy to help! Here is how a transfer request flows through the agent:

### Steps
1. The model reads your message
2. It picks a tool such as `transfer_token`
3. The chain kit runs it and reports back

A tool call looks like this on the wire:

```json
{
  "name": "transfer_token",
  "arguments": "{\"amount\":\"1\",\"to_chain\":\"westend_asset_hub\"}"
}
```

And a balance check from the command line:

```sh check-balance.sh
dotchat send "check balance"
```

Ask me to check a balance or list proxies when you are connected."#;

/// A short history shown in offline mode
pub fn seed_messages(user: &Participant, assistant: &Participant) -> Vec<Message> {
    vec![
        Message::user("Hi! What can you do?", user),
        Message::assistant(
            "I can transfer tokens between chains over XCM, check your WND balance, \
             and list the proxies on your account.\n\n\
             ```text example.txt\ntransfer 1 token to westend_asset_hub to 5CSox4ZSN4SGLKUG9NYPtfVK9sByXLtxP4hmoF4UgkM4jgDJ\n```",
            assistant,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::extract_code_blocks;

    #[test]
    fn test_mock_response_blocks() {
        let blocks = extract_code_blocks(MOCK_RESPONSE);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].language, "json");
        assert_eq!(blocks[1].language, "shell");
        assert_eq!(blocks[1].filename.as_deref(), Some("check-balance.sh"));
    }

    #[test]
    fn test_seed_messages() {
        let user = Participant::new("You", "");
        let bot = Participant::new("Agent Kit", "");
        let seed = seed_messages(&user, &bot);
        assert_eq!(seed.len(), 2);
        assert_eq!(seed[1].code_blocks.len(), 1);
        assert_eq!(seed[1].code_blocks[0].filename.as_deref(), Some("example.txt"));
    }
}
