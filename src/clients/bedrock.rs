use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, ConverseOutput, Message, SystemContentBlock,
};

use crate::clients::TextCompletion;
use crate::config::CompletionConfig;
use crate::error::CompletionError;

pub struct BedrockCompletion {
    client: Client,
    model_id: String,
}

impl BedrockCompletion {
    pub async fn connect(config: &CompletionConfig) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        Self {
            client: Client::new(&sdk_config),
            model_id: config.model_id.clone(),
        }
    }
}

#[async_trait]
impl TextCompletion for BedrockCompletion {
    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, CompletionError> {
        let message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Text(user_message.to_string()))
            .build()
            .map_err(|err| CompletionError::Failed(err.to_string()))?;

        let mut request = self
            .client
            .converse()
            .model_id(&self.model_id)
            .messages(message);

        if !system_prompt.is_empty() {
            request = request.system(SystemContentBlock::Text(system_prompt.to_string()));
        }

        let response = request.send().await.map_err(|err| {
            let service_err = err.into_service_error();
            if service_err.is_access_denied_exception() {
                CompletionError::AccessDenied
            } else {
                CompletionError::Failed(service_err.to_string())
            }
        })?;

        first_text(response.output())
    }
}

fn first_text(output: Option<&ConverseOutput>) -> Result<String, CompletionError> {
    let message = output
        .and_then(|output| output.as_message().ok())
        .ok_or(CompletionError::EmptyReply)?;

    match message.content().first().and_then(|block| block.as_text().ok()) {
        Some(text) if !text.is_empty() => Ok(text.clone()),
        _ => Err(CompletionError::EmptyReply),
    }
}
