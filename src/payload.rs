use serde::Serialize;

/// Body of a webhook execution. Unset sender fields are left out so the
/// chat service falls back to the webhook's own name and icon.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NotificationPayload {
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    avatar_url: Option<String>,
}

impl NotificationPayload {
    pub fn build(message: &str, username: Option<&str>, avatar_url: Option<&str>) -> Self {
        Self {
            content: message.to_string(),
            username: username.map(str::to_string),
            avatar_url: avatar_url.map(str::to_string),
        }
    }

    #[cfg(test)]
    pub fn content(&self) -> &str {
        &self.content
    }
}
