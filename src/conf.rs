use std::{fmt, path::Path, path::PathBuf};

use clap::Parser;
use serde::Deserialize;

use crate::error::ParamError;

pub const DEFAULT_USERNAME: &str = "Ansible";
pub const DEFAULT_AVATAR_URL: &str = "https://www.ansible.com/favicon.ico";

/// Send a message to a chat service through an incoming webhook.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Webhook url. This authenticates you to the chat service, keep it private.
    #[arg(long, env = "WEBHOOK_URL", hide_env_values = true)]
    webhook: Option<String>,

    /// Message to send. Escaping is left to the caller.
    #[arg(long)]
    msg: Option<String>,

    /// Sender of the message [default: Ansible]
    #[arg(long, conflicts_with = "no_username")]
    username: Option<String>,

    /// Url for the sender's icon [default: https://www.ansible.com/favicon.ico]
    #[arg(long, conflicts_with = "no_avatar_url")]
    avatar_url: Option<String>,

    /// Leave the username out of the payload
    #[arg(long)]
    no_username: bool,

    /// Leave the avatar url out of the payload
    #[arg(long)]
    no_avatar_url: bool,

    /// JSON file holding the module arguments. Flags override its values.
    #[arg(long)]
    args_file: Option<PathBuf>,

    /// Build the payload but do not send it
    #[arg(long)]
    check: bool,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,
}

impl Cli {
    pub fn timeout(&self) -> u64 {
        self.timeout
    }

    /// Merges the args file (if any) with the command line flags.
    pub fn resolve(&self) -> Result<(ModuleParams, bool), ParamError> {
        let mut args = match &self.args_file {
            Some(path) => ArgsFile::load_from(path)?,
            None => ArgsFile::default(),
        };

        if let Some(webhook) = &self.webhook {
            args.webhook = Some(webhook.clone());
        }
        if let Some(msg) = &self.msg {
            args.msg = Some(msg.clone());
        }
        if let Some(username) = &self.username {
            args.username = Some(username.clone());
        }
        if let Some(avatar_url) = &self.avatar_url {
            args.avatar_url = Some(avatar_url.clone());
        }
        if self.no_username {
            args.username = None;
        }
        if self.no_avatar_url {
            args.avatar_url = None;
        }

        let check_mode = self.check || args.check_mode();
        Ok((args.into_params()?, check_mode))
    }
}

impl fmt::Debug for Cli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cli")
            .field("webhook", &self.webhook.as_ref().map(|_| "********"))
            .field("msg", &self.msg)
            .field("username", &self.username)
            .field("avatar_url", &self.avatar_url)
            .field("no_username", &self.no_username)
            .field("no_avatar_url", &self.no_avatar_url)
            .field("args_file", &self.args_file)
            .field("check", &self.check)
            .field("timeout", &self.timeout)
            .finish()
    }
}

// an absent key takes its default, an explicit null stays null
#[derive(Deserialize, Debug)]
pub struct ArgsFile {
    webhook: Option<String>,
    msg: Option<String>,
    #[serde(default = "default_username")]
    username: Option<String>,
    #[serde(default = "default_avatar_url")]
    avatar_url: Option<String>,
    #[serde(rename = "_ansible_check_mode", default)]
    check_mode: bool,
}

fn default_username() -> Option<String> {
    Some(DEFAULT_USERNAME.to_string())
}

fn default_avatar_url() -> Option<String> {
    Some(DEFAULT_AVATAR_URL.to_string())
}

impl Default for ArgsFile {
    fn default() -> Self {
        Self {
            webhook: None,
            msg: None,
            username: default_username(),
            avatar_url: default_avatar_url(),
            check_mode: false,
        }
    }
}

impl ArgsFile {
    pub fn load_from(path: &Path) -> Result<Self, ParamError> {
        let file = std::fs::read_to_string(path).map_err(|source| ParamError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&file)
    }

    pub fn from_json(data: &str) -> Result<Self, ParamError> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn check_mode(&self) -> bool {
        self.check_mode
    }

    pub fn into_params(self) -> Result<ModuleParams, ParamError> {
        match (self.webhook, self.msg) {
            (Some(webhook), Some(msg)) => Ok(ModuleParams {
                webhook,
                msg,
                username: self.username,
                avatar_url: self.avatar_url,
            }),
            (webhook, msg) => {
                let missing: Vec<&str> = [("webhook", webhook.is_none()), ("msg", msg.is_none())]
                    .into_iter()
                    .filter(|(_, missing)| *missing)
                    .map(|(name, _)| name)
                    .collect();
                Err(ParamError::Missing(missing.join(", ")))
            }
        }
    }
}

pub struct ModuleParams {
    webhook: String,
    msg: String,
    username: Option<String>,
    avatar_url: Option<String>,
}

impl ModuleParams {
    #[cfg(test)]
    pub fn new(
        webhook: &str,
        msg: &str,
        username: Option<&str>,
        avatar_url: Option<&str>,
    ) -> Self {
        Self {
            webhook: webhook.into(),
            msg: msg.into(),
            username: username.map(Into::into),
            avatar_url: avatar_url.map(Into::into),
        }
    }

    pub fn webhook(&self) -> &str {
        &self.webhook
    }

    pub fn msg(&self) -> &str {
        &self.msg
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }
}

// the webhook url is a credential
impl fmt::Debug for ModuleParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleParams")
            .field("webhook", &"********")
            .field("msg", &self.msg)
            .field("username", &self.username)
            .field("avatar_url", &self.avatar_url)
            .finish()
    }
}
