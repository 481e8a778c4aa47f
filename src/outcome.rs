use serde::Serialize;

/// What the automation host gets back, printed as one JSON object on stdout.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ModuleResult {
    msg: String,
    changed: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    failed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
}

impl ModuleResult {
    pub fn ok() -> Self {
        Self {
            msg: "OK".to_string(),
            changed: true,
            failed: false,
            status: None,
        }
    }

    pub fn skipped() -> Self {
        Self {
            msg: "skipped, running in check mode".to_string(),
            changed: false,
            failed: false,
            status: None,
        }
    }

    pub fn failed(msg: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            msg: msg.into(),
            changed: false,
            failed: true,
            status,
        }
    }

    #[cfg(test)]
    pub fn msg(&self) -> &str {
        &self.msg
    }

    #[cfg(test)]
    pub fn changed(&self) -> bool {
        self.changed
    }

    #[cfg(test)]
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    #[cfg(test)]
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn to_json(&self) -> String {
        // only strings, bools and integers
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"msg":"failed to render result","changed":false,"failed":true}"#.to_string()
        })
    }

    pub fn exit_code(&self) -> u8 {
        if self.failed {
            1
        } else {
            0
        }
    }
}
