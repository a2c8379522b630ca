//! Chat webhook message built from a pipeline event

use serde::Serialize;
use serde_json::Value;

use crate::NotifierConfig;
use crate::event::PipelineEvent;

pub const USERNAME: &str = "AWS Pipelines";

pub const COLOR_GREEN: u32 = 0x2ECC71;
pub const COLOR_RED: u32 = 0xE74C3C;
pub const COLOR_BLUE: u32 = 0x3498DB;
pub const COLOR_ORANGE: u32 = 0xF39C12;
pub const COLOR_GRAY: u32 = 0x95A5A6;

/// Pipeline execution states with a dedicated color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Succeeded,
    Failed,
    Started,
    Stopping,
    Other,
}

impl PipelineState {
    /// Exact, case-sensitive match on the state name.
    pub fn parse(state: &str) -> Self {
        match state {
            "SUCCEEDED" => PipelineState::Succeeded,
            "FAILED" => PipelineState::Failed,
            "STARTED" => PipelineState::Started,
            "STOPPING" => PipelineState::Stopping,
            _ => PipelineState::Other,
        }
    }

    pub fn color(self) -> u32 {
        match self {
            PipelineState::Succeeded => COLOR_GREEN,
            PipelineState::Failed => COLOR_RED,
            PipelineState::Started => COLOR_BLUE,
            PipelineState::Stopping => COLOR_ORANGE,
            PipelineState::Other => COLOR_GRAY,
        }
    }
}

pub fn state_color(state: &str) -> u32 {
    PipelineState::parse(state).color()
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WebhookPayload {
    pub username: String,
    pub content: String,
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    fn new(name: &str, value: impl Into<String>, inline: bool) -> Self {
        Self {
            name: name.to_string(),
            value: value.into(),
            inline,
        }
    }
}

impl WebhookPayload {
    /// Assemble the message for `state`. The caller has already checked that `state` is non-empty.
    pub fn build(config: &NotifierConfig, event: &PipelineEvent, state: &str) -> Self {
        let pipeline_name = &config.pipeline_name;
        let fields = vec![
            EmbedField::new("Author", event.author(), true),
            EmbedField::new("Commit ID", event.commit_id(), true),
            EmbedField::new("Commit Message", event.commit_message(), false),
            EmbedField::new(
                "Pipeline Link",
                format!("[View Pipeline]({})", config.pipeline_url()),
                false,
            ),
        ];

        Self {
            username: USERNAME.to_string(),
            content: format!(
                "Pipeline **{}** status changed to **{}**",
                pipeline_name, state
            ),
            embeds: vec![Embed {
                title: pipeline_name.clone(),
                description: format!("State: **{}**", state),
                color: state_color(state),
                fields,
                timestamp: event.time.clone(),
            }],
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.embeds
            .first()?
            .fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}
