//! Submission UI state and its pure view.
//!
//! The form has four states. [`view`] maps each one to everything a front
//! end needs to draw: status line and tone, submit-button label and
//! enabled flag, loader text. Nothing here touches the normalizer.

use crate::messages;
use serde::Serialize;

/// Where the form is in its submit cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum UiState {
    #[default]
    Idle,
    Submitting {
        with_video: bool,
    },
    Success,
    Failed {
        message: String,
    },
}

/// Colour family of the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Neutral,
    Success,
    Error,
}

/// Everything needed to draw the form for a [`UiState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UiView {
    pub status: String,
    pub tone: Tone,
    pub button_label: &'static str,
    pub button_enabled: bool,
    pub loader: Option<&'static str>,
}

/// Pure view function over [`UiState`].
pub fn view(state: &UiState) -> UiView {
    match state {
        UiState::Idle => UiView {
            status: String::new(),
            tone: Tone::Neutral,
            button_label: messages::BUTTON_IDLE,
            button_enabled: true,
            loader: None,
        },
        UiState::Submitting { with_video } => UiView {
            status: String::new(),
            tone: Tone::Neutral,
            button_label: messages::BUTTON_SUBMITTING,
            button_enabled: false,
            loader: Some(if *with_video {
                messages::LOADER_VIDEO
            } else {
                messages::LOADER_TEXT
            }),
        },
        UiState::Success => UiView {
            status: messages::SUCCESS.to_string(),
            tone: Tone::Success,
            button_label: messages::BUTTON_IDLE,
            button_enabled: true,
            loader: None,
        },
        UiState::Failed { message } => UiView {
            status: message.clone(),
            tone: Tone::Error,
            button_label: messages::BUTTON_IDLE,
            button_enabled: true,
            loader: None,
        },
    }
}
