//! Ordered output blocks for one request, independent of how they are shown.

use copilot_common::ClassificationVerdict;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const SUITABLE_BANNER: &str = "Input looks suitable for mEdit analysis.";
pub const UNSUITABLE_BANNER: &str =
    "Input may not be suitable for genomic coordinate processing. Responding as a general assistant...";
pub const DB_SUBHEADING: &str = "AI-Generated Response from VariantMetadata DB";
pub const IMAGE_NOTICE: &str = "image and file extraction coming soon..";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Block {
    Success(String),
    Info(String),
    Error(String),
    Subheading(String),
    Markdown(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Presentation {
    pub request_id: Uuid,
    pub verdict: Option<ClassificationVerdict>,
    pub blocks: Vec<Block>,
}

impl Presentation {
    pub fn new(request_id: Uuid) -> Self {
        Self { request_id, verdict: None, blocks: Vec::new() }
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(Block::Success(text.into()));
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(Block::Info(text.into()));
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(Block::Error(text.into()));
    }

    pub fn subheading(&mut self, text: impl Into<String>) {
        self.push(Block::Subheading(text.into()));
    }

    pub fn markdown(&mut self, text: impl Into<String>) {
        self.push(Block::Markdown(text.into()));
    }

    pub fn has_errors(&self) -> bool {
        self.blocks.iter().any(|b| matches!(b, Block::Error(_)))
    }
}
