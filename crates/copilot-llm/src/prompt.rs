//! Prompt composition: one system instruction plus human turns, ready for any
//! chat-completion backend. Pure construction, no validation of inputs.

use crate::backend::{LlmRequest, Message};

/// Description of the downstream guide-design tool, embedded in the
/// classification prompt so the model knows what "suitable" means.
pub const MEDIT_README: &str = "mEdit is a Python-based CRISPR guide RNA design tool that takes \
genomic coordinates or HGVS variants as input and generates candidate guides using the GRCh38 \
reference genome; it supports various endonucleases and base editors, can predict off-target \
effects, optionally uses alternative genomes or custom VCFs, and is installed via pip with \
commands like db_set for database setup and guide_prediction for generating editing guides.";

const FALLBACK_SYSTEM: &str = "You are a smart CRISPR assistant.";

const STRUCTURED_SUFFIX: &str = " Then, on the last line, output only a JSON object of the form \
{\"suitable\": true or false, \"reason\": \"<one sentence>\"}.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPrompt {
    pub system: String,
    pub turns: Vec<Message>,
}

impl ChatPrompt {
    pub fn new(system: impl Into<String>, human: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            turns: vec![Message::user(human)],
        }
    }

    /// Human turn text, if exactly one is present.
    pub fn human(&self) -> Option<&str> {
        match self.turns.as_slice() {
            [only] => Some(only.content.as_str()),
            _ => None,
        }
    }

    pub fn into_request(self) -> LlmRequest {
        let mut messages = Vec::with_capacity(self.turns.len() + 1);
        messages.push(Message::system(self.system));
        messages.extend(self.turns);
        LlmRequest::new(messages)
    }
}

/// Asks whether `input` is a strict-HG38 coordinate or HGVS string.
pub fn classification_prompt(input: &str, structured: bool) -> ChatPrompt {
    let system = format!(
        "You are a genomics assistant helping interpret user input. the following is the mEdit readme: {}",
        MEDIT_README
    );
    let mut human = format!(
        "This user input represents: '{}'. Is this a valid genomic coordinate or HGVS mutation \
         suitable for mEdit analysis, specifically in strict HG38 format? Respond yes or no and explain.",
        input
    );
    if structured {
        human.push_str(STRUCTURED_SUFFIX);
    }
    ChatPrompt::new(system, human)
}

/// Generic assistant prompt used when the input is not a variant.
pub fn fallback_prompt(input: &str) -> ChatPrompt {
    ChatPrompt::new(FALLBACK_SYSTEM, format!("Help with: {}", input))
}

/// Asks for a single read-only query over the given schema.
pub fn sql_query_prompt(schema: &str, question: &str, row_limit: usize) -> ChatPrompt {
    let system = format!(
        "You are a PostgreSQL expert working on a database of genomic variant metadata. \
         Given a user question, write exactly one syntactically correct PostgreSQL SELECT statement \
         that answers it. Never modify data. Return at most {row_limit} rows. Only use the tables \
         and columns listed below; quote identifiers that contain upper-case letters. \
         Output the SQL only, with no explanation.\n\nSchema:\n{schema}"
    );
    ChatPrompt::new(system, question)
}

/// Asks the model to turn raw result rows into an answer for the user.
pub fn sql_summary_prompt(question: &str, sql: &str, rows: &str) -> ChatPrompt {
    let system = "You summarise database query results about genomic variants for clinicians \
                  and researchers. Answer the question using only the rows provided. Report \
                  missing values exactly as they appear in the rows (for example None or null), \
                  and keep any dbSNP identifiers such as rs12345 verbatim.";
    let human = format!("Question: {question}\n\nSQL:\n{sql}\n\nRows:\n{rows}");
    ChatPrompt::new(system, human)
}
