//! Templated answer construction
//!
//! No model inference happens here: the answer is the first sentence of the
//! best match, the second sentence of the next two matches, and a numbered
//! list of source ids.

use std::fmt::Write;

use crate::server::models::Document;

pub const NO_INFORMATION_ANSWER: &str =
  "I couldn't find any relevant information to answer your question based on the documents I have access to.";

const PREAMBLE: &str = "Based on the documents I found, here's the answer to your question:\n\n";

/// Number of documents that contribute text to the answer body
const CONTRIBUTING_DOCUMENTS: usize = 3;

#[derive(Debug, Clone, Copy, Default)]
pub struct AnswerBuilder;

impl AnswerBuilder {
  pub fn new() -> Self {
    Self
  }

  /// Build the answer for `question` from search results, best match first
  pub fn build(&self, question: &str, documents: &[Document]) -> String {
    if documents.is_empty() {
      return NO_INFORMATION_ANSWER.to_string();
    }

    let mut answer = String::from(PREAMBLE);
    let _ = write!(answer, "**Question:** {question}\n\n");
    answer.push_str("**Answer:** ");

    for (i, doc) in documents.iter().take(CONTRIBUTING_DOCUMENTS).enumerate() {
      if i == 0 {
        answer.push_str(&primary_sentence(&doc.content));
      } else {
        answer.push(' ');
        answer.push_str(&supporting_sentence(&doc.content));
      }
    }

    answer.push_str("\n\n**Sources:**\n");
    for (i, doc) in documents.iter().enumerate() {
      let _ = writeln!(answer, "{}. {}", i + 1, doc.id);
    }

    answer
  }
}

/// First period-delimited segment, trimmed, period restored
fn primary_sentence(content: &str) -> String {
  let first = content.split('.').next().unwrap_or_default();
  format!("{}.", first.trim())
}

/// Second period-delimited segment, or nothing when there is none
fn supporting_sentence(content: &str) -> String {
  match content.split('.').nth(1) {
    Some(second) => format!("{}.", second.trim()),
    None => String::new(),
  }
}
