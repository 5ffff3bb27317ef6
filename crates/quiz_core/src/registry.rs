//! Exam registry: creates and resolves exams by generated short code

use std::sync::Arc;
use std::time::Duration;

use log::info;
use rand::Rng;

use crate::error::{QuizError, Result};
use crate::storage::KeyValueStore;
use crate::structs::Exam;

const EXAM_KEY_PREFIX: &str = "exam:";

/// Creates and looks up exams keyed by a random zero-padded 6-digit code.
///
/// Codes are unique among currently-live exams only; once an exam expires its
/// code may be handed out again.
pub struct ExamRegistry {
    store: Arc<dyn KeyValueStore>,
    exam_ttl: Duration,
}

impl ExamRegistry {
    pub fn new(store: Arc<dyn KeyValueStore>, exam_ttl: Duration) -> Self {
        Self { store, exam_ttl }
    }

    /// Register an exam and return its code.
    ///
    /// The TTL is fixed at creation; participant activity does not extend it.
    /// Fails only when the underlying store is unavailable.
    pub async fn create_exam(
        &self,
        exam_id: impl Into<String>,
        num_questions: usize,
        questions: Vec<String>,
    ) -> Result<String> {
        let exam = Exam {
            exam_id: exam_id.into(),
            num_questions,
            questions,
        };
        let payload = serde_json::to_string(&exam)?;

        let code = loop {
            let candidate = generate_code();
            if !self.store.exists(&exam_key(&candidate)).await? {
                break candidate;
            }
        };

        self.store.set(&exam_key(&code), &payload, self.exam_ttl).await?;
        info!("registered exam {} under code {}", exam.exam_id, code);
        Ok(code)
    }

    /// Resolve a code to its exam, or `NotFound` when unknown or expired.
    pub async fn lookup_exam(&self, code: &str) -> Result<Exam> {
        let payload = self
            .store
            .get(&exam_key(code))
            .await?
            .ok_or(QuizError::NotFound)?;
        Ok(serde_json::from_str(&payload)?)
    }

    /// True when the code names a currently-live exam.
    pub async fn code_is_live(&self, code: &str) -> Result<bool> {
        self.store.exists(&exam_key(code)).await
    }
}

fn exam_key(code: &str) -> String {
    format!("{EXAM_KEY_PREFIX}{code}")
}

fn generate_code() -> String {
    format!("{:06}", rand::thread_rng().gen_range(0..1_000_000))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use tokio::time::advance;

    fn registry_with_ttl(ttl: Duration) -> ExamRegistry {
        ExamRegistry::new(Arc::new(MemoryStore::new()), ttl)
    }

    #[tokio::test]
    async fn test_create_and_lookup_exam() {
        let registry = registry_with_ttl(Duration::from_secs(1800));
        let code = registry
            .create_exam("e1", 2, vec!["q1".to_string(), "q2".to_string()])
            .await
            .unwrap();

        let exam = registry.lookup_exam(&code).await.unwrap();
        assert_eq!(exam.exam_id, "e1");
        assert_eq!(exam.num_questions, 2);
        assert_eq!(exam.questions, vec!["q1", "q2"]);
        assert!(registry.code_is_live(&code).await.unwrap());
    }

    #[tokio::test]
    async fn test_codes_are_six_zero_padded_digits() {
        let registry = registry_with_ttl(Duration::from_secs(1800));
        for i in 0..50 {
            let code = registry
                .create_exam(format!("e{i}"), 1, vec!["q".to_string()])
                .await
                .unwrap();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[tokio::test]
    async fn test_live_codes_never_collide() {
        let registry = registry_with_ttl(Duration::from_secs(1800));
        let mut seen = std::collections::HashSet::new();
        for i in 0..50 {
            let code = registry
                .create_exam(format!("e{i}"), 1, vec!["q".to_string()])
                .await
                .unwrap();
            assert!(seen.insert(code));
        }
    }

    #[tokio::test]
    async fn test_lookup_unknown_code() {
        let registry = registry_with_ttl(Duration::from_secs(1800));
        assert!(matches!(
            registry.lookup_exam("123456").await,
            Err(QuizError::NotFound)
        ));
        assert!(!registry.code_is_live("123456").await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_exam_expires_after_ttl() {
        let registry = registry_with_ttl(Duration::from_secs(60));
        let code = registry
            .create_exam("e1", 1, vec!["q1".to_string()])
            .await
            .unwrap();

        advance(Duration::from_secs(61)).await;

        assert!(matches!(
            registry.lookup_exam(&code).await,
            Err(QuizError::NotFound)
        ));
        assert!(!registry.code_is_live(&code).await.unwrap());
    }
}
