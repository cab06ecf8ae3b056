pub mod consent_store;
pub mod llm_resolver;
pub mod rules_resolver;
pub mod style;

pub use consent_store::{FileConsentStore, MemoryConsentStore};
pub use llm_resolver::OpenAiResolver;
pub use rules_resolver::RulesResolver;
pub use style::{StyleChange, StyleSheet, StyleState};
