//! Procedure step types.

pub mod backup;
pub mod databases;
pub mod knowledge_base;
pub mod service;

pub use backup::{
    AccessibilityConfirmation, Clean, CompressData, ConfigFiles, Metadata, PrepareDirectory, Pulp,
};
pub use databases::DatabaseDump;
pub use knowledge_base::KnowledgeBaseArticle;
pub use service::{ServiceStart, ServiceStop};
