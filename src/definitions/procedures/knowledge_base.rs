//! Points the operator at a knowledge base article and waits for them to
//! work through it.

use crate::context::Context;
use crate::error::{Result, UpkeepError};
use crate::runtime::Runtime;
use crate::step::{Outcome, Procedure, Step, StepDef, StepInfo};

/// Known document name to article URL mapping.
const ARTICLES: &[(&str, &str)] = &[
    (
        "fix_cpdb_validate_failure",
        "https://access.redhat.com/solutions/3362821",
    ),
    (
        "upgrade_puppet_guide_for_sat63",
        "https://access.redhat.com/documentation/en-us/red_hat_satellite/6.3/html/upgrading_and_updating_red_hat_satellite/upgrading_puppet-1",
    ),
];

pub struct KnowledgeBaseArticle {
    doc: String,
    url: &'static str,
}

impl KnowledgeBaseArticle {
    pub const DEF: StepDef = StepDef {
        id: "kb.article",
        required_keys: &["doc"],
        build: |args| {
            let doc = args.require_str("kb.article", "doc")?;
            let url = ARTICLES
                .iter()
                .find(|(name, _)| *name == doc)
                .map(|(_, url)| *url)
                .ok_or_else(|| {
                    UpkeepError::configuration(format!("no knowledge base article for '{}'", doc))
                })?;
            Ok(Step::procedure(KnowledgeBaseArticle {
                doc: doc.to_string(),
                url,
            }))
        },
    };
}

impl Procedure for KnowledgeBaseArticle {
    fn info(&self) -> StepInfo {
        StepInfo::new(Self::DEF.id, format!("Knowledge base article: {}", self.doc))
    }

    fn run(&self, rt: &mut Runtime<'_>, _ctx: &mut Context) -> Result<Outcome> {
        let confirmed = rt.ui.confirm(
            "kb-article",
            &format!(
                "Go to {}\nand follow the steps from the article to resolve this issue. Done?",
                self.url
            ),
            true,
        )?;
        if confirmed {
            Ok(Outcome::Success)
        } else {
            Ok(Outcome::Failure("article steps were not confirmed".into()))
        }
    }
}
