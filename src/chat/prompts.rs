use std::path::Path;

use anyhow::Context;

use crate::models::ServiceKind;

/// Persona prompt templates, loaded once at startup. Each persona is the
/// shared head, the kind-specific body, and the shared foot concatenated.
pub struct PromptLibrary {
    head: String,
    foot: String,
    ec2: String,
    rds: String,
    alb: String,
}

impl PromptLibrary {
    pub fn load(dir: &Path) -> anyhow::Result<Self> {
        let read = |file: &str| -> anyhow::Result<String> {
            std::fs::read_to_string(dir.join(file))
                .with_context(|| format!("reading prompt file {}", dir.join(file).display()))
        };
        Ok(Self {
            head: read("base_head.txt")?,
            foot: read("base_foot.txt")?,
            ec2: read("ec2.txt")?,
            rds: read("rds.txt")?,
            alb: read("alb.txt")?,
        })
    }

    pub fn persona(&self, kind: ServiceKind) -> String {
        let body = match kind {
            ServiceKind::Ec2 => &self.ec2,
            ServiceKind::Rds => &self.rds,
            ServiceKind::Alb => &self.alb,
        };
        format!("{}{}{}", self.head, body, self.foot)
    }
}
