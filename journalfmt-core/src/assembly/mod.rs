//! Output side of the pipeline: styles resolved against the template, the
//! front-matter builder, the manuscript body walk and the final package
//! assembly.

pub mod assembler;
pub mod front_matter;
pub mod injector;
pub mod media;
pub mod runs;
pub mod walker;

pub use assembler::{AssemblyOutput, DocumentAssembler};
pub use front_matter::FrontMatterBuilder;
pub use media::{RelationshipSink, TargetMedia};
pub use walker::ContentTreeWalker;

use serde::Serialize;

use crate::config::StyleConfig;
use crate::preprocessors::docx::{StyleCatalog, StyleId};
use crate::types::StyleRole;

/// How one role's configured style name resolved against a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleResolution {
    pub role: StyleRole,
    pub requested: String,
    pub id: StyleId,
    pub fell_back: bool,
}

/// Style id per [`StyleRole`], looked up once per template.
#[derive(Debug, Clone)]
pub struct ResolvedStyles {
    ids: [StyleId; 9],
    resolutions: Vec<StyleResolution>,
}

impl ResolvedStyles {
    pub fn resolve(catalog: &StyleCatalog, config: &StyleConfig) -> Self {
        let resolutions: Vec<StyleResolution> = StyleRole::ALL
            .iter()
            .map(|&role| {
                let requested = config.name_for(role);
                StyleResolution {
                    role,
                    requested: requested.to_string(),
                    id: catalog.resolve_style(requested, role.kind()),
                    fell_back: !catalog.contains(requested, role.kind()),
                }
            })
            .collect();
        let ids = StyleRole::ALL.map(|role| resolutions[role_index(role)].id.clone());
        Self { ids, resolutions }
    }

    pub fn id(&self, role: StyleRole) -> &StyleId {
        &self.ids[role_index(role)]
    }

    pub fn resolutions(&self) -> &[StyleResolution] {
        &self.resolutions
    }

    pub fn fallbacks(&self) -> impl Iterator<Item = &StyleResolution> {
        self.resolutions.iter().filter(|resolution| resolution.fell_back)
    }
}

fn role_index(role: StyleRole) -> usize {
    StyleRole::ALL
        .iter()
        .position(|&candidate| candidate == role)
        .unwrap_or(0)
}
