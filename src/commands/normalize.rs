use std::collections::BTreeMap;

use anyhow::Result;
use tracing::info;

use crate::cli::NormalizeArgs;
use crate::model::{
    CiodModuleRelation, CiodRecord, CiodSummary, ModuleAttributeRelation, ModuleRecord,
};
use crate::util::{create_slug, read_json, write_json_pretty};

pub fn run_ciods(args: NormalizeArgs) -> Result<()> {
    let ciods = read_json::<Vec<CiodRecord>>(&args.input)?;
    let summaries = ciod_summaries(&ciods);

    write_json_pretty(&args.output, &summaries)?;
    info!(path = %args.output.display(), ciods = summaries.len(), "wrote CIOD summaries");
    Ok(())
}

pub fn run_ciod_modules(args: NormalizeArgs) -> Result<()> {
    let ciods = read_json::<Vec<CiodRecord>>(&args.input)?;
    let relations = ciod_module_relations(&ciods);

    write_json_pretty(&args.output, &relations)?;
    info!(path = %args.output.display(), relations = relations.len(), "wrote CIOD module relations");
    Ok(())
}

pub fn run_module_attributes(args: NormalizeArgs) -> Result<()> {
    let modules = read_json::<Vec<ModuleRecord>>(&args.input)?;
    let relations = module_attribute_relations(&modules);

    write_json_pretty(&args.output, &relations)?;
    info!(
        path = %args.output.display(),
        relations = relations.len(),
        "wrote module attribute relations"
    );
    Ok(())
}

pub fn ciod_summaries(ciods: &[CiodRecord]) -> BTreeMap<String, CiodSummary> {
    ciods
        .iter()
        .map(|ciod| {
            (
                ciod.id.clone(),
                CiodSummary {
                    name: ciod.name.clone(),
                    description: ciod
                        .description
                        .as_deref()
                        .map(|description| description.trim().to_string()),
                    link_to_standard: ciod.link_to_standard.clone(),
                },
            )
        })
        .collect()
}

pub fn ciod_module_relations(ciods: &[CiodRecord]) -> Vec<CiodModuleRelation> {
    ciods
        .iter()
        .flat_map(|ciod| {
            ciod.modules
                .iter()
                .enumerate()
                .map(|(order, module)| CiodModuleRelation {
                    ciod: ciod.id.clone(),
                    module: create_slug(&module.module),
                    usage: module.usage.clone(),
                    conditional_statement: module.conditional_statement.clone(),
                    order,
                    information_entity: module.information_entity.clone(),
                })
        })
        .collect()
}

pub fn module_attribute_relations(modules: &[ModuleRecord]) -> Vec<ModuleAttributeRelation> {
    modules
        .iter()
        .flat_map(|module| {
            module
                .attributes
                .iter()
                .enumerate()
                .map(|(order, attribute)| ModuleAttributeRelation {
                    module: module.id.clone(),
                    path: format!("{}:{}", module.id, attribute.id),
                    tag: attribute.tag.clone(),
                    order,
                    depth: attribute.depth,
                    attribute_type: attribute.attribute_type.clone(),
                    link_to_standard: attribute
                        .link_to_standard
                        .clone()
                        .unwrap_or_else(|| module.link_to_standard.clone()),
                    description: attribute.description.clone(),
                })
        })
        .collect()
}
