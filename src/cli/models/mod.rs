//! Models command - loads the catalog and prints it

use clap::Args;
use tracing::info;

use crate::domain::{Model, Provider};
use crate::store::CatalogState;

/// Arguments for the models command
#[derive(Args, Clone, Debug)]
pub struct ModelsArgs {
    /// Only show models with this capability (e.g. "reasoning")
    #[arg(long)]
    pub capability: Option<String>,

    /// Only show models from this provider (e.g. "openai")
    #[arg(long)]
    pub provider: Option<Provider>,

    /// Select a model by id before listing
    #[arg(long)]
    pub select: Option<String>,

    /// Print the listing as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the models command
pub async fn run(args: ModelsArgs) -> anyhow::Result<()> {
    let state = super::bootstrap().await?;
    let catalog = state.catalog.settled().await;

    if let Some(error) = catalog.error {
        anyhow::bail!("{}", error);
    }

    if let Some(id) = &args.select {
        if !state.catalog.select(id) {
            info!("No model with id {}; keeping current selection", id);
        }
    }

    let catalog = state.catalog.snapshot();
    let models = filter_models(&catalog, &args);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&models)?);
    } else {
        print!("{}", render_listing(&catalog, &models));
    }

    state.dispose();
    Ok(())
}

fn filter_models<'a>(catalog: &'a CatalogState, args: &ModelsArgs) -> Vec<&'a Model> {
    catalog
        .models
        .iter()
        .filter(|m| args.provider.is_none_or(|p| m.provider() == p))
        .filter(|m| {
            args.capability
                .as_deref()
                .is_none_or(|c| m.has_capability(c))
        })
        .collect()
}

fn render_listing(catalog: &CatalogState, models: &[&Model]) -> String {
    if models.is_empty() {
        return "No models match\n".to_string();
    }

    let mut out = String::new();
    for model in models {
        let marker = if catalog.selected.as_ref() == Some(model.id()) {
            '*'
        } else {
            ' '
        };
        out.push_str(&format!(
            "{} {:<4} {:<16} {:<10} {}\n",
            marker,
            model.id().as_str(),
            model.name(),
            model.provider().as_str(),
            model.capabilities().join(", ")
        ));
    }
    out
}
