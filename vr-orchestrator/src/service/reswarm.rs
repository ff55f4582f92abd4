//! Reswarm Service
//!
//! Moves a selection of swarms to a new tag, squad or ingredient list and
//! dispatches them. Planning does all the reading and validation; nothing is
//! written until [`execute`].

use std::collections::HashSet;
use std::time::Duration;
use vr_client::FleetClient;
use vr_core::domain::ingredient::IngredientRef;
use vr_core::domain::swarm::Swarm;
use vr_core::dto::swarm::{SwarmChanges, TagToken};
use vr_core::filter::SwarmFilter;
use vr_core::ingredients::{IngredientEdit, check_disjoint};

use crate::error::{OrchestratorError, Result};
use crate::prompt::OperatorPrompt;
use crate::service::swarms;

/// Everything the operator asked for on the command line
#[derive(Debug, Clone)]
pub struct ReswarmRequest {
    pub filter: SwarmFilter,
    pub tag: TagToken,
    pub squad: Option<String>,
    /// Ingredient ids or names
    pub add_ingredients: Vec<String>,
    pub remove_ingredients: Vec<String>,
    pub replace_ingredients: Vec<String>,
    /// Also select every swarm that uses one of these ingredients
    pub by_ingredients: Vec<String>,
}

impl ReswarmRequest {
    /// Check the ingredient flags against each other. Needs no network.
    pub fn validate(&self) -> Result<IngredientEdit<String>> {
        let edit = IngredientEdit::from_flags(
            self.add_ingredients.clone(),
            self.remove_ingredients.clone(),
            self.replace_ingredients.clone(),
        )?;
        if let IngredientEdit::Modify { add, remove } = &edit {
            check_disjoint(add, remove)?;
        }
        Ok(edit)
    }
}

/// One swarm and the changes it will be dispatched with
#[derive(Debug, Clone)]
pub struct PlannedDispatch {
    pub swarm: Swarm,
    pub changes: SwarmChanges,
}

#[derive(Debug, Clone, Default)]
pub struct ReswarmPlan {
    pub dispatches: Vec<PlannedDispatch>,
}

impl ReswarmPlan {
    pub fn swarms(&self) -> impl Iterator<Item = &Swarm> {
        self.dispatches.iter().map(|d| &d.swarm)
    }

    pub fn len(&self) -> usize {
        self.dispatches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dispatches.is_empty()
    }
}

/// Resolve the selection and compute each swarm's changes.
///
/// Conflicting ingredient flags are rejected before the fleet is contacted.
pub async fn plan<C>(client: &C, request: &ReswarmRequest) -> Result<ReswarmPlan>
where
    C: FleetClient + ?Sized,
{
    let edit = request.validate()?;

    let mut selected = swarms::select(client, &request.filter).await?;
    let extra = swarms_by_ingredients(client, &request.by_ingredients).await?;
    let mut seen: HashSet<String> = selected.iter().map(|s| s.resource_uri.clone()).collect();
    for swarm in extra {
        if seen.insert(swarm.resource_uri.clone()) {
            selected.push(swarm);
        }
    }

    let edit = resolve_edit(client, edit).await?;
    let base = SwarmChanges {
        version: request.tag.version(),
        squad: request.squad.clone(),
        ..Default::default()
    };

    let mut dispatches = Vec::with_capacity(selected.len());
    for swarm in selected {
        let changes = SwarmChanges {
            config_ingredients: edit.apply(&swarm.config_ingredients)?,
            ..base.clone()
        };
        dispatches.push(PlannedDispatch { swarm, changes });
    }

    tracing::info!("Planned {} dispatches", dispatches.len());
    Ok(ReswarmPlan { dispatches })
}

/// Dispatch every planned swarm in order, stopping at the first failure.
///
/// Returns the swarms as they look after their changes were applied.
pub async fn execute<C, P>(
    client: &C,
    prompt: &P,
    plan: ReswarmPlan,
    countdown: Option<Duration>,
) -> Result<Vec<Swarm>>
where
    C: FleetClient + ?Sized,
    P: OperatorPrompt + ?Sized,
{
    if let Some(duration) = countdown {
        prompt.countdown("Reswarming", duration).await?;
    }

    let total = plan.len();
    let mut done = Vec::with_capacity(total);
    for (index, PlannedDispatch { mut swarm, changes }) in plan.dispatches.into_iter().enumerate() {
        if let Err(err) = swarms::dispatch(client, &mut swarm, &changes).await {
            tracing::warn!("Reswarm aborted at {} ({} of {} done)", swarm, index, total);
            return Err(OrchestratorError::aborted(&swarm, index, total, err));
        }
        done.push(swarm);
    }
    Ok(done)
}

async fn swarms_by_ingredients<C>(client: &C, tokens: &[String]) -> Result<Vec<Swarm>>
where
    C: FleetClient + ?Sized,
{
    let mut found = Vec::new();
    for token in tokens {
        let ingredient = client.resolve_ingredient(&IngredientRef::parse(token)).await?;
        for uri in &ingredient.swarms {
            found.push(client.load_swarm(uri).await?);
        }
    }
    Ok(found)
}

/// Swap ingredient tokens for resource URIs.
async fn resolve_edit<C>(client: &C, edit: IngredientEdit<String>) -> Result<IngredientEdit<String>>
where
    C: FleetClient + ?Sized,
{
    Ok(match edit {
        IngredientEdit::Unchanged => IngredientEdit::Unchanged,
        IngredientEdit::Replace(list) => IngredientEdit::Replace(resolve_uris(client, &list).await?),
        IngredientEdit::Modify { add, remove } => {
            let add = resolve_uris(client, &add).await?;
            let remove = resolve_uris(client, &remove).await?;
            check_disjoint(&add, &remove)?;
            IngredientEdit::Modify { add, remove }
        }
    })
}

async fn resolve_uris<C>(client: &C, tokens: &[String]) -> Result<Vec<String>>
where
    C: FleetClient + ?Sized,
{
    let mut uris = Vec::with_capacity(tokens.len());
    for token in tokens {
        let ingredient = client.resolve_ingredient(&IngredientRef::parse(token)).await?;
        uris.push(ingredient.resource_uri);
    }
    Ok(uris)
}
