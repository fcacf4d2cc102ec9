use serenity::all::{Context, Interaction};

use crate::server::{
    bot::{command::dispatch, component::ComponentRouter},
    state::AppState,
};

pub async fn handle_interaction(
    state: &AppState,
    components: &ComponentRouter,
    ctx: Context,
    interaction: Interaction,
) {
    match interaction {
        Interaction::Command(command) => dispatch::handle_slash(state, &ctx, &command).await,
        Interaction::Autocomplete(command) => {
            dispatch::handle_autocomplete(state, &ctx, &command).await
        }
        Interaction::Component(component) => {
            components.dispatch_component(state, &ctx, &component).await
        }
        Interaction::Modal(modal) => components.dispatch_modal(state, &ctx, &modal).await,
        other => tracing::trace!("Ignoring interaction of kind {:?}", other.kind()),
    }
}
