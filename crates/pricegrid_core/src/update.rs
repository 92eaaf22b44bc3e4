use crate::{AppState, Effect, Msg, SAMPLE_QUERIES};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::SampleSelected(index) => {
            if let Some(sample) = SAMPLE_QUERIES.get(index) {
                state.set_input((*sample).to_string());
            }
            Vec::new()
        }
        Msg::SearchSubmitted => match state.begin_search() {
            Some((generation, query)) => vec![Effect::Search { generation, query }],
            None => Vec::new(),
        },
        Msg::SearchSettled {
            generation,
            query,
            result,
        } => {
            state.settle(generation, query, result);
            Vec::new()
        }
    };

    (state, effects)
}
