use crate::{Generation, SearchFailure, SearchOutcome};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited the query input box.
    InputChanged(String),
    /// User picked one of the sample queries; fills the input without submitting.
    SampleSelected(usize),
    /// User submitted the current query input.
    SearchSubmitted,
    /// A dispatched search finished, successfully or not.
    SearchSettled {
        generation: Generation,
        query: String,
        result: Result<SearchOutcome, SearchFailure>,
    },
}
