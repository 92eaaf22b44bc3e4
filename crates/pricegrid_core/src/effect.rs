#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Dispatch one search request; the result must come back tagged with `generation`.
    Search {
        generation: crate::Generation,
        query: String,
    },
}
