// Entity services.
// Work and gallery operations layered on the document store.

pub mod gallery;
pub mod works;
