/// External (serializable) representations of the entities within the library.
pub mod ext_repr;

/// Composition of nesting results into a single vector document
pub mod svg;
