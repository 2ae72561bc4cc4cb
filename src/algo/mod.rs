pub mod dispersion;

pub use dispersion::suffix_dispersion;
