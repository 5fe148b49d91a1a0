//! Ready-made classifiers built on [`crate::decoder::Decoder`].
//!
//!   - [`Okato`]: administrative-territorial division codes (OKATO), classifier 16270.
//!   - [`Sfr`]: client offices of the Social Fund (SFR_CO), classifier 10991, many offices per area.
//!   - [`SfrCo`]: the same registry with at most one office per served area.

pub mod okato;
pub mod sfr;
pub mod sfr_co;

pub use okato::{Okato, OkatoRecord};
pub use sfr::{Sfr, SfrRecord};
pub use sfr_co::SfrCo;

/// Code system name used in index validation errors.
pub(crate) const OKATO_SCHEME: &str = "OKATO";

/// Records at `positions`, for resolving index hits.
pub(crate) fn resolve<'a, T>(records: &'a [T], positions: &[usize]) -> Vec<&'a T> {
    positions.iter().map(|&i| &records[i]).collect()
}
