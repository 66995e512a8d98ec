//! Unit constants for building quantities by multiplication, e.g. `120.0 * uc::KM`.

use crate::si;

pub const KM: si::Length = si::Length {
    dimension: std::marker::PhantomData,
    units: std::marker::PhantomData,
    value: 1.0e3,
};
pub const KG: si::Mass = si::Mass {
    dimension: std::marker::PhantomData,
    units: std::marker::PhantomData,
    value: 1.0,
};
/// Metric tonne
pub const TONNE: si::Mass = si::Mass {
    dimension: std::marker::PhantomData,
    units: std::marker::PhantomData,
    value: 1.0e3,
};
